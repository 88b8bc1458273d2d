use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default location of the output configuration on the device.
pub const CONFIG_FILE_LOCATION: &str = "/etc/telosair/opera.conf";

/// Which output-job projections the device emits.
///
/// Read once at startup and consumed only by the projection layer's
/// callers — never by the codec or the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "output_to_csv")]
    pub emit_csv: bool,
    #[serde(rename = "output_to_raw")]
    pub emit_binary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            emit_csv: true,
            emit_binary: true,
        }
    }
}

impl OutputConfig {
    /// Load from the fixed device path.
    pub fn load() -> std::io::Result<Self> {
        Self::load_from(CONFIG_FILE_LOCATION)
    }

    /// Load from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&contents).map_err(std::io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_emit_everything() {
        let config = OutputConfig::default();
        assert!(config.emit_csv);
        assert!(config.emit_binary);
    }

    #[test]
    fn reads_json_keys() {
        let dir = std::env::temp_dir().join(format!("opera-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("opera.conf");
        std::fs::write(&path, r#"{"output_to_raw": true, "output_to_csv": false}"#).unwrap();

        let config = OutputConfig::load_from(&path).unwrap();
        assert_eq!(
            config,
            OutputConfig {
                emit_csv: false,
                emit_binary: true
            }
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_error_not_a_default() {
        let err = OutputConfig::load_from("/nonexistent/opera.conf").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = std::env::temp_dir().join(format!("opera-config-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("opera.conf");
        std::fs::write(&path, "not json").unwrap();
        assert!(OutputConfig::load_from(&path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
