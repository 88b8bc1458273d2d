use std::fs;

use opera_records::Message;
use opera_transport::MessageSender;

use crate::cmd::SendArgs;
use crate::exit::{transport_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let message = resolve_message(&args)?;
    MessageSender::new(&args.path)
        .send(&message)
        .map_err(|err| transport_error("send failed", err))?;
    Ok(SUCCESS)
}

fn resolve_message(args: &SendArgs) -> CliResult<Message> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not a valid message: {err}")));
    }
    if let Some(path) = &args.file {
        let bytes = fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        })?;
        // Decode up front so a malformed file fails here, not on the
        // receiver's side of the socket.
        return Message::decode(&bytes)
            .map_err(|err| crate::exit::decode_error("message file is invalid", err));
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

#[cfg(test)]
mod tests {
    use opera_records::Sps30Record;

    use super::*;

    #[test]
    fn json_payload_resolves_to_a_message() {
        let json = serde_json::to_string(&Message::Sps30(Sps30Record::default())).unwrap();
        let args = SendArgs {
            path: "/tmp/does-not-matter.sock".into(),
            json: Some(json),
            file: None,
        };
        assert!(matches!(
            resolve_message(&args).unwrap(),
            Message::Sps30(_)
        ));
    }

    #[test]
    fn missing_payload_is_a_usage_error() {
        let args = SendArgs {
            path: "/tmp/does-not-matter.sock".into(),
            json: None,
            file: None,
        };
        assert_eq!(resolve_message(&args).unwrap_err().code, crate::exit::USAGE);
    }

    #[test]
    fn malformed_file_is_rejected_before_connecting() {
        let dir = std::env::temp_dir().join(format!("opera-send-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("bad.bin");
        std::fs::write(&file, [0xFFu8, 0xFF]).unwrap();

        let args = SendArgs {
            path: "/tmp/does-not-matter.sock".into(),
            json: None,
            file: Some(file),
        };
        assert_eq!(
            resolve_message(&args).unwrap_err().code,
            crate::exit::DATA_INVALID
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
