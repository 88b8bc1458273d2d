use std::io::Read;

use opera_records::Message;

use crate::cmd::DecodeArgs;
use crate::exit::{decode_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = match &args.file {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|err| io_error("failed reading stdin", err))?;
            bytes
        }
    };

    let message =
        Message::decode(&bytes).map_err(|err| decode_error("message does not decode", err))?;
    print_message(&message, format);
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use opera_records::Sps30Record;

    use super::*;
    use crate::exit::DATA_INVALID;

    fn test_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("opera-decode-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn decodes_an_encoded_message_file() {
        let dir = test_dir("ok");
        let file = dir.join("message.bin");
        std::fs::write(&file, Message::Sps30(Sps30Record::default()).encode()).unwrap();

        let result = run(
            DecodeArgs { file: Some(file) },
            OutputFormat::Json,
        );
        assert_eq!(result.unwrap(), SUCCESS);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn truncated_file_maps_to_data_invalid() {
        let dir = test_dir("short");
        let file = dir.join("message.bin");
        let bytes = Message::Sps30(Sps30Record::default()).encode();
        std::fs::write(&file, &bytes[..bytes.len() - 1]).unwrap();

        let err = run(
            DecodeArgs { file: Some(file) },
            OutputFormat::Json,
        )
        .unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
