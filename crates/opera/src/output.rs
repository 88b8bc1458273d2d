use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use opera_records::Message;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    tag: &'a str,
    kind: &'a str,
    received_at: String,
    message: &'a Message,
}

pub fn print_message(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                tag: message.tag(),
                kind: message.kind_name(),
                received_at: now_unix_seconds(),
                message,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            println!("[{}] {}", message.kind_name(), message);
        }
        OutputFormat::Raw => {
            print_raw(&message.encode());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use opera_records::Sps30Record;

    use super::*;

    #[test]
    fn json_output_carries_tag_and_kind() {
        let message = Message::Sps30(Sps30Record::default());
        let out = MessageOutput {
            tag: message.tag(),
            kind: message.kind_name(),
            received_at: "0".to_string(),
            message: &message,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&out).unwrap()).unwrap();
        assert_eq!(value["tag"], "S");
        assert_eq!(value["kind"], "sps30");
    }
}
