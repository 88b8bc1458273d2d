use std::io::{ErrorKind, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::debug;

use opera_records::Message;

use crate::error::{Result, TransportError};

/// Delivers tagged messages to one named endpoint, one connection per
/// message.
///
/// Holds no connection state: every [`send`](Self::send) opens a fresh
/// stream, writes the tag and payload, and closes. A failed connect is
/// returned as [`TransportError::Connect`] without any retry.
#[derive(Debug, Clone)]
pub struct MessageSender {
    path: PathBuf,
}

impl MessageSender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The endpoint this sender delivers to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deliver one message and close the connection.
    pub fn send(&self, message: &Message) -> Result<()> {
        let mut stream =
            UnixStream::connect(&self.path).map_err(|e| TransportError::Connect {
                path: self.path.clone(),
                source: e,
            })?;

        let bytes = message.encode();
        write_all_retrying(&mut stream, &bytes)?;
        stream.flush()?;
        debug!(
            path = ?self.path,
            kind = message.kind_name(),
            len = bytes.len(),
            "sent message"
        );
        // Dropping the stream closes it; the peer sees EOF as the message
        // boundary.
        Ok(())
    }
}

fn write_all_retrying(stream: &mut UnixStream, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        match stream.write(buf) {
            Ok(0) => {
                return Err(TransportError::Io(std::io::Error::new(
                    ErrorKind::WriteZero,
                    "connection closed mid-write",
                )))
            }
            Ok(n) => buf = &buf[n..],
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_to_missing_endpoint_is_connect_error() {
        let sender = MessageSender::new("/nonexistent/opera-test.sock");
        let message = Message::Sps30(opera_records::Sps30Record::default());
        let err = sender.send(&message).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
