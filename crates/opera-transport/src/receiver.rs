use std::io::{ErrorKind, Read};
use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use opera_records::Message;

use crate::error::{Result, TransportError};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Receives tagged messages on one named endpoint, one connection per
/// message.
///
/// `recv` takes `&mut self`, which serializes acceptance by construction:
/// one connection is fully drained (decoded or failed) before the next is
/// accepted, so bytes from two concurrent senders can never interleave
/// into one decode.
pub struct MessageReceiver {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
}

impl MessageReceiver {
    /// Permission mode applied to created socket paths.
    pub const DEFAULT_SOCKET_MODE: u32 = 0o600;

    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind and listen on a filesystem-path Unix domain socket.
    ///
    /// If the path already exists and is a socket it is removed first
    /// (stale socket cleanup); an existing non-socket file is refused.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_mode(path, Self::DEFAULT_SOCKET_MODE)
    }

    /// Bind with an explicit socket file mode.
    pub fn bind_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        // Remove stale socket if it exists, but never remove non-socket files.
        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale socket");
                std::fs::remove_file(&path).map_err(|e| TransportError::Bind {
                    path: path.clone(),
                    source: e,
                })?;
            } else {
                return Err(TransportError::Bind {
                    path: path.clone(),
                    source: std::io::Error::new(
                        ErrorKind::AlreadyExists,
                        "existing path is not a unix socket",
                    ),
                });
            }
        }

        let listener = UnixListener::bind(&path).map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
            TransportError::Bind {
                path: path.clone(),
                source: e,
            }
        })?;
        let created_metadata =
            std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
                path: path.clone(),
                source: e,
            })?;
        let created_inode = Some((created_metadata.dev(), created_metadata.ino()));

        info!(?path, "listening for messages");

        Ok(Self {
            listener,
            path,
            created_inode,
        })
    }

    /// The path this receiver is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept one connection, drain it to end-of-stream, and decode
    /// exactly one message (blocking).
    ///
    /// The sender's close marks the message boundary; an end-of-stream
    /// that arrives mid-field decodes as a truncation error. Either way
    /// the connection is gone by the time this returns, so every decode
    /// failure here is final for that message.
    pub fn recv(&mut self) -> Result<Message> {
        let (stream, _addr) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(path = ?self.path, "accepted connection");

        let bytes = match drain(stream) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = ?self.path, %err, "failed draining connection");
                return Err(TransportError::Io(err));
            }
        };
        let message = Message::decode(&bytes)?;
        debug!(
            path = ?self.path,
            kind = message.kind_name(),
            len = bytes.len(),
            "received message"
        );
        Ok(message)
    }
}

/// Read a connection to EOF, retrying interrupted reads.
fn drain(mut stream: UnixStream) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Ok(bytes),
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

impl Drop for MessageReceiver {
    fn drop(&mut self) {
        // Only unlink the path if it is still the socket this receiver
        // created; a replaced path belongs to someone else.
        if let Some((expected_dev, expected_ino)) = self.created_inode {
            if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
                if metadata.file_type().is_socket()
                    && metadata.dev() == expected_dev
                    && metadata.ino() == expected_ino
                {
                    debug!(path = ?self.path, "cleaning up socket file");
                    let _ = std::fs::remove_file(&self.path);
                } else {
                    debug!(path = ?self.path, "socket path identity changed; skipping cleanup");
                }
            }
        }
    }
}
