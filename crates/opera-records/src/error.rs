use opera_wire::WireError;

/// Errors that can occur while decoding a record or a tagged message.
///
/// All of these are connection-fatal when they surface from a stream: the
/// wire format has no resynchronization markers, so the caller must close
/// the connection rather than attempt recovery.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The payload was truncated or structurally malformed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The leading discriminator does not name a registered record kind.
    /// The payload is not touched.
    #[error("unknown record tag {0:?}")]
    UnknownTag(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
