/// Errors that can occur while decoding the wire format.
///
/// The format carries no synchronization markers, so either variant is
/// connection-fatal: the only safe response is to abandon the stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The input ended before a field was fully read.
    #[error("truncated message: {needed} byte(s) needed, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A declared length or count is structurally impossible given the
    /// remaining input.
    #[error("malformed message: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
