//! One-shot tagged message delivery over Unix domain sockets.
//!
//! Each connection carries exactly one message: the sender connects,
//! writes the tag and payload, and closes; the receiver accepts, drains
//! the connection to end-of-stream, decodes, and only then accepts the
//! next connection. There is no message-length envelope — the record's
//! internal counts self-delimit the payload, and a premature end-of-stream
//! mid-field is a truncation error, never end-of-message.
//!
//! All I/O is blocking. No timeout or cancellation policy is imposed here;
//! callers wrap these calls with their own deadlines if they need them.

pub mod endpoint;
pub mod error;
pub mod receiver;
pub mod sender;

pub use endpoint::EndpointConfig;
pub use error::{Result, TransportError};
pub use receiver::MessageReceiver;
pub use sender::MessageSender;
