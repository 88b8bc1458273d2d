//! OPERA telemetry record model, binary codec, and tagged message registry.
//!
//! Every record kind has a fixed positional wire layout (see [`Record`]) and
//! a short ASCII tag that identifies it when multiplexed over a socket (see
//! [`Message`]). The registry is closed: adding a kind means adding an enum
//! variant and a tag, and the compiler walks every dispatch site.
//!
//! The format is deliberately not self-describing and not forward
//! compatible. Reordering or inserting a field is a breaking change, and no
//! version tag exists to detect it — producer and consumer agree on the
//! layout out of band. An implementer who needs cross-version compatibility
//! must add an explicit version field as a deliberate extension.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod job;
pub mod message;
pub mod ml;
pub mod primary;
pub mod record;
pub mod secondary;
pub mod sps30;

pub use aggregate::AggregateRecord;
pub use config::OutputConfig;
pub use error::{DecodeError, Result};
pub use job::{generate_file_name, BinaryWriteJob, CsvWriteJob, FileFormat};
pub use message::Message;
pub use ml::{MlInputRecord, MlOutputRecord};
pub use primary::{ChannelCounts, PrimaryRecord, Pulse};
pub use record::{OutputRecord, Record};
pub use secondary::SecondaryRecord;
pub use sps30::Sps30Record;
