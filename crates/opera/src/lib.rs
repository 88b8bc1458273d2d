//! Data-interchange layer for Opera particle-sensor nodes.
//!
//! opera ties together the positional wire codec, the type-tagged record
//! registry, and the one-shot Unix-socket transport that node daemons
//! use to hand sensor readings and file-write jobs to each other.
//!
//! # Crate Structure
//!
//! - [`wire`] — Positional little-endian codec primitives
//! - [`records`] — Record model, tag registry, and output-job projections
//! - [`transport`] — One-message-per-connection Unix socket endpoints

/// Re-export codec primitives.
pub mod wire {
    pub use opera_wire::*;
}

/// Re-export record types.
pub mod records {
    pub use opera_records::*;
}

/// Re-export transport types.
pub mod transport {
    pub use opera_transport::*;
}
