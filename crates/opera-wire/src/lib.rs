//! Positional little-endian wire format primitives.
//!
//! The OPERA wire format is closed and positional: producer and consumer
//! agree on field order out of band. There is no self-description, no
//! version tag, and no synchronization marker — every record delimits
//! itself through explicit element counts and length-prefixed strings.
//!
//! Ground rules:
//! - Integers are little-endian in their native width.
//! - Floats are IEEE754 binary32, little-endian, passed through bit-exact
//!   (NaN included — hygiene filtering is a caller concern).
//! - Strings are a `u32` byte length followed by raw bytes. No terminator,
//!   no encoding validation.
//! - Sequences are a `u32` element count followed by the elements in order.
//!
//! Decoding is all-or-nothing: a short read is [`WireError::Truncated`], a
//! declared length or count that cannot fit in the remaining input is
//! [`WireError::Format`]. No partially populated value ever escapes.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Result, WireError};
pub use reader::WireReader;
pub use writer::WireWriter;
