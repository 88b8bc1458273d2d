use std::fmt;

use bytes::Bytes;
use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateRecord;
use crate::error::{DecodeError, Result};
use crate::job::{BinaryWriteJob, CsvWriteJob};
use crate::ml::{MlInputRecord, MlOutputRecord};
use crate::primary::PrimaryRecord;
use crate::record::Record;
use crate::secondary::SecondaryRecord;
use crate::sps30::Sps30Record;

/// The closed set of record kinds that travel over a socket.
///
/// On the wire a message is the kind's tag (a length-prefixed ASCII
/// string) followed by the packed payload. Dispatch is exhaustive matching
/// on the tag; there is no runtime type inspection and no way to register
/// a kind at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Primary(PrimaryRecord),
    Secondary(SecondaryRecord),
    Sps30(Sps30Record),
    Aggregate(AggregateRecord),
    MlInput(MlInputRecord),
    MlOutput(MlOutputRecord),
    CsvJob(CsvWriteJob),
    BinaryJob(BinaryWriteJob),
}

impl Message {
    /// The wire discriminator for this message's kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Message::Primary(_) => PrimaryRecord::TAG,
            Message::Secondary(_) => SecondaryRecord::TAG,
            Message::Sps30(_) => Sps30Record::TAG,
            Message::Aggregate(_) => AggregateRecord::TAG,
            Message::MlInput(_) => MlInputRecord::TAG,
            Message::MlOutput(_) => MlOutputRecord::TAG,
            Message::CsvJob(_) => CsvWriteJob::TAG,
            Message::BinaryJob(_) => BinaryWriteJob::TAG,
        }
    }

    /// Human-readable kind name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Message::Primary(_) => "primary",
            Message::Secondary(_) => "secondary",
            Message::Sps30(_) => "sps30",
            Message::Aggregate(_) => "aggregate",
            Message::MlInput(_) => "ml-input",
            Message::MlOutput(_) => "ml-output",
            Message::CsvJob(_) => "csv-job",
            Message::BinaryJob(_) => "binary-job",
        }
    }

    /// Encode the tag followed by the packed payload.
    pub fn encode(&self) -> Bytes {
        let mut w = WireWriter::new();
        w.put_string(self.tag());
        match self {
            Message::Primary(record) => record.encode(&mut w),
            Message::Secondary(record) => record.encode(&mut w),
            Message::Sps30(record) => record.encode(&mut w),
            Message::Aggregate(record) => record.encode(&mut w),
            Message::MlInput(record) => record.encode(&mut w),
            Message::MlOutput(record) => record.encode(&mut w),
            Message::CsvJob(record) => record.encode(&mut w),
            Message::BinaryJob(record) => record.encode(&mut w),
        }
        w.finish()
    }

    /// Decode one complete tagged message.
    ///
    /// An unrecognized tag fails as [`DecodeError::UnknownTag`] without the
    /// payload being touched. Every byte must be consumed; the format has
    /// no synchronization markers, so any failure here is connection-fatal
    /// for a streaming caller.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(bytes);
        let tag = r.string()?;
        let message = match tag.as_str() {
            PrimaryRecord::TAG => Message::Primary(PrimaryRecord::decode(&mut r)?),
            SecondaryRecord::TAG => Message::Secondary(SecondaryRecord::decode(&mut r)?),
            Sps30Record::TAG => Message::Sps30(Sps30Record::decode(&mut r)?),
            AggregateRecord::TAG => Message::Aggregate(AggregateRecord::decode(&mut r)?),
            MlInputRecord::TAG => Message::MlInput(MlInputRecord::decode(&mut r)?),
            MlOutputRecord::TAG => Message::MlOutput(MlOutputRecord::decode(&mut r)?),
            CsvWriteJob::TAG => Message::CsvJob(CsvWriteJob::decode(&mut r)?),
            BinaryWriteJob::TAG => Message::BinaryJob(BinaryWriteJob::decode(&mut r)?),
            _ => return Err(DecodeError::UnknownTag(tag)),
        };
        r.finish()?;
        Ok(message)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Primary(record) => fmt::Display::fmt(record, f),
            Message::Secondary(record) => fmt::Display::fmt(record, f),
            Message::Sps30(record) => fmt::Display::fmt(record, f),
            Message::Aggregate(record) => fmt::Display::fmt(record, f),
            Message::MlInput(record) => fmt::Display::fmt(record, f),
            Message::MlOutput(record) => fmt::Display::fmt(record, f),
            Message::CsvJob(record) => fmt::Display::fmt(record, f),
            Message::BinaryJob(record) => fmt::Display::fmt(record, f),
        }
    }
}

macro_rules! impl_from_record {
    ($($variant:ident => $record:ty),* $(,)?) => {
        $(
            impl From<$record> for Message {
                fn from(record: $record) -> Self {
                    Message::$variant(record)
                }
            }
        )*
    };
}

impl_from_record! {
    Primary => PrimaryRecord,
    Secondary => SecondaryRecord,
    Sps30 => Sps30Record,
    Aggregate => AggregateRecord,
    MlInput => MlInputRecord,
    MlOutput => MlOutputRecord,
    CsvJob => CsvWriteJob,
    BinaryJob => BinaryWriteJob,
}
