use bytes::Bytes;
use opera_wire::{WireReader, WireWriter};

use crate::error::{DecodeError, Result};
use crate::job::{generate_file_name, BinaryWriteJob, CsvWriteJob, FileFormat};

/// A positionally encoded telemetry or ML-result value.
///
/// `encode`/`decode` walk the declared field order; `pack`/`unpack` are the
/// byte-level entry points. The codec is pure and re-entrant: it allocates
/// and returns independent values, safe to call concurrently on independent
/// inputs.
pub trait Record: Sized {
    /// Wire discriminator for this kind (a length-prefixed ASCII string on
    /// the wire, like any other string).
    const TAG: &'static str;

    /// Append this record's fields, in declared order.
    fn encode(&self, w: &mut WireWriter);

    /// Read this record's fields, in declared order.
    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self>;

    /// Pack into an owned byte buffer.
    fn pack(&self) -> Bytes {
        let mut w = WireWriter::new();
        self.encode(&mut w);
        w.finish()
    }

    /// Unpack from a complete encoded buffer.
    ///
    /// All-or-nothing: short input fails as `Truncated`, impossible counts
    /// as `Format`, and any unconsumed trailing bytes as `Format`. The
    /// decoded value owns all of its data.
    fn unpack(bytes: &[u8]) -> Result<Self> {
        let mut r = WireReader::new(bytes);
        let record = Self::decode(&mut r)?;
        r.finish()?;
        Ok(record)
    }
}

/// A record kind that projects onto persistent-storage write jobs.
///
/// CSV output yields one row per logical sub-entity (a [`PrimaryRecord`]
/// produces one row per counts channel); binary output is the packed record
/// verbatim. Filenames depend only on serial, label, and the UTC calendar
/// date of the record's timestamp.
///
/// [`PrimaryRecord`]: crate::primary::PrimaryRecord
pub trait OutputRecord: Record {
    /// Filename label for this kind (`OPERA_<serial>_<label>_<date>.<ext>`).
    const LABEL: &'static str;

    /// Fixed CSV header line for this kind.
    const CSV_HEADERS: &'static str;

    fn unix_sec(&self) -> u32;

    fn serial(&self) -> &str;

    /// Formatted CSV rows, one per logical sub-entity.
    fn csv_rows(&self) -> Vec<String>;

    fn csv_jobs(&self) -> Vec<CsvWriteJob> {
        let filename =
            generate_file_name(self.serial(), Self::LABEL, self.unix_sec(), FileFormat::Csv);
        self.csv_rows()
            .into_iter()
            .map(|content| CsvWriteJob {
                filename: filename.clone(),
                headers: Self::CSV_HEADERS.to_string(),
                content,
            })
            .collect()
    }

    fn binary_jobs(&self) -> Vec<BinaryWriteJob> {
        vec![BinaryWriteJob {
            filename: generate_file_name(
                self.serial(),
                Self::LABEL,
                self.unix_sec(),
                FileFormat::Binary,
            ),
            content: self.pack().to_vec(),
        }]
    }
}
