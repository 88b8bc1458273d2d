use std::fmt;

use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::record::Record;

pub const CSV_FILE_EXTENSION: &str = ".csv";
pub const BINARY_FILE_EXTENSION: &str = ".raw";

/// Output file format selector for [`generate_file_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Binary,
}

impl FileFormat {
    fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => CSV_FILE_EXTENSION,
            FileFormat::Binary => BINARY_FILE_EXTENSION,
        }
    }
}

/// Deterministic output filename: `OPERA_<serial>_<label>_<YYYYMMDD>.<ext>`.
///
/// The date is the UTC calendar date of `unix_sec`. Pure: the same
/// (serial, label, calendar date, format) always yields the same name,
/// independent of time-of-day.
pub fn generate_file_name(serial: &str, label: &str, unix_sec: u32, format: FileFormat) -> String {
    let (year, month, day) = civil_date_utc(unix_sec);
    format!(
        "OPERA_{serial}_{label}_{year:04}{month:02}{day:02}{}",
        format.extension()
    )
}

/// Gregorian (year, month, day) in UTC for a unix timestamp.
///
/// Days-from-epoch civil calendar conversion (Hinnant's `civil_from_days`).
fn civil_date_utc(unix_sec: u32) -> (i64, u32, u32) {
    let days = i64::from(unix_sec) / 86_400;
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u32, day as u32)
}

/// One CSV file append destined for a storage writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvWriteJob {
    pub filename: String,
    pub headers: String,
    pub content: String,
}

impl Record for CsvWriteJob {
    const TAG: &'static str = "C";

    fn encode(&self, w: &mut WireWriter) {
        w.put_string(&self.filename);
        w.put_string(&self.headers);
        w.put_string(&self.content);
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        Ok(Self {
            filename: r.string()?,
            headers: r.string()?,
            content: r.string()?,
        })
    }
}

impl fmt::Display for CsvWriteJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[File: {}, Headers: {}, Content: {}]",
            self.filename, self.headers, self.content
        )
    }
}

/// One raw binary file append destined for a storage writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryWriteJob {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Record for BinaryWriteJob {
    const TAG: &'static str = "B";

    fn encode(&self, w: &mut WireWriter) {
        w.put_string(&self.filename);
        w.put_count(self.content.len());
        w.put_bytes(&self.content);
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let filename = r.string()?;
        let len = r.count(1)?;
        let content = r.bytes(len)?.to_vec();
        Ok(Self { filename, content })
    }
}

impl fmt::Display for BinaryWriteJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[File: {}, Content: {} Bytes]",
            self.filename,
            self.content.len()
        )
    }
}

/// Wrap a CSV field that may embed commas (free text, list renderings) in
/// double quotes.
pub(crate) fn csv_quote(field: &str) -> String {
    format!("\"{field}\"")
}
