use std::fmt;

use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Optical particle-counter output: four mass-concentration bins, five
/// number-concentration bins, and the typical particle size.
///
/// Fixed shape on the wire: exactly ten consecutive little-endian `f32`
/// values — no header, no count, 40 bytes total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sps30Record {
    pub pm1: f32,
    pub pm2p5: f32,
    pub pm4: f32,
    pub pm10: f32,
    pub pn0p5: f32,
    pub pn1: f32,
    pub pn2p5: f32,
    pub pn4: f32,
    pub pn10: f32,
    pub typical_particle_size: f32,
}

impl Sps30Record {
    /// Exact packed size.
    pub const WIRE_SIZE: usize = 10 * 4;

    fn fields(&self) -> [f32; 10] {
        [
            self.pm1,
            self.pm2p5,
            self.pm4,
            self.pm10,
            self.pn0p5,
            self.pn1,
            self.pn2p5,
            self.pn4,
            self.pn10,
            self.typical_particle_size,
        ]
    }
}

impl Record for Sps30Record {
    const TAG: &'static str = "S";

    fn encode(&self, w: &mut WireWriter) {
        for value in self.fields() {
            w.put_f32(value);
        }
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        Ok(Self {
            pm1: r.f32()?,
            pm2p5: r.f32()?,
            pm4: r.f32()?,
            pm10: r.f32()?,
            pn0p5: r.f32()?,
            pn1: r.f32()?,
            pn2p5: r.f32()?,
            pn4: r.f32()?,
            pn10: r.f32()?,
            typical_particle_size: r.f32()?,
        })
    }
}

impl fmt::Display for Sps30Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SPS30 | PM 1: {:.1}, 2.5: {:.1}, 4: {:.1}, 10: {:.1} | PN .5: {:.1}, 1: {:.1}, 2.5: {:.1}, 4: {:.1}, 10: {:.1}]",
            self.pm1,
            self.pm2p5,
            self.pm4,
            self.pm10,
            self.pn0p5,
            self.pn1,
            self.pn2p5,
            self.pn4,
            self.pn10
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DecodeError;
    use opera_wire::WireError;

    pub(crate) fn sample_sps30() -> Sps30Record {
        Sps30Record {
            pm1: 1.0,
            pm2p5: 2.0,
            pm4: 3.0,
            pm10: 4.0,
            pn0p5: 5.0,
            pn1: 6.0,
            pn2p5: 7.0,
            pn4: 8.0,
            pn10: 9.0,
            typical_particle_size: 10.0,
        }
    }

    #[test]
    fn packs_to_exactly_forty_little_endian_bytes() {
        let bytes = sample_sps30().pack();
        assert_eq!(bytes.len(), Sps30Record::WIRE_SIZE);
        // No header: the first four bytes are pm1 = 1.0f32 little-endian.
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[36..], &10.0f32.to_le_bytes());
    }

    #[test]
    fn roundtrip() {
        let record = sample_sps30();
        assert_eq!(Sps30Record::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn thirty_nine_bytes_is_truncated() {
        let bytes = sample_sps30().pack();
        let err = Sps30Record::unpack(&bytes[..39]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Wire(WireError::Truncated {
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn zero_record_roundtrips() {
        let record = Sps30Record::default();
        assert_eq!(Sps30Record::unpack(&record.pack()).unwrap(), record);
    }
}
