use std::fmt;

use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::primary::Pulse;
use crate::record::Record;

/// Raw pulse batch for one detector channel, handed to the ML worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlInputRecord {
    pub laser: u8,
    pub pd0: u8,
    pub pd1: u8,
    pub ms_read: u32,
    pub baseline0: f32,
    pub baseline1: f32,
    pub pulses: Vec<Pulse>,
}

impl Record for MlInputRecord {
    const TAG: &'static str = "I";

    fn encode(&self, w: &mut WireWriter) {
        w.put_u8(self.laser);
        w.put_u8(self.pd0);
        w.put_u8(self.pd1);
        w.put_u32(self.ms_read);
        w.put_f32(self.baseline0);
        w.put_f32(self.baseline1);
        w.put_count(self.pulses.len());
        for pulse in &self.pulses {
            pulse.encode(w);
        }
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let laser = r.u8()?;
        let pd0 = r.u8()?;
        let pd1 = r.u8()?;
        let ms_read = r.u32()?;
        let baseline0 = r.f32()?;
        let baseline1 = r.f32()?;
        let pulse_count = r.count(Pulse::WIRE_SIZE)?;
        let mut pulses = Vec::with_capacity(pulse_count);
        for _ in 0..pulse_count {
            pulses.push(Pulse::decode(r)?);
        }
        Ok(Self {
            laser,
            pd0,
            pd1,
            ms_read,
            baseline0,
            baseline1,
            pulses,
        })
    }
}

impl fmt::Display for MlInputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ML Input | Laser {}, PD {},{} | {} ms | Baselines {:.2} & {:.2} | {} Pulse(s)]",
            self.laser,
            self.pd0,
            self.pd1,
            self.ms_read,
            self.baseline0,
            self.baseline1,
            self.pulses.len()
        )
    }
}

/// Scalar and classifier results returned by the ML worker.
///
/// Labels and probabilities are parallel vectors under one shared wire
/// count, like [`AggregateRecord`](crate::aggregate::AggregateRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlOutputRecord {
    pub unix_sec: u32,
    pub temp: f32,
    pub rh: f32,
    pub pm2p5: f32,
    pub class_labels: Vec<String>,
    pub class_probs: Vec<f32>,
}

impl MlOutputRecord {
    /// The label with the highest probability, if any.
    pub fn top_class(&self) -> Option<&str> {
        let mut best: Option<(usize, f32)> = None;
        for (i, prob) in self.class_probs.iter().enumerate() {
            match best {
                Some((_, p)) if *prob <= p => {}
                _ => best = Some((i, *prob)),
            }
        }
        best.and_then(|(i, _)| self.class_labels.get(i).map(String::as_str))
    }
}

impl Record for MlOutputRecord {
    const TAG: &'static str = "L";

    fn encode(&self, w: &mut WireWriter) {
        w.put_u32(self.unix_sec);
        w.put_f32(self.temp);
        w.put_f32(self.rh);
        w.put_f32(self.pm2p5);
        w.put_count(self.class_labels.len());
        for label in &self.class_labels {
            w.put_string(label);
        }
        for prob in &self.class_probs {
            w.put_f32(*prob);
        }
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let unix_sec = r.u32()?;
        let temp = r.f32()?;
        let rh = r.f32()?;
        let pm2p5 = r.f32()?;
        let n = r.count(8)?;
        let mut class_labels = Vec::with_capacity(n);
        for _ in 0..n {
            class_labels.push(r.string()?);
        }
        let mut class_probs = Vec::with_capacity(n);
        for _ in 0..n {
            class_probs.push(r.f32()?);
        }
        Ok(Self {
            unix_sec,
            temp,
            rh,
            pm2p5,
            class_labels,
            class_probs,
        })
    }
}

impl fmt::Display for MlOutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ML Output | Unix {} | PM2.5 {:.3} | Temp {:.1}, RH {:.1} | Class {}]",
            self.unix_sec,
            self.pm2p5,
            self.temp,
            self.rh,
            self.top_class().unwrap_or("-")
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_ml_input() -> MlInputRecord {
        MlInputRecord {
            laser: 12,
            pd0: 13,
            pd1: 14,
            ms_read: 102,
            baseline0: 12.3,
            baseline1: 54.3,
            pulses: vec![Pulse {
                raw_peak: 100,
                side_peak: 200,
                indices: [1, 2, 3, 4, 5, 6, 7, 8],
            }],
        }
    }

    pub(crate) fn sample_ml_output() -> MlOutputRecord {
        MlOutputRecord {
            unix_sec: 1_700_000_123,
            temp: 21.5,
            rh: 44.0,
            pm2p5: 3.125,
            class_labels: vec!["smoke".into(), "dust".into(), "pollen".into()],
            class_probs: vec![0.1, 0.7, 0.2],
        }
    }

    #[test]
    fn ml_input_roundtrip() {
        let record = sample_ml_input();
        assert_eq!(MlInputRecord::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn ml_input_roundtrip_no_pulses() {
        let record = MlInputRecord {
            pulses: Vec::new(),
            ..sample_ml_input()
        };
        assert_eq!(MlInputRecord::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn ml_input_layout_is_positional() {
        let bytes = sample_ml_input().pack();
        assert_eq!(bytes[0], 12); // laser
        assert_eq!(bytes[1], 13); // pd0
        assert_eq!(bytes[2], 14); // pd1
        assert_eq!(&bytes[3..7], &102u32.to_le_bytes());
    }

    #[test]
    fn ml_output_roundtrip() {
        let record = sample_ml_output();
        assert_eq!(MlOutputRecord::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn top_class_follows_probabilities() {
        let record = sample_ml_output();
        assert_eq!(record.top_class(), Some("dust"));

        let empty = MlOutputRecord {
            class_labels: Vec::new(),
            class_probs: Vec::new(),
            ..record
        };
        assert_eq!(empty.top_class(), None);
    }

    #[test]
    fn ml_output_truncation_fails_at_every_cut() {
        let bytes = sample_ml_output().pack();
        for cut in 0..bytes.len() {
            assert!(MlOutputRecord::unpack(&bytes[..cut]).is_err());
        }
    }
}
