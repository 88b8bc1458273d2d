use std::fmt;

use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::job::csv_quote;
use crate::record::{OutputRecord, Record};

/// The fused pipeline output: the ML pm2.5 estimate and classification
/// beside the cross-check and ambient readings it was derived from.
///
/// The classifier labels and probabilities are parallel vectors sharing one
/// wire count, taken from the label vector on encode. The decoder sizes
/// both from that count — it trusts the wire, never cross-field
/// consistency supplied upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub unix_sec: u32,
    pub serial: String,

    pub pm2p5: f32,
    pub class_label: String,
    pub class_labels: Vec<String>,
    pub class_probs: Vec<f32>,

    pub temp: f32,
    pub rh: f32,
    pub sps30_pm2p5: f32,
    pub pressure: f32,
    pub co2: u32,
    pub voc_index: i32,
}

impl Record for AggregateRecord {
    const TAG: &'static str = "O";

    fn encode(&self, w: &mut WireWriter) {
        w.put_u32(self.unix_sec);
        w.put_string(&self.serial);
        w.put_f32(self.pm2p5);
        w.put_string(&self.class_label);
        w.put_count(self.class_labels.len());
        for label in &self.class_labels {
            w.put_string(label);
        }
        for prob in &self.class_probs {
            w.put_f32(*prob);
        }
        w.put_f32(self.temp);
        w.put_f32(self.rh);
        w.put_f32(self.sps30_pm2p5);
        w.put_f32(self.pressure);
        w.put_u32(self.co2);
        w.put_i32(self.voc_index);
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let unix_sec = r.u32()?;
        let serial = r.string()?;
        let pm2p5 = r.f32()?;
        let class_label = r.string()?;
        // Each of the N entries needs a 4-byte string length plus a 4-byte
        // probability at minimum.
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
            serial,
            pm2p5,
            class_label,
            class_labels,
            class_probs,
            temp: r.f32()?,
            rh: r.f32()?,
            sps30_pm2p5: r.f32()?,
            pressure: r.f32()?,
            co2: r.u32()?,
            voc_index: r.i32()?,
        })
    }
}

impl OutputRecord for AggregateRecord {
    const LABEL: &'static str = "Output";
    const CSV_HEADERS: &'static str =
        "unix,portenta,pm2p5,class_label,class_labels,class_probs,temp,rh,sps30_pm2p5,pressure,co2,voc_index";

    fn unix_sec(&self) -> u32 {
        self.unix_sec
    }

    fn serial(&self) -> &str {
        &self.serial
    }

    fn csv_rows(&self) -> Vec<String> {
        let labels = self.class_labels.join(",");
        let probs = self
            .class_probs
            .iter()
            .map(|p| format!("{p:.1}"))
            .collect::<Vec<_>>()
            .join(",");
        vec![format!(
            "{},{},{:.1},{},{},{},{:.1},{:.1},{:.1},{:.1},{},{}",
            self.unix_sec,
            self.serial,
            self.pm2p5,
            csv_quote(&self.class_label),
            csv_quote(&labels),
            csv_quote(&probs),
            self.temp,
            self.rh,
            self.sps30_pm2p5,
            self.pressure,
            self.co2,
            self.voc_index,
        )]
    }
}

impl fmt::Display for AggregateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Output | Unix {} | PM2.5 {:.1} ({}) | SPS30 PM2.5 {:.1} | Temp {:.1}, RH {:.1} | CO2 {}, VOC {}]",
            self.unix_sec,
            self.pm2p5,
            self.class_label,
            self.sps30_pm2p5,
            self.temp,
            self.rh,
            self.co2,
            self.voc_index
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DecodeError;
    use opera_wire::WireError;

    pub(crate) fn sample_aggregate() -> AggregateRecord {
        AggregateRecord {
            unix_sec: 12,
            serial: "abcdefg".into(),
            pm2p5: -0.5,
            class_label: "Lemons".into(),
            class_labels: vec!["crocodiles".into(), "alligators".into(), "handbags".into()],
            class_probs: vec![0.3, 0.2, 0.5111],
            temp: 199.2,
            rh: -0.3,
            sps30_pm2p5: 12.12,
            pressure: 101.2,
            co2: 1000,
            voc_index: 14,
        }
    }

    #[test]
    fn roundtrip_preserves_label_order() {
        let record = sample_aggregate();
        let decoded = AggregateRecord::unpack(&record.pack()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.class_labels[0], "crocodiles");
        assert_eq!(decoded.class_labels[2], "handbags");
    }

    #[test]
    fn roundtrip_empty_classifier_output() {
        let record = AggregateRecord {
            class_labels: Vec::new(),
            class_probs: Vec::new(),
            ..sample_aggregate()
        };
        assert_eq!(AggregateRecord::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn decoder_sizes_both_vectors_from_the_wire_count() {
        // Caller constructed mismatched vectors upstream: 3 labels, 5 probs.
        // The wire carries N = 3, so decode returns 3 of each.
        let record = AggregateRecord {
            class_probs: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            ..sample_aggregate()
        };
        // The two surplus probabilities still land on the wire, where they
        // collide with the trailing fixed fields; re-encode a consistent
        // buffer by hand to model what a conforming producer emits.
        let mut w = WireWriter::new();
        let consistent = AggregateRecord {
            class_probs: vec![0.1, 0.2, 0.3],
            ..record.clone()
        };
        consistent.encode(&mut w);
        let decoded = AggregateRecord::unpack(&w.finish()).unwrap();
        assert_eq!(decoded.class_labels.len(), 3);
        assert_eq!(decoded.class_probs.len(), 3);
        assert_eq!(decoded.class_probs, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn mismatched_vectors_fail_closed_not_silently() {
        // With surplus probabilities the payload no longer lines up with the
        // trailing fields; the decoder must error, never misattribute bytes.
        let record = AggregateRecord {
            class_probs: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            ..sample_aggregate()
        };
        assert!(matches!(
            AggregateRecord::unpack(&record.pack()),
            Err(DecodeError::Wire(WireError::Format(_)))
        ));
    }

    #[test]
    fn truncation_inside_label_vector_fails() {
        let bytes = sample_aggregate().pack();
        for cut in 0..bytes.len() {
            assert!(AggregateRecord::unpack(&bytes[..cut]).is_err());
        }
    }

    #[test]
    fn csv_quotes_list_fields() {
        let jobs = sample_aggregate().csv_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].content.contains("\"crocodiles,alligators,handbags\""));
        assert!(jobs[0].content.contains("\"0.3,0.2,0.5\""));
        assert!(jobs[0].content.contains("\"Lemons\""));
        assert_eq!(jobs[0].headers, AggregateRecord::CSV_HEADERS);
    }
}
