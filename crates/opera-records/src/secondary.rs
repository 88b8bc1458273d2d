use std::fmt;

use opera_wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::record::{OutputRecord, Record};
use crate::sps30::Sps30Record;

/// Environmental snapshot for one sampling interval: ambient and flow
/// conditions, board temperatures, and 5V-rail statistics, with the SPS30
/// cross-check output embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryRecord {
    pub unix_sec: u32,
    pub serial: String,

    pub sps30: Sps30Record,
    pub pressure: f32,
    pub co2: u32,
    pub voc_index: i32,
    pub flow_temp: f32,
    pub flow_hum: f32,
    pub flow_rate: f32,

    pub imx8_temp: f32,
    pub mcu_temp: f32,
    pub optical_temps: [f32; 3],
    pub omb_temp_htu: f32,
    pub omb_hum_htu: f32,
    pub omb_temp_scd: f32,
    pub omb_hum_scd: f32,
    pub monitor_5v_mean: f32,
    pub monitor_5v_std_dev: f32,
}

impl Record for SecondaryRecord {
    const TAG: &'static str = "E";

    fn encode(&self, w: &mut WireWriter) {
        w.put_u32(self.unix_sec);
        w.put_string(&self.serial);
        self.sps30.encode(w);
        w.put_f32(self.pressure);
        w.put_u32(self.co2);
        w.put_i32(self.voc_index);
        w.put_f32(self.flow_temp);
        w.put_f32(self.flow_hum);
        w.put_f32(self.flow_rate);
        w.put_f32(self.imx8_temp);
        w.put_f32(self.mcu_temp);
        // Fixed three-element array: no count on the wire.
        for temp in &self.optical_temps {
            w.put_f32(*temp);
        }
        w.put_f32(self.omb_temp_htu);
        w.put_f32(self.omb_hum_htu);
        w.put_f32(self.omb_temp_scd);
        w.put_f32(self.omb_hum_scd);
        w.put_f32(self.monitor_5v_mean);
        w.put_f32(self.monitor_5v_std_dev);
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let unix_sec = r.u32()?;
        let serial = r.string()?;
        let sps30 = Sps30Record::decode(r)?;
        let pressure = r.f32()?;
        let co2 = r.u32()?;
        let voc_index = r.i32()?;
        let flow_temp = r.f32()?;
        let flow_hum = r.f32()?;
        let flow_rate = r.f32()?;
        let imx8_temp = r.f32()?;
        let mcu_temp = r.f32()?;
        let mut optical_temps = [0f32; 3];
        for temp in &mut optical_temps {
            *temp = r.f32()?;
        }
        Ok(Self {
            unix_sec,
            serial,
            sps30,
            pressure,
            co2,
            voc_index,
            flow_temp,
            flow_hum,
            flow_rate,
            imx8_temp,
            mcu_temp,
            optical_temps,
            omb_temp_htu: r.f32()?,
            omb_hum_htu: r.f32()?,
            omb_temp_scd: r.f32()?,
            omb_hum_scd: r.f32()?,
            monitor_5v_mean: r.f32()?,
            monitor_5v_std_dev: r.f32()?,
        })
    }
}

impl OutputRecord for SecondaryRecord {
    const LABEL: &'static str = "SecondaryRaw";
    const CSV_HEADERS: &'static str = "unix,portenta,sps30_pm1,sps30_pm2p5,sps30_pm4,sps30_pm10,\
        sps30_pn0p5,sps30_pn1,sps30_pn2p5,sps30_pn4,sps30_pn10,sps30_tps,pressure,co2,voc_index,\
        flow_temp,flow_hum,flow_rate,imx8_temp,teensy_temp,optical_temp0,optical_temp1,\
        optical_temp2,omb_temp_htu,omb_hum_htu,omb_temp_scd,omg_hum_scd,mean_5v_monitor,\
        std_dev_5v_monitor";

    fn unix_sec(&self) -> u32 {
        self.unix_sec
    }

    fn serial(&self) -> &str {
        &self.serial
    }

    fn csv_rows(&self) -> Vec<String> {
        vec![format!(
            "{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.4},{:.4}",
            self.unix_sec,
            self.serial,
            self.sps30.pm1,
            self.sps30.pm2p5,
            self.sps30.pm4,
            self.sps30.pm10,
            self.sps30.pn0p5,
            self.sps30.pn1,
            self.sps30.pn2p5,
            self.sps30.pn4,
            self.sps30.pn10,
            self.sps30.typical_particle_size,
            self.pressure,
            self.co2,
            self.voc_index,
            self.flow_temp,
            self.flow_hum,
            self.flow_rate,
            self.imx8_temp,
            self.mcu_temp,
            self.optical_temps[0],
            self.optical_temps[1],
            self.optical_temps[2],
            self.omb_temp_htu,
            self.omb_hum_htu,
            self.omb_temp_scd,
            self.omb_hum_scd,
            self.monitor_5v_mean,
            self.monitor_5v_std_dev,
        )]
    }
}

impl fmt::Display for SecondaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Secondary | Unix {} | {} | Pressure {:.1}, CO2 {}, VOC {} | Flow {:.1} degC, {:.1} %, {:.4} m/s]",
            self.unix_sec,
            self.sps30,
            self.pressure,
            self.co2,
            self.voc_index,
            self.flow_temp,
            self.flow_hum,
            self.flow_rate
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DecodeError;
    use opera_wire::WireError;

    pub(crate) fn sample_secondary() -> SecondaryRecord {
        SecondaryRecord {
            unix_sec: 12,
            serial: "abcdefg".into(),
            sps30: crate::sps30::tests::sample_sps30(),
            pressure: 101.2,
            co2: 1000,
            voc_index: 14,
            flow_temp: -10.2,
            flow_hum: 1.0,
            flow_rate: -2.0,
            imx8_temp: 100.0,
            mcu_temp: 32.0,
            optical_temps: [-1.0, 2.0, 100.1],
            omb_temp_htu: 1.0,
            omb_hum_htu: 2.0,
            omb_temp_scd: 22.0,
            omb_hum_scd: 5.0,
            monitor_5v_mean: 10.0,
            monitor_5v_std_dev: 3.1,
        }
    }

    #[test]
    fn roundtrip() {
        let record = sample_secondary();
        assert_eq!(SecondaryRecord::unpack(&record.pack()).unwrap(), record);
    }

    #[test]
    fn embedded_sps30_sits_after_the_serial() {
        let record = sample_secondary();
        let bytes = record.pack();
        let offset = 4 + 4 + record.serial.len();
        assert_eq!(&bytes[offset..offset + 4], &1.0f32.to_le_bytes());
    }

    #[test]
    fn truncation_mid_sps30_fails() {
        let bytes = sample_secondary().pack();
        let err = SecondaryRecord::unpack(&bytes[..20]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Wire(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn nan_fields_survive_the_codec() {
        let mut record = sample_secondary();
        record.flow_temp = f32::NAN;
        record.monitor_5v_std_dev = f32::NAN;
        let decoded = SecondaryRecord::unpack(&record.pack()).unwrap();
        assert!(decoded.flow_temp.is_nan());
        assert!(decoded.monitor_5v_std_dev.is_nan());
        assert_eq!(
            decoded.flow_temp.to_bits(),
            record.flow_temp.to_bits()
        );
    }

    #[test]
    fn csv_single_row() {
        let record = sample_secondary();
        let jobs = record.csv_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0]
            .content
            .starts_with("12,abcdefg,1.0,2.0,3.0,4.0,5.0,6.0,7.0,8.0,9.0,10.0,101.2,1000,14,"));
        assert!(jobs[0].content.ends_with("10.0000,3.1000"));
        assert!(jobs[0].filename.starts_with("OPERA_abcdefg_SecondaryRaw_"));
    }
}
