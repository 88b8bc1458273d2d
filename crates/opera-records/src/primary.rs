use std::fmt;
use std::fmt::Write as _;

use opera_wire::{WireError, WireReader, WireWriter};
use serde::{Deserialize, Serialize};

use crate::job::csv_quote;
use crate::record::{OutputRecord, Record};

/// Timing-index samples captured per optical pulse.
pub const PULSE_INDEX_COUNT: usize = 8;

/// One optical-detector event. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    pub raw_peak: u16,
    pub side_peak: u16,
    pub indices: [u16; PULSE_INDEX_COUNT],
}

impl Pulse {
    /// Exact packed size: two peaks, index count, eight indices.
    pub(crate) const WIRE_SIZE: usize = 2 + 2 + 4 + 2 * PULSE_INDEX_COUNT;

    pub(crate) fn encode(&self, w: &mut WireWriter) {
        w.put_u16(self.raw_peak);
        w.put_u16(self.side_peak);
        // The index array is fixed-shape; the count is carried on the wire
        // anyway so the pulse layout reads like every other sequence.
        w.put_count(PULSE_INDEX_COUNT);
        for index in &self.indices {
            w.put_u16(*index);
        }
    }

    pub(crate) fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let raw_peak = r.u16()?;
        let side_peak = r.u16()?;
        let declared = r.count(2)?;
        if declared != PULSE_INDEX_COUNT {
            return Err(WireError::Format(format!(
                "pulse index count {declared}, layout requires {PULSE_INDEX_COUNT}"
            )));
        }
        let mut indices = [0u16; PULSE_INDEX_COUNT];
        for index in &mut indices {
            *index = r.u16()?;
        }
        Ok(Self {
            raw_peak,
            side_peak,
            indices,
        })
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},[{}", self.raw_peak, self.side_peak, self.indices[0])?;
        for index in &self.indices[1..] {
            write!(f, ",{index}")?;
        }
        write!(f, "])")
    }
}

/// Accumulated statistics for one detector channel, plus the pulses
/// detected in that interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCounts {
    pub pin_pd0: u8,
    pub pin_pd1: u8,
    pub pin_laser: u8,

    pub raw_scalar0: f32,
    pub raw_scalar1: f32,
    pub diffed_scalar0: f32,
    pub diffed_scalar1: f32,

    pub baseline0: f32,
    pub baseline1: f32,

    pub raw_upper_th0: f32,
    pub raw_upper_th1: f32,
    pub diffed_upper_th0: f32,
    pub diffed_upper_th1: f32,

    pub ms_read: u32,
    pub buffers_read: u32,
    pub num_pulses: u32,
    pub max_laser_on: u32,

    pub pulses_per_second: f32,

    pub pulses: Vec<Pulse>,
}

impl ChannelCounts {
    /// Packed size with zero pulses; lower bound used for count validation.
    pub(crate) const MIN_WIRE_SIZE: usize = 3 + 4 * 4 + 2 * 4 + 4 * 4 + 4 * 4 + 4 + 4;

    fn encode(&self, w: &mut WireWriter) {
        w.put_u8(self.pin_pd0);
        w.put_u8(self.pin_pd1);
        w.put_u8(self.pin_laser);

        w.put_f32(self.raw_scalar0);
        w.put_f32(self.raw_scalar1);
        w.put_f32(self.diffed_scalar0);
        w.put_f32(self.diffed_scalar1);

        w.put_f32(self.baseline0);
        w.put_f32(self.baseline1);

        w.put_f32(self.raw_upper_th0);
        w.put_f32(self.raw_upper_th1);
        w.put_f32(self.diffed_upper_th0);
        w.put_f32(self.diffed_upper_th1);

        w.put_u32(self.ms_read);
        w.put_u32(self.buffers_read);
        w.put_u32(self.num_pulses);
        w.put_u32(self.max_laser_on);

        w.put_f32(self.pulses_per_second);

        w.put_count(self.pulses.len());
        for pulse in &self.pulses {
            pulse.encode(w);
        }
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let pin_pd0 = r.u8()?;
        let pin_pd1 = r.u8()?;
        let pin_laser = r.u8()?;

        let raw_scalar0 = r.f32()?;
        let raw_scalar1 = r.f32()?;
        let diffed_scalar0 = r.f32()?;
        let diffed_scalar1 = r.f32()?;

        let baseline0 = r.f32()?;
        let baseline1 = r.f32()?;

        let raw_upper_th0 = r.f32()?;
        let raw_upper_th1 = r.f32()?;
        let diffed_upper_th0 = r.f32()?;
        let diffed_upper_th1 = r.f32()?;

        let ms_read = r.u32()?;
        let buffers_read = r.u32()?;
        let num_pulses = r.u32()?;
        let max_laser_on = r.u32()?;

        let pulses_per_second = r.f32()?;

        let pulse_count = r.count(Pulse::WIRE_SIZE)?;
        let mut pulses = Vec::with_capacity(pulse_count);
        for _ in 0..pulse_count {
            pulses.push(Pulse::decode(r)?);
        }

        Ok(Self {
            pin_pd0,
            pin_pd1,
            pin_laser,
            raw_scalar0,
            raw_scalar1,
            diffed_scalar0,
            diffed_scalar1,
            baseline0,
            baseline1,
            raw_upper_th0,
            raw_upper_th1,
            diffed_upper_th0,
            diffed_upper_th1,
            ms_read,
            buffers_read,
            num_pulses,
            max_laser_on,
            pulses_per_second,
            pulses,
        })
    }
}

impl fmt::Display for ChannelCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Counts {},{}:{} | {} ms, {} Buffers, {} Pulses [{:.3} pulses/s] | Baselines: {:.2} & {:.2}]",
            self.pin_pd0,
            self.pin_pd1,
            self.pin_laser,
            self.ms_read,
            self.buffers_read,
            self.num_pulses,
            self.pulses_per_second,
            self.baseline0,
            self.baseline1
        )
    }
}

/// One sampling interval of raw particle-pulse data: high-voltage supply
/// state plus one [`ChannelCounts`] per detector channel, keyed by device
/// serial and unix timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryRecord {
    pub unix_sec: u32,
    pub serial: String,

    pub hv_enabled: bool,
    pub hv_set: u8,
    pub hv_monitor: u16,

    pub counts: Vec<ChannelCounts>,
}

impl Record for PrimaryRecord {
    const TAG: &'static str = "T";

    fn encode(&self, w: &mut WireWriter) {
        w.put_u32(self.unix_sec);
        w.put_string(&self.serial);
        w.put_bool(self.hv_enabled);
        w.put_u8(self.hv_set);
        w.put_u16(self.hv_monitor);
        w.put_count(self.counts.len());
        for counts in &self.counts {
            counts.encode(w);
        }
    }

    fn decode(r: &mut WireReader<'_>) -> opera_wire::Result<Self> {
        let unix_sec = r.u32()?;
        let serial = r.string()?;
        let hv_enabled = r.bool()?;
        let hv_set = r.u8()?;
        let hv_monitor = r.u16()?;
        let channel_count = r.count(ChannelCounts::MIN_WIRE_SIZE)?;
        let mut counts = Vec::with_capacity(channel_count);
        for _ in 0..channel_count {
            counts.push(ChannelCounts::decode(r)?);
        }
        Ok(Self {
            unix_sec,
            serial,
            hv_enabled,
            hv_set,
            hv_monitor,
            counts,
        })
    }
}

impl OutputRecord for PrimaryRecord {
    const LABEL: &'static str = "PrimaryRaw";
    const CSV_HEADERS: &'static str = "unix,portenta,hv_enabled,hv_set,hv_read,pd0,pd1,laser,\
        raw_scalar0,raw_scalar1,diff_scalar0,diff_scalar1,baseline0,baseline1,\
        raw_upper_th0,raw_upper_th1,diff_upper_th0,diff_upper_th1,\
        ms_read,num_buff,max_laser_on,num_pulse,pulses_per_second,pulses";

    fn unix_sec(&self) -> u32 {
        self.unix_sec
    }

    fn serial(&self) -> &str {
        &self.serial
    }

    /// One row per detector channel, not one per record.
    fn csv_rows(&self) -> Vec<String> {
        self.counts
            .iter()
            .map(|c| {
                format!(
                    "{},{},{},{},{},{},{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{:.3},{:.3},{},{},{},{},{:.2},{}",
                    self.unix_sec,
                    self.serial,
                    self.hv_enabled,
                    self.hv_set,
                    self.hv_monitor,
                    c.pin_pd0,
                    c.pin_pd1,
                    c.pin_laser,
                    c.raw_scalar0,
                    c.raw_scalar1,
                    c.diffed_scalar0,
                    c.diffed_scalar1,
                    c.baseline0,
                    c.baseline1,
                    c.raw_upper_th0,
                    c.raw_upper_th1,
                    c.diffed_upper_th0,
                    c.diffed_upper_th1,
                    c.ms_read,
                    c.buffers_read,
                    c.max_laser_on,
                    c.num_pulses,
                    c.pulses_per_second,
                    render_pulse_list(&c.pulses),
                )
            })
            .collect()
    }
}

impl fmt::Display for PrimaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Primary | Unix {} | Serial {} | Hv Enabled: {}, Set: {}, Val: {} | {} Channel(s)]",
            self.unix_sec,
            self.serial,
            self.hv_enabled,
            self.hv_set,
            self.hv_monitor,
            self.counts.len()
        )
    }
}

/// Render a pulse list as one quoted CSV field: `"[(p),(p),...]"`.
fn render_pulse_list(pulses: &[Pulse]) -> String {
    if pulses.is_empty() {
        return String::new();
    }
    let mut list = String::from("[");
    for (i, pulse) in pulses.iter().enumerate() {
        if i > 0 {
            list.push(',');
        }
        let _ = write!(list, "{pulse}");
    }
    list.push(']');
    csv_quote(&list)
}
