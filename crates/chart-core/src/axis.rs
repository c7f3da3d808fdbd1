// File: crates/chart-core/src/axis.rs
// Summary: Axis models: value (Y) ranges and time-scaled (X) ticks resolved through the date adapter.

use crate::date_adapter::{DateAdapter, TimeUnit, Timestamp};
use crate::options::TimeAxisOptions;

/// Upper bound on labelled ticks; denser units are stepped.
pub const MAX_TIME_TICKS: usize = 12;

const AUTO_UNITS: [TimeUnit; 9] = [
    TimeUnit::Millisecond,
    TimeUnit::Second,
    TimeUnit::Minute,
    TimeUnit::Hour,
    TimeUnit::Day,
    TimeUnit::Week,
    TimeUnit::Month,
    TimeUnit::Quarter,
    TimeUnit::Year,
];

/// `steps` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (steps - 1) as f64;
    (0..steps).map(|i| start + step * i as f64).collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
}

impl ValueAxis {
    pub fn new(min: f64, max: f64) -> Self {
        if (max - min).abs() < 1e-9 { Self { min, max: min + 1.0 } } else { Self { min, max } }
    }

    /// Evenly spaced gridline values, `steps` of them including both ends.
    pub fn ticks(&self, steps: usize) -> Vec<f64> {
        linspace(self.min, self.max, steps)
    }

    /// Fraction of the range covered by `v`, 0 at `min`, 1 at `max`.
    pub fn fraction(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeTick {
    pub ts: Timestamp,
    pub label: String,
}

/// Resolved time axis for one paint.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeAxis {
    pub min: Timestamp,
    pub max: Timestamp,
    pub unit: TimeUnit,
    /// Parsed label timestamps, index-aligned to the chart labels; `None` labels are omitted.
    pub positions: Vec<Option<Timestamp>>,
    pub ticks: Vec<TimeTick>,
}

impl TimeAxis {
    /// Resolve labels into timestamps and ticks. `None` when no label parses.
    pub fn resolve(labels: &[String], opts: &TimeAxisOptions, adapter: &dyn DateAdapter) -> Option<Self> {
        let parser = opts.parser.as_deref();
        let positions: Vec<Option<Timestamp>> = labels.iter().map(|l| adapter.parse(l, parser)).collect();
        let min = positions.iter().flatten().copied().min()?;
        let max = positions.iter().flatten().copied().max()?;

        let unit = opts.unit.unwrap_or_else(|| auto_unit(min, max, adapter));
        let format = match opts.display_format(unit) {
            Some(f) => f.to_string(),
            None => adapter.formats().for_unit(unit).to_string(),
        };

        let span = adapter.diff(max, min, unit).max(0) as usize + 1;
        let step = span.div_ceil(MAX_TIME_TICKS).max(1) as i64;
        let mut ticks = Vec::new();
        let mut t = adapter.start_of(min, unit, None);
        while t <= max && ticks.len() < MAX_TIME_TICKS {
            if t >= min {
                ticks.push(TimeTick { ts: t, label: adapter.format(t, &format) });
            }
            let next = adapter.add(t, step, unit);
            if next <= t {
                break;
            }
            t = next;
        }

        Some(Self { min, max, unit, positions, ticks })
    }

    /// Fraction of the axis covered by `ts`; a single-instant axis maps everything to 0.5.
    pub fn fraction(&self, ts: Timestamp) -> f64 {
        if self.max == self.min { 0.5 } else { (ts - self.min) as f64 / (self.max - self.min) as f64 }
    }
}

/// Smallest unit whose tick count over `min..=max` stays within `MAX_TIME_TICKS`.
fn auto_unit(min: Timestamp, max: Timestamp, adapter: &dyn DateAdapter) -> TimeUnit {
    AUTO_UNITS
        .iter()
        .copied()
        .find(|&u| adapter.diff(max, min, u) < MAX_TIME_TICKS as i64)
        .unwrap_or(TimeUnit::Year)
}
