// File: crates/chart-core/src/series.rs
// Summary: Chart data model: category/date labels plus ordered, independently visible series.
// Notes:
// - Values are index-aligned to `ChartData::labels`. Missing trailing values are
//   simply not drawn; extra values beyond the labels are ignored.

use serde::{Deserialize, Serialize};

/// One named data series (a line, a bar group member, or a doughnut ring).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool { true }

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values, visible: true }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Finite min/max over the values, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.values.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo.is_finite() { Some((lo, hi)) } else { None }
    }
}

/// Immutable per-render payload supplied by the page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, series: Vec<Series>) -> Self {
        Self { labels, series }
    }

    /// Current visibility flags, index-aligned to `series`.
    pub fn visibility(&self) -> Vec<bool> {
        self.series.iter().map(|s| s.visible).collect()
    }

    /// Value range across visible series, padded so a flat range still has height.
    /// The range always includes zero (bars grow from the baseline).
    pub fn visible_value_range(&self) -> (f64, f64) {
        let mut lo = 0.0f64;
        let mut hi = 0.0f64;
        for (a, b) in self.series.iter().filter(|s| s.visible).filter_map(Series::value_range) {
            lo = lo.min(a);
            hi = hi.max(b);
        }
        if (hi - lo).abs() < 1e-9 {
            hi = lo + 1.0;
        }
        (lo, hi)
    }
}
