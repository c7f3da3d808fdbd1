// File: crates/chart-core/src/options.rs
// Summary: Render configuration read from the page's free-form options object.
// Notes:
// - Every key has a default, so `{}` is a valid options object.
// - Keys the engine does not recognize are kept in `extra` untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date_adapter::TimeUnit;
use crate::error::ChartResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Category,
    Linear,
    Time,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    #[default]
    Left,
    Right,
}

/// Y-axis background masks painted after the series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayMask {
    #[serde(rename = "y-axes-bg")]
    LeftAxis,
    #[serde(rename = "y-axes-bg-right")]
    RightAxis,
}

/// `scales.x.time`: how labels are parsed and ticks are formatted on a time axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeAxisOptions {
    /// Tick unit. Chosen from the data span when absent.
    pub unit: Option<TimeUnit>,
    /// Format labels are written in. Free-form parsing when absent.
    pub parser: Option<String>,
    /// Per-unit tick formats, keyed by unit name (`"day": "M/D"`).
    pub display_formats: BTreeMap<String, String>,
}

impl TimeAxisOptions {
    pub fn display_format(&self, unit: TimeUnit) -> Option<&str> {
        self.display_formats.get(unit.name()).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XAxisOptions {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub time: TimeAxisOptions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxisOptions {
    pub position: AxisPosition,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scales {
    pub x: XAxisOptions,
    pub y: YAxisOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// Follow the surface's laid-out size on resize. Non-responsive charts keep the
    /// size they were first painted at.
    pub responsive: bool,
    pub scales: Scales,
    pub overlays: Vec<OverlayMask>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            scales: Scales::default(),
            overlays: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl ChartOptions {
    pub fn from_json(text: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> ChartResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Options for a time-scaled x axis with the given tick unit and label parser.
    pub fn time_axis(unit: TimeUnit, parser: impl Into<String>) -> Self {
        let mut opts = Self::default();
        opts.scales.x.axis_type = AxisType::Time;
        opts.scales.x.time.unit = Some(unit);
        opts.scales.x.time.parser = Some(parser.into());
        opts
    }

    pub fn with_overlay(mut self, mask: OverlayMask) -> Self {
        self.overlays.push(mask);
        self
    }

    pub fn is_time_scaled(&self) -> bool {
        self.scales.x.axis_type == AxisType::Time
    }

    pub fn right_axis(&self) -> bool {
        self.scales.y.position == AxisPosition::Right
    }
}
