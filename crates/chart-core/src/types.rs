// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (chart kinds, sizes, paddings, identities).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback surface width in pixels for charts that are not responsive.
pub const WIDTH: u32 = 640;
/// Fallback surface height in pixels for charts that are not responsive.
pub const HEIGHT: u32 = 360;

/// Chart kind tag. Kinds are not convertible in place: a doughnut's data shape
/// differs from a line's, so a kind change always rebuilds the instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

impl ChartKind {
    /// Doughnuts have no cartesian axes (and therefore no axis gutters).
    pub const fn has_axes(self) -> bool {
        !matches!(self, ChartKind::Doughnut)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
        };
        f.write_str(s)
    }
}

/// Identity of one live chart instance. Never reused: a rebuilt chart gets a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// Laid-out size of a surface, in pixels. Zero while hidden behind an inactive tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    /// True when either dimension is zero; nothing can be painted.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis gutters around the plot area, in pixels. The left gutter holds the y-axis
/// labels (mirrored to the right for right-positioned axes), the bottom one the x labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(48, 16, 16, 32)
    }
}
