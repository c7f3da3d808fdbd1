// File: crates/chart-core/src/geometry.rs
// Summary: Pixel geometry for a painted chart: rendered size and plot-area bounds.

use crate::types::{ChartKind, Insets, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectI32 {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectI32 {
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn width(&self) -> i32 { self.right - self.left }
    pub const fn height(&self) -> i32 { self.bottom - self.top }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Layout metrics of one paint: full rendered size plus the plot area (chart area)
/// the series are drawn into. Recomputed on every paint; never cached across resizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: i32,
    pub height: i32,
    pub plot: RectI32,
}

impl ChartLayout {
    /// Compute the plot area for `size`. A right-positioned y axis mirrors the left gutter.
    pub fn compute(size: Size, insets: &Insets, kind: ChartKind, right_axis: bool) -> Self {
        let width = size.width as i32;
        let height = size.height as i32;
        let plot = if kind.has_axes() {
            let right_inset = if right_axis { insets.left } else { insets.right } as i32;
            let left = clamp(insets.left as i32, 0, width);
            let top = clamp(insets.top as i32, 0, height);
            let right = clamp(width - right_inset, left, width);
            let bottom = clamp(height - insets.bottom as i32, top, height);
            RectI32::from_ltrb(left, top, right, bottom)
        } else {
            let pad = insets.top.min(insets.bottom) as i32;
            let left = clamp(pad, 0, width);
            let top = clamp(pad, 0, height);
            RectI32::from_ltrb(left, top, clamp(width - pad, left, width), clamp(height - pad, top, height))
        };
        Self { width, height, plot }
    }
}
