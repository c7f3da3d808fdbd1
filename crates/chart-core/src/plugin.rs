// File: crates/chart-core/src/plugin.rs
// Summary: Draw hooks run after the series are painted; y-axis background masks.
// Notes:
// - Hooks are stateless. Regions are a pure function of the current layout and are
//   recomputed on every paint, since the plot area moves on resize.
// - The masks hide series pixels that spill into the axis gutters (e.g. while a line
//   animates past the plot edge) and fade the x-axis labels under the gutter.

use skia_safe as skia;

use crate::geometry::ChartLayout;
use crate::options::OverlayMask;

pub const OPAQUE_WHITE: skia::Color = skia::Color::new(0xFFFF_FFFF);
pub const TRANSPARENT_WHITE: skia::Color = skia::Color::new(0x00FF_FFFF);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaskFill {
    Solid(skia::Color),
    /// Horizontal linear gradient from `from_x` (color `start`) to `to_x` (color `end`).
    Fade { from_x: f32, to_x: f32, start: skia::Color, end: skia::Color },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskRegion {
    pub rect: skia::Rect,
    pub fill: MaskFill,
}

/// A hook invoked after the series of a chart are painted, inside the same paint pass.
pub trait DrawHook {
    fn id(&self) -> &'static str;

    /// Regions this hook covers for `layout`.
    fn regions(&self, layout: &ChartLayout) -> Vec<MaskRegion>;

    fn after_draw(&self, canvas: &skia::Canvas, layout: &ChartLayout) {
        paint_regions(canvas, &self.regions(layout));
    }
}

/// Masks the left y-axis gutter.
pub struct LeftAxisMask;

/// Masks both gutters of a chart whose y axis sits on the right.
pub struct RightAxisMask;

static LEFT_AXIS_MASK: LeftAxisMask = LeftAxisMask;
static RIGHT_AXIS_MASK: RightAxisMask = RightAxisMask;

/// Hook implementing a configured overlay.
pub fn hook_for(mask: OverlayMask) -> &'static dyn DrawHook {
    match mask {
        OverlayMask::LeftAxis => &LEFT_AXIS_MASK,
        OverlayMask::RightAxis => &RIGHT_AXIS_MASK,
    }
}

fn left_gutter(layout: &ChartLayout) -> [MaskRegion; 2] {
    let left = layout.plot.left as f32;
    let below = layout.plot.bottom as f32 + 1.0;
    let height = layout.height as f32;
    [
        MaskRegion { rect: skia::Rect::from_ltrb(0.0, 0.0, left, below), fill: MaskFill::Solid(OPAQUE_WHITE) },
        MaskRegion {
            rect: skia::Rect::from_ltrb(0.0, below, left, height.max(below)),
            fill: MaskFill::Fade { from_x: 0.0, to_x: left, start: OPAQUE_WHITE, end: TRANSPARENT_WHITE },
        },
    ]
}

impl DrawHook for LeftAxisMask {
    fn id(&self) -> &'static str { "y-axes-bg" }

    fn regions(&self, layout: &ChartLayout) -> Vec<MaskRegion> {
        left_gutter(layout).to_vec()
    }
}

impl DrawHook for RightAxisMask {
    fn id(&self) -> &'static str { "y-axes-bg-right" }

    fn regions(&self, layout: &ChartLayout) -> Vec<MaskRegion> {
        let right = layout.plot.right as f32;
        let width = layout.width as f32;
        let below = layout.plot.bottom as f32 + 1.0;
        let height = layout.height as f32;
        let mut out = vec![
            MaskRegion { rect: skia::Rect::from_ltrb(right, 0.0, width, below), fill: MaskFill::Solid(OPAQUE_WHITE) },
            MaskRegion {
                rect: skia::Rect::from_ltrb(right, below, width, height.max(below)),
                fill: MaskFill::Fade { from_x: right, to_x: width, start: TRANSPARENT_WHITE, end: OPAQUE_WHITE },
            },
        ];
        out.extend(left_gutter(layout));
        out
    }
}

pub fn paint_regions(canvas: &skia::Canvas, regions: &[MaskRegion]) {
    for region in regions {
        if region.rect.is_empty() {
            continue;
        }
        let mut paint = skia::Paint::default();
        paint.set_style(skia::paint::Style::Fill);
        match region.fill {
            MaskFill::Solid(color) => {
                paint.set_color(color);
            }
            MaskFill::Fade { from_x, to_x, start, end } => {
                let colors = [start, end];
                let shader = skia::Shader::linear_gradient(
                    (skia::Point::new(from_x, 0.0), skia::Point::new(to_x, 0.0)),
                    &colors[..],
                    None,
                    skia::TileMode::Clamp,
                    None,
                    None,
                );
                match shader {
                    Some(shader) => {
                        paint.set_shader(shader);
                    }
                    None => {
                        paint.set_color(start);
                    }
                }
            }
        }
        canvas.draw_rect(region.rect, &paint);
    }
}
