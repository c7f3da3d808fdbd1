// File: crates/chart-core/src/chart.rs
// Summary: Chart instance bound to one surface, and the per-kind paint strategies (Skia CPU raster).
// Notes:
// - One paint = clear, per-kind strategy (line/bar/doughnut), the configured draw hooks,
//   then axes. Layout and time ticks are recomputed on every paint.
// - Hidden series are skipped by every strategy; nothing is rebuilt to hide them.

use std::rc::Rc;

use skia_safe as skia;

use crate::axis::{TimeAxis, ValueAxis};
use crate::date_adapter::DateAdapter;
use crate::geometry::ChartLayout;
use crate::options::ChartOptions;
use crate::plugin;
use crate::series::{ChartData, Series};
use crate::surface::{DrawingContext, Surface, SurfaceId};
use crate::types::{ChartKind, InstanceId, Insets, Size, HEIGHT, WIDTH};

const BACKGROUND: skia::Color = skia::Color::new(0xFFFF_FFFF);
const GRID: skia::Color = skia::Color::new(0xFFE6_E6EB);
const AXIS_LINE: skia::Color = skia::Color::new(0xFF70_7078);
const AXIS_LABEL: skia::Color = skia::Color::new(0xFF30_3038);

/// Series colors, cycled by series index (by slice index for doughnuts).
const PALETTE: [skia::Color; 6] = [
    skia::Color::new(0xFF00_A040),
    skia::Color::new(0xFF00_B0E0),
    skia::Color::new(0xFFF0_A020),
    skia::Color::new(0xFFD0_4060),
    skia::Color::new(0xFF80_60C0),
    skia::Color::new(0xFF60_6060),
];

fn palette(i: usize) -> skia::Color {
    PALETTE[i % PALETTE.len()]
}

pub struct ChartInstance {
    id: InstanceId,
    kind: ChartKind,
    surface: Surface,
    data: ChartData,
    options: ChartOptions,
    adapter: Option<Rc<dyn DateAdapter>>,
    size: Size,
    insets: Insets,
    context: DrawingContext,
    layout: Option<ChartLayout>,
    time_axis: Option<TimeAxis>,
    paints: u64,
}

impl ChartInstance {
    pub(crate) fn new(
        id: InstanceId,
        kind: ChartKind,
        surface: Surface,
        data: ChartData,
        options: ChartOptions,
        adapter: Option<Rc<dyn DateAdapter>>,
    ) -> Self {
        let laid_out = surface.size();
        let size = if options.responsive || !laid_out.is_empty() { laid_out } else { Size::new(WIDTH, HEIGHT) };
        Self {
            id,
            kind,
            surface,
            data,
            options,
            adapter,
            size,
            insets: Insets::default(),
            context: DrawingContext::new(),
            layout: None,
            time_axis: None,
            paints: 0,
        }
    }

    pub fn id(&self) -> InstanceId { self.id }
    pub fn kind(&self) -> ChartKind { self.kind }
    pub fn surface_id(&self) -> &SurfaceId { self.surface.id() }
    pub fn data(&self) -> &ChartData { &self.data }
    pub fn series(&self) -> &[Series] { &self.data.series }
    pub fn options(&self) -> &ChartOptions { &self.options }
    /// Rendered dimensions, as of the last mount or resize.
    pub fn size(&self) -> Size { self.size }
    /// Layout of the last completed paint.
    pub fn layout(&self) -> Option<&ChartLayout> { self.layout.as_ref() }
    /// Time axis resolved by the last completed paint.
    pub fn time_axis(&self) -> Option<&TimeAxis> { self.time_axis.as_ref() }
    pub fn paint_count(&self) -> u64 { self.paints }
    pub fn has_drawing_context(&self) -> bool { self.context.is_allocated() }

    /// Id of the date adapter captured at mount, if the chart is time-scaled.
    pub fn date_adapter_id(&self) -> Option<&'static str> {
        self.adapter.as_ref().map(|a| a.id())
    }

    pub fn visibility(&self) -> Vec<bool> {
        self.data.visibility()
    }

    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn series_mut(&mut self) -> &mut [Series] {
        &mut self.data.series
    }

    /// Replace data and options in place. The captured adapter is kept; one is only
    /// attached when the chart becomes time-scaled without having one.
    pub(crate) fn replace(&mut self, data: ChartData, options: ChartOptions, adapter: Option<Rc<dyn DateAdapter>>) {
        self.data = data;
        self.options = options;
        if self.adapter.is_none() {
            self.adapter = adapter;
        }
    }

    /// Re-read the surface layout. Returns true when the rendered size changed.
    pub(crate) fn remeasure(&mut self) -> bool {
        if !self.options.responsive {
            return false;
        }
        let laid_out = self.surface.size();
        let changed = laid_out != self.size;
        self.size = laid_out;
        changed
    }

    /// Release the drawing context and retained state.
    pub(crate) fn release(&mut self) {
        self.context.release();
        self.data = ChartData::default();
        self.layout = None;
        self.time_axis = None;
        self.adapter = None;
    }

    /// Paint the current data into the raster. Returns false when nothing could be painted
    /// (zero-size surface, e.g. hidden behind an inactive tab).
    pub(crate) fn paint(&mut self) -> bool {
        let layout = ChartLayout::compute(self.size, &self.insets, self.kind, self.options.right_axis());
        let time_axis = match (&self.adapter, self.kind.has_axes() && self.options.is_time_scaled()) {
            (Some(adapter), true) => TimeAxis::resolve(&self.data.labels, &self.options.scales.x.time, adapter.as_ref()),
            _ => None,
        };

        let Some(raster) = self.context.raster_for(self.size) else {
            tracing::trace!(instance = %self.id, "surface has no area; paint deferred");
            return false;
        };
        let canvas = raster.canvas();
        canvas.clear(BACKGROUND);

        match self.kind {
            ChartKind::Line | ChartKind::Bar => {
                let y_axis = {
                    let (lo, hi) = self.data.visible_value_range();
                    ValueAxis::new(lo, hi * 1.05)
                };
                let x = XPositions::new(&self.data, time_axis.as_ref());
                draw_grid(canvas, &layout, &y_axis, time_axis.as_ref());
                if self.kind == ChartKind::Line {
                    draw_line_series(canvas, &layout, &y_axis, &x, &self.data);
                } else {
                    draw_bar_series(canvas, &layout, &y_axis, &x, &self.data);
                }
                run_hooks(canvas, &layout, &self.options);
                draw_axes(canvas, &layout, &y_axis, time_axis.as_ref(), self.options.right_axis());
            }
            ChartKind::Doughnut => {
                draw_doughnut(canvas, &layout, &self.data);
                run_hooks(canvas, &layout, &self.options);
            }
        }

        self.layout = Some(layout);
        self.time_axis = time_axis;
        self.paints += 1;
        true
    }

    /// PNG bytes of the last paint.
    pub(crate) fn encode_png(&mut self) -> Option<Vec<u8>> {
        let raster = self.context.raster()?;
        let image = raster.image_snapshot();
        #[allow(deprecated)]
        let data = image.encode_to_data(skia::EncodedImageFormat::PNG)?;
        Some(data.as_bytes().to_vec())
    }
}

// ---- x positions ------------------------------------------------------------------

/// Horizontal placement of label `i` as a fraction of the plot width.
struct XPositions<'a> {
    count: usize,
    time: Option<&'a TimeAxis>,
}

impl<'a> XPositions<'a> {
    fn new(data: &ChartData, time: Option<&'a TimeAxis>) -> Self {
        Self { count: data.labels.len(), time }
    }

    fn fraction(&self, i: usize) -> Option<f64> {
        match self.time {
            Some(axis) => axis.positions.get(i).copied().flatten().map(|ts| axis.fraction(ts)),
            None if self.count <= 1 => Some(0.5),
            None if i < self.count => Some(i as f64 / (self.count - 1) as f64),
            None => None,
        }
    }
}

// ---- helpers ----------------------------------------------------------------

/// Overlay masks go right after the series so axis lines and labels stay on top.
fn run_hooks(canvas: &skia::Canvas, layout: &ChartLayout, options: &ChartOptions) {
    for mask in &options.overlays {
        plugin::hook_for(*mask).after_draw(canvas, layout);
    }
}

fn sx(layout: &ChartLayout, frac: f64) -> f32 {
    layout.plot.left as f32 + frac as f32 * layout.plot.width() as f32
}

fn sy(layout: &ChartLayout, y_axis: &ValueAxis, v: f64) -> f32 {
    layout.plot.bottom as f32 - y_axis.fraction(v) as f32 * layout.plot.height() as f32
}

fn draw_grid(canvas: &skia::Canvas, layout: &ChartLayout, y_axis: &ValueAxis, time: Option<&TimeAxis>) {
    let mut paint = skia::Paint::default();
    paint.set_color(GRID);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    let (l, t, r, b) = (layout.plot.left as f32, layout.plot.top as f32, layout.plot.right as f32, layout.plot.bottom as f32);
    for v in y_axis.ticks(6) {
        let y = sy(layout, y_axis, v);
        canvas.draw_line((l, y), (r, y), &paint);
    }
    if let Some(axis) = time {
        for tick in &axis.ticks {
            let x = sx(layout, axis.fraction(tick.ts));
            canvas.draw_line((x, t), (x, b), &paint);
        }
    }
}

fn draw_axes(canvas: &skia::Canvas, layout: &ChartLayout, y_axis: &ValueAxis, time: Option<&TimeAxis>, right_axis: bool) {
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(AXIS_LINE);
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.0);

    let (l, t, r, b) = (layout.plot.left as f32, layout.plot.top as f32, layout.plot.right as f32, layout.plot.bottom as f32);
    let axis_x = if right_axis { r } else { l };
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((axis_x, t), (axis_x, b), &axis_paint);

    let mut text = skia::Paint::default();
    text.set_color(AXIS_LABEL);
    text.set_anti_alias(true);
    let mut font = skia::Font::default();
    font.set_size(11.0);

    for v in y_axis.ticks(6) {
        let label = compact_number(v);
        let y = sy(layout, y_axis, v) + 4.0;
        let x = if right_axis { r + 4.0 } else { (l - 6.0 - 6.0 * label.len() as f32).max(0.0) };
        canvas.draw_str(&label, (x, y), &font, &text);
    }
    if let Some(axis) = time {
        for tick in &axis.ticks {
            let x = sx(layout, axis.fraction(tick.ts)) - 3.0 * tick.label.len() as f32;
            canvas.draw_str(&tick.label, (x, b + 16.0), &font, &text);
        }
    }
}

fn compact_number(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 10_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else if a >= 100.0 || v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

fn draw_line_series(canvas: &skia::Canvas, layout: &ChartLayout, y_axis: &ValueAxis, x: &XPositions<'_>, data: &ChartData) {
    for (si, series) in data.series.iter().enumerate().filter(|(_, s)| s.visible) {
        let mut path = skia::Path::new();
        let mut pen_down = false;
        let mut segments = 0usize;
        for (i, &v) in series.values.iter().enumerate() {
            match x.fraction(i) {
                Some(frac) if v.is_finite() => {
                    let p = (sx(layout, frac), sy(layout, y_axis, v));
                    if pen_down {
                        path.line_to(p);
                        segments += 1;
                    } else {
                        path.move_to(p);
                        pen_down = true;
                    }
                }
                // gaps (unparseable dates, NaN) break the line
                _ => pen_down = false,
            }
        }
        if segments == 0 {
            continue;
        }

        let mut stroke = skia::Paint::default();
        stroke.set_anti_alias(true);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(2.0);
        stroke.set_color(palette(si));
        canvas.draw_path(&path, &stroke);
    }
}

fn draw_bar_series(canvas: &skia::Canvas, layout: &ChartLayout, y_axis: &ValueAxis, x: &XPositions<'_>, data: &ChartData) {
    let visible: Vec<(usize, &Series)> = data.series.iter().enumerate().filter(|(_, s)| s.visible).collect();
    let slots = data.labels.len().max(1);
    if visible.is_empty() {
        return;
    }
    let slot_px = layout.plot.width() as f32 / slots as f32;
    let group_px = slot_px * 0.8;
    let bar_px = (group_px / visible.len() as f32).max(1.0);
    let base = sy(layout, y_axis, 0.0_f64.max(y_axis.min));

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);

    for (gi, (si, series)) in visible.iter().enumerate() {
        body.set_color(palette(*si));
        for (i, &v) in series.values.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            // Category bars sit in the middle of their slot; time bars center on their instant.
            let center = match x.time {
                Some(_) => match x.fraction(i) {
                    Some(frac) => sx(layout, frac),
                    None => continue,
                },
                None if i < slots => layout.plot.left as f32 + slot_px * (i as f32 + 0.5),
                None => continue,
            };
            let left = center - group_px * 0.5 + bar_px * gi as f32;
            let top = sy(layout, y_axis, v);
            let rect = skia::Rect::from_ltrb(left, top.min(base), left + bar_px * 0.9, top.max(base));
            canvas.draw_rect(rect, &body);
        }
    }
}

fn draw_doughnut(canvas: &skia::Canvas, layout: &ChartLayout, data: &ChartData) {
    let rings: Vec<&Series> = data.series.iter().filter(|s| s.visible).collect();
    if rings.is_empty() {
        return;
    }
    let cx = (layout.plot.left + layout.plot.right) as f32 * 0.5;
    let cy = (layout.plot.top + layout.plot.bottom) as f32 * 0.5;
    let outer = layout.plot.width().min(layout.plot.height()) as f32 * 0.5;
    // The hole takes the inner half of the radius.
    let thickness = outer * 0.5 / rings.len() as f32;

    let mut arc = skia::Paint::default();
    arc.set_anti_alias(true);
    arc.set_style(skia::paint::Style::Stroke);
    arc.set_stroke_width(thickness);

    for (k, series) in rings.iter().enumerate() {
        let total: f64 = series.values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
        if total <= 0.0 {
            continue;
        }
        let r = outer - thickness * (k as f32 + 0.5);
        let oval = skia::Rect::from_ltrb(cx - r, cy - r, cx + r, cy + r);
        let mut start = -90.0f32;
        for (i, &v) in series.values.iter().enumerate() {
            if !v.is_finite() || v <= 0.0 {
                continue;
            }
            let sweep = (v / total) as f32 * 360.0;
            arc.set_color(palette(i));
            canvas.draw_arc(oval, start, sweep, false, &arc);
            start += sweep;
        }
    }
}
