// File: crates/demo/src/main.rs
// Summary: Demo plays a two-tab dashboard page: loads daily counts from CSV, mounts chart widgets,
//          switches tabs, toggles legends, resizes, and writes each painted chart to PNG.

use anyhow::{Context, Result};
use chart_core::{
    AxisPosition, ChartData, ChartKind, ChartLifecycleManager, ChartOptions, ChartWidget, ChronoDateAdapter,
    LifecycleEvent, OverlayMask, Series, Size, Surface, TabVisibilityBus, TimeUnit, WidgetProps,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CSV: &str = "crates/demo/data/daily_counts.csv";

/// One dashboard tab: its widgets and the size their surfaces take when the tab is shown.
struct Tab {
    name: &'static str,
    widgets: Vec<ChartWidget>,
    size: Size,
}

impl Tab {
    fn set_visible(&self, visible: bool) {
        let size = if visible { self.size } else { Size::default() };
        for w in &self.widgets {
            w.surface().set_size(size);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,chart_core=debug")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Accept path from CLI or fall back to the bundled sample (supports .csv/.cvs swap)
    let raw = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CSV.to_string());
    let (path, used_alt) = resolve_path(&raw)?;
    tracing::info!(input = %path.display(), swapped_extension = used_alt, "loading daily counts");

    let daily = load_daily_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    if daily.labels.is_empty() {
        anyhow::bail!("no rows loaded; check headers/delimiter");
    }
    tracing::info!(rows = daily.labels.len(), series = daily.series.len(), "loaded");

    // Optional second argument: options JSON for the trend chart.
    let trend_options = match std::env::args().nth(2) {
        Some(p) => {
            let text = std::fs::read_to_string(&p).with_context(|| format!("reading {p}"))?;
            ChartOptions::from_json(&text)?
        }
        None => ChartOptions::time_axis(TimeUnit::Week, "YYYY-MM-DD").with_overlay(OverlayMask::LeftAxis),
    };

    let mut manager = ChartLifecycleManager::new();
    manager.register_date_adapter(ChronoDateAdapter::utc());
    let bus = TabVisibilityBus::new();

    let mut overview = Tab { name: "overview", widgets: Vec::new(), size: Size::new(800, 360) };
    let mut detail = Tab { name: "detail", widgets: Vec::new(), size: Size::new(480, 320) };

    // The overview tab is shown first; detail surfaces exist but are not laid out yet.
    for id in ["trend", "daily-bars"] {
        overview.widgets.push(ChartWidget::new(Surface::canvas(id, overview.size), &bus));
    }
    for id in ["totals", "deaths-right"] {
        detail.widgets.push(ChartWidget::new(Surface::canvas(id, Size::default()), &bus));
    }

    let mut right_axis = ChartOptions::time_axis(TimeUnit::Week, "YYYY-MM-DD").with_overlay(OverlayMask::RightAxis);
    right_axis.scales.y.position = AxisPosition::Right;

    let props = [
        WidgetProps::new(ChartKind::Line, daily.clone()).with_options(trend_options),
        WidgetProps::new(ChartKind::Bar, daily.clone())
            .with_options(ChartOptions::time_axis(TimeUnit::Week, "YYYY-MM-DD"))
            .with_legends(vec![true, false, false]),
    ];
    for (w, p) in overview.widgets.iter_mut().zip(props) {
        w.set_props(&mut manager, p)?;
    }
    let detail_props = [
        WidgetProps::new(ChartKind::Doughnut, totals(&daily)),
        WidgetProps::new(ChartKind::Bar, only_series(&daily, "deaths")).with_options(right_axis),
    ];
    for (w, p) in detail.widgets.iter_mut().zip(detail_props) {
        w.set_props(&mut manager, p)?;
    }

    let painted = manager.flush();
    tracing::info!(painted, "initial paint (hidden tab deferred)");
    export_tab(&mut manager, &overview, "initial")?;

    // Switch tabs: the page lays out the detail tab, then tells its charts.
    overview.set_visible(false);
    detail.set_visible(true);
    let delivered = bus.publish();
    let painted = manager.flush();
    tracing::info!(tab = detail.name, delivered, painted, "tab activated");
    export_tab(&mut manager, &detail, "activated")?;

    // Back to overview: hide recovered on the trend chart and narrow the window.
    detail.set_visible(false);
    overview.size = Size::new(640, 360);
    overview.set_visible(true);
    bus.publish();
    overview.widgets[0].set_display_legends(&mut manager, Some(&[true, false, true][..]));
    for w in overview.widgets.iter_mut() {
        w.on_resize(&mut manager);
    }
    let painted = manager.flush();
    tracing::info!(tab = overview.name, painted, "legend toggled and resized");
    export_tab(&mut manager, &overview, "resized")?;

    // Same widget, different kind: the chart underneath is rebuilt.
    overview.widgets[1].set_props(&mut manager, WidgetProps::new(ChartKind::Line, daily.clone()))?;
    manager.flush();
    export_tab(&mut manager, &overview, "rebuilt")?;

    for event in manager.take_events() {
        match event {
            LifecycleEvent::WidthUpdated { instance, width } => {
                tracing::info!(%instance, width, "update-width")
            }
            other => tracing::debug!(?other, "lifecycle"),
        }
    }

    for w in overview.widgets.iter_mut().chain(detail.widgets.iter_mut()) {
        w.teardown(&mut manager);
    }
    tracing::info!(live = manager.live_count(), subscribers = bus.subscriber_count(), "page torn down");
    Ok(())
}

/// Write every painted chart of `tab` to target/out/<tab>_<surface>_<stage>.png
fn export_tab(manager: &mut ChartLifecycleManager, tab: &Tab, stage: &str) -> Result<()> {
    for w in &tab.widgets {
        let Some(handle) = w.handle() else { continue };
        let out = out_name(tab.name, w.surface().id().as_str(), stage);
        manager.export_png(handle, &out)?;
        tracing::info!(out = %out.display(), "wrote");
    }
    Ok(())
}

fn out_name(tab: &str, surface: &str, stage: &str) -> PathBuf {
    let mut out = PathBuf::from("target/out");
    out.push(format!("{tab}_{surface}_{stage}.png"));
    out
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

/// Load a daily-counts CSV: first column is the date label, every other column a series.
fn load_daily_csv(path: &Path) -> Result<ChartData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>();
    tracing::debug!(?headers, "csv headers");
    if headers.len() < 2 {
        anyhow::bail!("expected a date column and at least one count column");
    }

    let mut labels = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];
    for rec in rdr.records() {
        let rec = rec?;
        let Some(date) = rec.get(0).map(str::trim).filter(|s| !s.is_empty()) else { continue };
        labels.push(date.to_string());
        for (i, col) in columns.iter_mut().enumerate() {
            // Missing or malformed counts become gaps.
            let v = rec.get(i + 1).and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN);
            col.push(v);
        }
    }

    let series = headers[1..].iter().zip(columns).map(|(name, values)| Series::new(name.clone(), values)).collect();
    Ok(ChartData::new(labels, series))
}

/// One doughnut ring: totals per series.
fn totals(daily: &ChartData) -> ChartData {
    let names = daily.series.iter().map(|s| s.name.clone()).collect();
    let sums = daily.series.iter().map(|s| s.values.iter().filter(|v| v.is_finite()).sum()).collect();
    ChartData::new(names, vec![Series::new("total", sums)])
}

fn only_series(daily: &ChartData, name: &str) -> ChartData {
    let series = daily.series.iter().filter(|s| s.name == name).cloned().collect();
    ChartData::new(daily.labels.clone(), series)
}
