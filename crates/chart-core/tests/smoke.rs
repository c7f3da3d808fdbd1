// File: crates/chart-core/tests/smoke.rs
// Purpose: End-to-end paint smoke test: export PNGs and check a few decoded pixels.

use chart_core::{
    ChartData, ChartKind, ChartLifecycleManager, ChartOptions, OverlayMask, Series, Size, Surface, TimeUnit,
};

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).expect("decodable png").to_rgba8()
}

#[test]
fn render_smoke_png() {
    let mut mgr = ChartLifecycleManager::new();
    let surface = Surface::canvas("smoke", Size::new(320, 200));
    let data = ChartData::new(
        (1..=5).map(|d| format!("2024-03-0{d}")).collect(),
        vec![Series::new("cases", vec![0.0, 2.0, 1.0, 3.5, 2.5])],
    );
    let options = ChartOptions::time_axis(TimeUnit::Day, "YYYY-MM-DD").with_overlay(OverlayMask::LeftAxis);
    let h = mgr.mount(&surface, ChartKind::Line, data, options).expect("mount");
    assert!(mgr.png_bytes(h).is_none(), "nothing is painted before the first flush");
    mgr.flush();

    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    mgr.export_png(h, &out).expect("export should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    let bytes = mgr.png_bytes(h).expect("png bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let img = decode(&bytes);
    assert_eq!(img.dimensions(), (320, 200));
    // Left gutter under the mask is opaque white.
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn bar_body_uses_first_palette_color() {
    let mut mgr = ChartLifecycleManager::new();
    let surface = Surface::canvas("bars", Size::new(320, 200));
    let data = ChartData::new(vec!["only".into()], vec![Series::new("cases", vec![10.0])]);
    let h = mgr.mount(&surface, ChartKind::Bar, data, ChartOptions::default()).unwrap();
    mgr.flush();

    let img = decode(&mgr.png_bytes(h).unwrap());
    // Plot spans x 48..304, y 16..168; the single bar is centered in it.
    assert_eq!(img.get_pixel(176, 100).0, [0x00, 0xA0, 0x40, 0xFF]);
}

#[test]
fn hidden_series_leave_the_plot_blank() {
    let mut mgr = ChartLifecycleManager::new();
    let surface = Surface::canvas("hidden", Size::new(320, 200));
    let data = ChartData::new(vec!["only".into()], vec![Series::new("cases", vec![10.0])]);
    let h = mgr.mount(&surface, ChartKind::Bar, data, ChartOptions::default()).unwrap();
    mgr.apply_legends(h, Some(&[false][..]));
    mgr.flush();

    let img = decode(&mgr.png_bytes(h).unwrap());
    assert_eq!(img.get_pixel(176, 100).0, [255, 255, 255, 255]);
}

#[test]
fn export_before_paint_is_an_error() {
    let mut mgr = ChartLifecycleManager::new();
    let surface = Surface::canvas("unpainted", Size::new(100, 100));
    let h = mgr
        .mount(&surface, ChartKind::Doughnut, ChartData::default(), ChartOptions::default())
        .unwrap();
    let err = mgr.export_png(h, "target/test_out/never.png").unwrap_err();
    assert!(err.to_string().contains("has not been painted"));
}
