// File: crates/chart-core/tests/end_to_end.rs
// Purpose: Full widget scenario on a time axis: mount, same-kind update, kind change.

use chart_core::axis::MAX_TIME_TICKS;
use chart_core::{
    ChartData, ChartKind, ChartLifecycleManager, ChartOptions, ChartWidget, ChronoDateAdapter, LifecycleEvent,
    Series, Size, Surface, TabVisibilityBus, TimeUnit, WidgetProps,
};

fn labels() -> Vec<String> {
    (1..=14).map(|d| format!("2021-03-{d:02}")).collect()
}

fn counts(seed: f64) -> Vec<f64> {
    (0..14).map(|i| seed + i as f64 * 2.0).collect()
}

fn count(events: &[LifecycleEvent], pred: impl Fn(&LifecycleEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn time_axis_chart_through_update_and_kind_change() {
    let mut mgr = ChartLifecycleManager::new();
    mgr.register_date_adapter(ChronoDateAdapter::utc());
    let bus = TabVisibilityBus::new();
    let mut widget = ChartWidget::new(Surface::canvas("cases", Size::new(640, 320)), &bus);
    let options = ChartOptions::time_axis(TimeUnit::Day, "YYYY-MM-DD");

    let two = ChartData::new(labels(), vec![Series::new("confirmed", counts(10.0)), Series::new("deaths", counts(0.0))]);
    let first = widget
        .set_props(&mut mgr, WidgetProps::new(ChartKind::Line, two).with_options(options.clone()))
        .unwrap();
    mgr.flush();

    let axis = mgr.instance(first).and_then(|i| i.time_axis()).cloned().expect("time axis");
    assert_eq!(axis.unit, TimeUnit::Day);
    assert!(axis.positions.iter().all(Option::is_some));
    assert_eq!(axis.ticks.first().map(|t| t.label.as_str()), Some("Mar 1"));
    assert!(axis.ticks.len() <= MAX_TIME_TICKS);

    // Same kind, one more series: in place.
    let three = ChartData::new(
        labels(),
        vec![
            Series::new("confirmed", counts(10.0)),
            Series::new("deaths", counts(0.0)),
            Series::new("recovered", counts(5.0)),
        ],
    );
    let same = widget
        .set_props(&mut mgr, WidgetProps::new(ChartKind::Line, three.clone()).with_options(options))
        .unwrap();
    assert_eq!(same, first);
    mgr.flush();

    let events = mgr.take_events();
    assert_eq!(count(&events, |e| matches!(e, LifecycleEvent::Mounted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, LifecycleEvent::Updated { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, LifecycleEvent::Destroyed { .. })), 0);
    assert_eq!(mgr.instance(first).map(|i| i.series().len()), Some(3));

    // Line -> doughnut: exactly one destroy, then one mount.
    let doughnut = widget.set_props(&mut mgr, WidgetProps::new(ChartKind::Doughnut, three)).unwrap();
    mgr.flush();
    let events = mgr.take_events();
    let kinds: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            LifecycleEvent::Destroyed { .. } => Some("destroyed"),
            LifecycleEvent::Mounted { .. } => Some("mounted"),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec!["destroyed", "mounted"]);
    assert!(events.contains(&LifecycleEvent::Painted { instance: doughnut.id() }));
    assert_eq!(mgr.live_count(), 1);
    assert_eq!(bus.subscriber_count(), 1);

    widget.teardown(&mut mgr);
    assert_eq!(mgr.live_count(), 0);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn re_registered_adapter_only_affects_later_mounts() {
    struct Tokyo(ChronoDateAdapter);

    impl chart_core::DateAdapter for Tokyo {
        fn id(&self) -> &'static str { "tokyo" }
        fn formats(&self) -> chart_core::DisplayFormats { self.0.formats() }
        fn parse(&self, v: &str, f: Option<&str>) -> Option<i64> { self.0.parse(v, f) }
        fn format(&self, ts: i64, f: &str) -> String { self.0.format(ts, f) }
        fn add(&self, ts: i64, n: i64, u: TimeUnit) -> i64 { self.0.add(ts, n, u) }
        fn diff(&self, a: i64, b: i64, u: TimeUnit) -> i64 { self.0.diff(a, b, u) }
        fn start_of(&self, ts: i64, u: TimeUnit, w: Option<u32>) -> i64 { self.0.start_of(ts, u, w) }
        fn end_of(&self, ts: i64, u: TimeUnit) -> i64 { self.0.end_of(ts, u) }
    }

    let mut mgr = ChartLifecycleManager::new();
    let options = ChartOptions::time_axis(TimeUnit::Day, "YYYY-MM-DD");
    let data = ChartData::new(labels(), vec![Series::new("confirmed", counts(1.0))]);

    mgr.register_date_adapter(ChronoDateAdapter::utc());
    let early = mgr.mount(&Surface::canvas("early", Size::new(200, 100)), ChartKind::Line, data.clone(), options.clone()).unwrap();
    mgr.register_date_adapter(Tokyo(ChronoDateAdapter::with_offset_seconds(9 * 3600)));
    let late = mgr.mount(&Surface::canvas("late", Size::new(200, 100)), ChartKind::Line, data.clone(), options.clone()).unwrap();

    // In-place updates keep the adapter captured at mount.
    mgr.update(early, ChartKind::Line, data, options);
    mgr.flush();

    assert_eq!(mgr.instance(early).and_then(|i| i.date_adapter_id()), Some("chrono"));
    assert_eq!(mgr.instance(late).and_then(|i| i.date_adapter_id()), Some("tokyo"));
}
