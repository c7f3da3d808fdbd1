// File: crates/chart-core/tests/date_adapter.rs
// Purpose: Chrono date adapter: parsing with formats, calendar arithmetic and unit boundaries.

use chart_core::{ChronoDateAdapter, DateAdapter, TimeUnit};
use chrono::{DateTime, Utc};
use serde_json::json;

// 2024-03-15T10:30:00Z, a Friday.
const FRI_1030: i64 = 1_710_498_600_000;
const JAN_31: i64 = 1_706_659_200_000;
const FEB_29: i64 = 1_709_164_800_000;

#[test]
fn unparseable_input_is_none_not_a_fault() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.parse("not-a-date", None), None);
    assert_eq!(a.parse("not-a-date", Some("YYYY-MM-DD")), None);
    assert_eq!(a.parse("", None), None);
    assert_eq!(a.parse_value(&json!(null), None), None);
    assert_eq!(a.parse_value(&json!(true), None), None);
}

#[test]
fn parses_with_and_without_a_format() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.parse("2024-03-15 10:30", Some("YYYY-MM-DD HH:mm")), Some(FRI_1030));
    assert_eq!(a.parse("15/03/2024", Some("DD/MM/YYYY")), Some(1_710_460_800_000));
    assert_eq!(a.parse("2024-03-15T10:30:00Z", None), Some(FRI_1030));
    assert_eq!(a.parse("2024-03-15", None), Some(1_710_460_800_000));
    assert_eq!(a.parse_value(&json!(FRI_1030), None), Some(FRI_1030));
    assert_eq!(a.parse_value(&json!("2024-03-15T10:30:00Z"), None), Some(FRI_1030));
}

#[test]
fn formats_that_cannot_round_trip_do_not_parse() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.parse("Q1 - 2024", Some("[Q]Q - YYYY")), None);
}

#[test]
fn formats_with_default_display_formats() {
    let a = ChronoDateAdapter::utc();
    let f = a.formats();
    assert_eq!(a.format(FRI_1030, &f.datetime), "Mar 15, 2024, 10:30:00 am");
    assert_eq!(a.format(FRI_1030, &f.hour), "10AM");
    assert_eq!(a.format(FRI_1030, f.for_unit(TimeUnit::Day)), "Mar 15");
    assert_eq!(a.format(FRI_1030, &f.quarter), "Q1 - 2024");
    assert_eq!(a.format(FRI_1030, "YYYY-MM-DD HH:mm"), "2024-03-15 10:30");
}

#[test]
fn add_clamps_to_month_end() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.add(JAN_31, 1, TimeUnit::Month), FEB_29);
    assert_eq!(a.add(FRI_1030, 2, TimeUnit::Hour), FRI_1030 + 7_200_000);
    assert_eq!(a.add(FRI_1030, -1, TimeUnit::Day), FRI_1030 - 86_400_000);
}

#[test]
fn diff_truncates_toward_zero() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.diff(FRI_1030, JAN_31, TimeUnit::Month), 1);
    assert_eq!(a.diff(JAN_31, FRI_1030, TimeUnit::Month), -1);
    assert_eq!(a.diff(FRI_1030 + 5_400_000, FRI_1030, TimeUnit::Hour), 1);
    assert_eq!(a.diff(FRI_1030, FRI_1030 + 5_400_000, TimeUnit::Hour), -1);
    assert_eq!(a.diff(FRI_1030, 1_703_980_800_000, TimeUnit::Year), 0);
}

#[test]
fn start_of_snaps_to_unit_boundaries() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.start_of(FRI_1030, TimeUnit::Day, None), 1_710_460_800_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::Week, None), 1_710_028_800_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::IsoWeek, None), 1_710_115_200_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::IsoWeek, Some(4)), 1_710_374_400_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::Month, None), 1_709_251_200_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::Quarter, None), 1_704_067_200_000);
    assert_eq!(a.start_of(FRI_1030, TimeUnit::Year, None), 1_704_067_200_000);
}

#[test]
fn end_of_is_one_millisecond_before_the_next_unit() {
    let a = ChronoDateAdapter::utc();
    assert_eq!(a.end_of(FRI_1030, TimeUnit::Month), 1_711_929_599_999);
    assert_eq!(a.end_of(FRI_1030, TimeUnit::IsoWeek), 1_710_719_999_999);
    assert_eq!(a.end_of(FRI_1030, TimeUnit::Millisecond), FRI_1030);
}

#[test]
fn fixed_offset_shifts_calendar_units() {
    let tokyo = ChronoDateAdapter::with_offset_seconds(9 * 3600);
    assert_eq!(tokyo.format(FRI_1030, "HH:mm"), "19:30");
    assert_eq!(tokyo.start_of(FRI_1030, TimeUnit::Day, None), 1_710_428_400_000);
    assert_eq!(ChronoDateAdapter::with_offset_seconds(100 * 3600).offset(), ChronoDateAdapter::utc().offset());
}

#[test]
fn units_deserialize_from_option_names() {
    let unit: TimeUnit = serde_json::from_value(json!("isoWeek")).unwrap();
    assert_eq!(unit, TimeUnit::IsoWeek);
    assert_eq!(TimeUnit::Quarter.name(), "quarter");
}

#[test]
fn week_boundaries_at_the_earliest_date_do_not_panic() {
    let a = ChronoDateAdapter::utc();
    let first = DateTime::<Utc>::MIN_UTC.timestamp_millis();
    for unit in [TimeUnit::Week, TimeUnit::IsoWeek] {
        let start = a.start_of(first, unit, None);
        assert!(start <= first, "{unit:?}");
        assert!(a.end_of(first, unit) >= first, "{unit:?}");
    }
    assert!(a.start_of(first, TimeUnit::IsoWeek, Some(7)) <= first + 7 * 86_400_000);
}

#[test]
fn timestamps_outside_the_calendar_pass_through() {
    let a = ChronoDateAdapter::utc();
    for unit in [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year] {
        assert_eq!(a.start_of(i64::MIN, unit, None), i64::MIN);
        assert_eq!(a.end_of(i64::MIN, unit), i64::MIN);
        assert_eq!(a.end_of(i64::MAX, unit), i64::MAX);
    }
    assert_eq!(a.add(i64::MIN, 1, TimeUnit::Month), i64::MIN);
}

#[test]
fn last_calendar_unit_ends_at_the_last_millisecond() {
    let a = ChronoDateAdapter::utc();
    let last = DateTime::<Utc>::MAX_UTC.timestamp_millis();
    for unit in [TimeUnit::Month, TimeUnit::Quarter, TimeUnit::Year] {
        let start = a.start_of(last, unit, None);
        let end = a.end_of(last, unit);
        assert!(end >= start, "{unit:?}: {end} < {start}");
        assert_eq!(end, last, "{unit:?}");
    }
}

#[test]
fn month_arithmetic_clamps_at_the_calendar_edges() {
    let a = ChronoDateAdapter::utc();
    let first = DateTime::<Utc>::MIN_UTC.timestamp_millis();
    let last = DateTime::<Utc>::MAX_UTC.timestamp_millis();
    assert_eq!(a.add(last, 1, TimeUnit::Month), last);
    assert_eq!(a.add(last, 5, TimeUnit::Year), last);
    assert_eq!(a.add(first, -1, TimeUnit::Quarter), first);
}
