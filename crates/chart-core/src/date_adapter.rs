// File: crates/chart-core/src/date_adapter.rs
// Summary: Date primitives for time-scaled axes (parse/format/add/diff/startOf/endOf), chrono-backed.
// Notes:
// - Timestamps are epoch milliseconds.
// - Format strings use dayjs-style tokens (`YYYY-MM-DD`, `M/D`, `[Q]Q - YYYY`, ...), the
//   vocabulary page options are written in. They are translated per call; no state is kept.

use std::fmt::Write as _;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

/// Epoch milliseconds.
pub type Timestamp = i64;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Representable range of the calendar arithmetic. Month math that leaves it clamps here.
const FIRST_MS: i64 = DateTime::<Utc>::MIN_UTC.timestamp_millis();
const LAST_MS: i64 = DateTime::<Utc>::MAX_UTC.timestamp_millis();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    IsoWeek,
    Month,
    Quarter,
    Year,
}

impl TimeUnit {
    /// Fixed length in milliseconds, for units that have one.
    const fn fixed_ms(self) -> Option<i64> {
        match self {
            TimeUnit::Millisecond => Some(1),
            TimeUnit::Second => Some(SECOND_MS),
            TimeUnit::Minute => Some(MINUTE_MS),
            TimeUnit::Hour => Some(HOUR_MS),
            TimeUnit::Day => Some(DAY_MS),
            TimeUnit::Week | TimeUnit::IsoWeek => Some(WEEK_MS),
            TimeUnit::Month | TimeUnit::Quarter | TimeUnit::Year => None,
        }
    }

    /// Name used in option keys (`displayFormats.day`, `unit: "isoWeek"`).
    pub const fn name(self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::IsoWeek => "isoWeek",
            TimeUnit::Month => "month",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Year => "year",
        }
    }

    const fn months(self) -> u32 {
        match self {
            TimeUnit::Quarter => 3,
            TimeUnit::Year => 12,
            _ => 1,
        }
    }
}

/// Default display format per unit, used when the axis configuration names none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormats {
    pub datetime: String,
    pub millisecond: String,
    pub second: String,
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub week: String,
    pub month: String,
    pub quarter: String,
    pub year: String,
}

impl DisplayFormats {
    pub fn for_unit(&self, unit: TimeUnit) -> &str {
        match unit {
            TimeUnit::Millisecond => &self.millisecond,
            TimeUnit::Second => &self.second,
            TimeUnit::Minute => &self.minute,
            TimeUnit::Hour => &self.hour,
            TimeUnit::Day => &self.day,
            TimeUnit::Week | TimeUnit::IsoWeek => &self.week,
            TimeUnit::Month => &self.month,
            TimeUnit::Quarter => &self.quarter,
            TimeUnit::Year => &self.year,
        }
    }
}

impl Default for DisplayFormats {
    fn default() -> Self {
        Self {
            datetime: "MMM D, YYYY, h:mm:ss a".into(),
            millisecond: "h:mm:ss.SSS a".into(),
            second: "h:mm:ss a".into(),
            minute: "h:mm a".into(),
            hour: "hA".into(),
            day: "MMM D".into(),
            week: "MMM D".into(),
            month: "MMM YYYY".into(),
            quarter: "[Q]Q - YYYY".into(),
            year: "YYYY".into(),
        }
    }
}

/// Date operations a time-scaled axis needs. Implementations must be pure: the same
/// adapter is shared by every chart instance and never holds per-chart state.
pub trait DateAdapter {
    fn id(&self) -> &'static str;

    fn formats(&self) -> DisplayFormats;

    /// Parse text into a timestamp. Unparseable input is `None`, never a fault;
    /// axis code omits such ticks.
    fn parse(&self, value: &str, format: Option<&str>) -> Option<Timestamp>;

    fn format(&self, ts: Timestamp, format: &str) -> String;

    fn add(&self, ts: Timestamp, amount: i64, unit: TimeUnit) -> Timestamp;

    /// `a - b` in whole `unit`s, truncated toward zero.
    fn diff(&self, a: Timestamp, b: Timestamp, unit: TimeUnit) -> i64;

    /// Start of the enclosing `unit`. For `IsoWeek`, `weekday` (1 = Monday .. 7 = Sunday)
    /// selects the day of the ISO week to snap to; anything else snaps to Monday.
    fn start_of(&self, ts: Timestamp, unit: TimeUnit, weekday: Option<u32>) -> Timestamp;

    fn end_of(&self, ts: Timestamp, unit: TimeUnit) -> Timestamp;

    /// Parse a JSON label: numbers are epoch milliseconds, strings go through `parse`.
    fn parse_value(&self, value: &serde_json::Value, format: Option<&str>) -> Option<Timestamp> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
            serde_json::Value::String(s) => self.parse(s, format),
            _ => None,
        }
    }
}

/// Chrono-backed adapter evaluating calendar units in one fixed UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct ChronoDateAdapter {
    offset: FixedOffset,
}

impl Default for ChronoDateAdapter {
    fn default() -> Self {
        Self::utc()
    }
}

impl ChronoDateAdapter {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Adapter for a fixed offset east of UTC, in seconds. Out-of-range offsets fall back to UTC.
    pub fn with_offset_seconds(east: i32) -> Self {
        FixedOffset::east_opt(east).map(|offset| Self { offset }).unwrap_or_else(Self::utc)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn local(&self, ts: Timestamp) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp_millis(ts).map(|dt| dt.with_timezone(&self.offset))
    }

    fn from_naive(&self, naive: NaiveDateTime) -> Option<Timestamp> {
        self.offset.from_local_datetime(&naive).single().map(|dt| dt.timestamp_millis())
    }

    fn add_months(&self, ts: Timestamp, months: i64) -> Option<Timestamp> {
        let dt = self.local(ts)?;
        let n = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let moved = if months >= 0 { dt.checked_add_months(n) } else { dt.checked_sub_months(n) }?;
        Some(moved.timestamp_millis())
    }

    /// Whole calendar months in `a - b`.
    fn month_diff(&self, a: Timestamp, b: Timestamp) -> i64 {
        if a < b {
            return -self.month_diff(b, a);
        }
        let (Some(la), Some(lb)) = (self.local(a), self.local(b)) else { return 0 };
        let mut months = (la.year() as i64 - lb.year() as i64) * 12 + (la.month() as i64 - lb.month() as i64);
        if self.add_months(b, months).map_or(false, |anchor| anchor > a) {
            months -= 1;
        }
        months
    }
}

impl DateAdapter for ChronoDateAdapter {
    fn id(&self) -> &'static str {
        "chrono"
    }

    fn formats(&self) -> DisplayFormats {
        DisplayFormats::default()
    }

    fn parse(&self, value: &str, format: Option<&str>) -> Option<Timestamp> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match format {
            Some(fmt) => {
                let pattern = to_strftime(fmt)?;
                NaiveDateTime::parse_from_str(value, &pattern)
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(value, &pattern)
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                    })
                    .and_then(|naive| self.from_naive(naive))
            }
            None => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
                    return Some(dt.timestamp_millis());
                }
                for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
                    if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
                        return self.from_naive(naive);
                    }
                }
                for pattern in ["%Y-%m-%d", "%Y/%m/%d"] {
                    if let Some(naive) = NaiveDate::parse_from_str(value, pattern)
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                    {
                        return self.from_naive(naive);
                    }
                }
                None
            }
        }
    }

    fn format(&self, ts: Timestamp, format: &str) -> String {
        match self.local(ts) {
            Some(dt) => render_tokens(&dt, format),
            None => String::new(),
        }
    }

    fn add(&self, ts: Timestamp, amount: i64, unit: TimeUnit) -> Timestamp {
        match unit.fixed_ms() {
            Some(ms) => ts.saturating_add(amount.saturating_mul(ms)),
            None if self.local(ts).is_none() => ts,
            None => self
                .add_months(ts, amount.saturating_mul(unit.months() as i64))
                .unwrap_or(if amount >= 0 { LAST_MS } else { FIRST_MS }),
        }
    }

    fn diff(&self, a: Timestamp, b: Timestamp, unit: TimeUnit) -> i64 {
        match unit.fixed_ms() {
            Some(ms) => a.saturating_sub(b) / ms,
            None => self.month_diff(a, b) / unit.months() as i64,
        }
    }

    fn start_of(&self, ts: Timestamp, unit: TimeUnit, weekday: Option<u32>) -> Timestamp {
        let Some(dt) = self.local(ts) else { return ts };
        let date = dt.date_naive();
        let naive = match unit {
            TimeUnit::Millisecond => return ts,
            TimeUnit::Second => date.and_hms_opt(dt.hour(), dt.minute(), dt.second()),
            TimeUnit::Minute => date.and_hms_opt(dt.hour(), dt.minute(), 0),
            TimeUnit::Hour => date.and_hms_opt(dt.hour(), 0, 0),
            TimeUnit::Day => date.and_hms_opt(0, 0, 0),
            TimeUnit::Week => {
                let back = dt.weekday().num_days_from_sunday() as u64;
                date.checked_sub_days(Days::new(back)).and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            TimeUnit::IsoWeek => {
                let target = weekday.filter(|w| (1..=7).contains(w)).unwrap_or(1) as u64;
                let back = dt.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(Days::new(back))
                    .and_then(|d| d.checked_add_days(Days::new(target - 1)))
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            TimeUnit::Month => date.with_day(1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            TimeUnit::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        };
        naive.and_then(|n| self.from_naive(n)).unwrap_or(ts)
    }

    fn end_of(&self, ts: Timestamp, unit: TimeUnit) -> Timestamp {
        if unit == TimeUnit::Millisecond || self.local(ts).is_none() {
            return ts;
        }
        let start = self.start_of(ts, unit, None);
        match unit.fixed_ms() {
            Some(ms) => start.saturating_add(ms).saturating_sub(1),
            // The last unit of the calendar has no successor; it ends at the last millisecond.
            None => self.add_months(start, unit.months() as i64).map_or(LAST_MS, |next| next.saturating_sub(1)),
        }
    }
}

// ---- format tokens ------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Token {
    Literal(String),
    Field(char, usize),
}

const FIELD_CHARS: &[char] = &['Y', 'M', 'D', 'd', 'H', 'h', 'm', 's', 'S', 'A', 'a', 'Q', 'Z', 'X', 'x'];

/// Split a dayjs-style format into fields (runs of one token letter) and literals.
/// `[...]` escapes literal text.
fn tokenize(format: &str) -> Vec<Token> {
    let chars: Vec<char> = format.chars().collect();
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&ch| ch == ']') {
                literal.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
                continue;
            }
        }
        if FIELD_CHARS.contains(&c) {
            let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
            if !literal.is_empty() {
                out.push(Token::Literal(std::mem::take(&mut literal)));
            }
            out.push(Token::Field(c, run));
            i += run;
        } else {
            literal.push(c);
            i += 1;
        }
    }
    if !literal.is_empty() {
        out.push(Token::Literal(literal));
    }
    out
}

fn render_tokens(dt: &DateTime<FixedOffset>, format: &str) -> String {
    let mut out = String::new();
    for token in tokenize(format) {
        match token {
            Token::Literal(s) => out.push_str(&s),
            Token::Field(c, n) => {
                let _ = match (c, n) {
                    ('Y', 2) => write!(out, "{:02}", dt.year().rem_euclid(100)),
                    ('Y', _) => write!(out, "{:04}", dt.year()),
                    ('M', 1) => write!(out, "{}", dt.month()),
                    ('M', 2) => write!(out, "{:02}", dt.month()),
                    ('M', 3) => write!(out, "{}", dt.format("%b")),
                    ('M', _) => write!(out, "{}", dt.format("%B")),
                    ('D', 1) => write!(out, "{}", dt.day()),
                    ('D', _) => write!(out, "{:02}", dt.day()),
                    ('d', 1) => write!(out, "{}", dt.weekday().num_days_from_sunday()),
                    ('d', 4) => write!(out, "{}", dt.format("%A")),
                    ('d', _) => write!(out, "{}", dt.format("%a")),
                    ('H', 1) => write!(out, "{}", dt.hour()),
                    ('H', _) => write!(out, "{:02}", dt.hour()),
                    ('h', 1) => write!(out, "{}", dt.hour12().1),
                    ('h', _) => write!(out, "{:02}", dt.hour12().1),
                    ('m', 1) => write!(out, "{}", dt.minute()),
                    ('m', _) => write!(out, "{:02}", dt.minute()),
                    ('s', 1) => write!(out, "{}", dt.second()),
                    ('s', _) => write!(out, "{:02}", dt.second()),
                    ('S', _) => write!(out, "{:03}", dt.timestamp_subsec_millis()),
                    ('A', _) => out.write_str(if dt.hour12().0 { "PM" } else { "AM" }),
                    ('a', _) => out.write_str(if dt.hour12().0 { "pm" } else { "am" }),
                    ('Q', _) => write!(out, "{}", dt.month0() / 3 + 1),
                    ('Z', 1) => write!(out, "{}", dt.format("%:z")),
                    ('Z', _) => write!(out, "{}", dt.format("%z")),
                    ('X', _) => write!(out, "{}", dt.timestamp()),
                    ('x', _) => write!(out, "{}", dt.timestamp_millis()),
                    _ => {
                        out.extend(std::iter::repeat(c).take(n));
                        Ok(())
                    }
                };
            }
        }
    }
    out
}

/// Translate a dayjs-style format into a chrono parse pattern. `None` when the format
/// uses tokens that cannot be parsed back (quarters, weekday numbers, epoch values).
fn to_strftime(format: &str) -> Option<String> {
    let mut out = String::new();
    for token in tokenize(format) {
        match token {
            Token::Literal(s) => out.push_str(&s.replace('%', "%%")),
            Token::Field(c, n) => out.push_str(match (c, n) {
                ('Y', 2) => "%y",
                ('Y', _) => "%Y",
                ('M', 1) | ('M', 2) => "%m",
                ('M', 3) => "%b",
                ('M', _) => "%B",
                ('D', _) => "%d",
                ('d', 3) | ('d', 2) => "%a",
                ('d', 4) => "%A",
                ('H', _) => "%H",
                ('h', _) => "%I",
                ('m', _) => "%M",
                ('s', _) => "%S",
                ('S', _) => "%3f",
                ('A', _) | ('a', _) => "%p",
                ('Z', 1) => "%:z",
                ('Z', _) => "%z",
                _ => return None,
            }),
        }
    }
    Some(out)
}
