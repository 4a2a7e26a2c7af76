// In crates/analytics/src/temporal.rs

//! Date-bucketing helpers.
//!
//! Every function works on a `DateTime<Tz>` so "local" always means the zone
//! the caller converted into. Nothing here reads the clock.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};

/// Weekdays in the order they are presented (Monday first).
pub const WEEKDAY_DISPLAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// "YYYY-MM-DD" of the local calendar day.
pub fn day_key<Tz: TimeZone>(d: &DateTime<Tz>) -> String {
    let date = d.date_naive();
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// ISO-8601 week id, "YYYY-Www". The year is the ISO week-year, which can
/// differ from the calendar year around January 1st.
pub fn week_key<Tz: TimeZone>(d: &DateTime<Tz>) -> String {
    let iso = d.date_naive().iso_week();
    format!("{:04}-W{:02}", iso.year(), iso.week())
}

/// "YYYY-MM" of the local calendar month.
pub fn month_key<Tz: TimeZone>(d: &DateTime<Tz>) -> String {
    let date = d.date_naive();
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Natural calendar index: 0 = Sunday ... 6 = Saturday.
pub fn weekday_index<Tz: TimeZone>(d: &DateTime<Tz>) -> u32 {
    d.date_naive().weekday().num_days_from_sunday()
}

/// Local hour, 0..=23.
pub fn hour_of_day<Tz: TimeZone>(d: &DateTime<Tz>) -> u32 {
    d.hour()
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 always exists on a naive calendar.
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}

/// First millisecond and last millisecond of the local day.
pub fn day_bounds<Tz: TimeZone>(d: &DateTime<Tz>) -> (NaiveDateTime, NaiveDateTime) {
    let date = d.date_naive();
    (start_of(date), end_of(date))
}

/// Monday 00:00:00.000 to Sunday 23:59:59.999 of the ISO week containing `d`.
pub fn week_bounds<Tz: TimeZone>(d: &DateTime<Tz>) -> (NaiveDateTime, NaiveDateTime) {
    let date = d.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let sunday = monday + Duration::days(6);
    (start_of(monday), end_of(sunday))
}

/// First day 00:00:00.000 to last day 23:59:59.999 of the local month.
pub fn month_bounds<Tz: TimeZone>(d: &DateTime<Tz>) -> (NaiveDateTime, NaiveDateTime) {
    let date = d.date_naive();
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|n| n.pred_opt()).unwrap_or(first);
    (start_of(first), end_of(last))
}

/// e.g. "Mon, Mar 04 2024"
pub fn day_label(start: NaiveDateTime) -> String {
    start.format("%a, %b %d %Y").to_string()
}

/// e.g. "Mar 04 - Mar 10, 2024"
pub fn week_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"))
}

/// e.g. "March 2024"
pub fn month_label(start: NaiveDateTime) -> String {
    start.format("%B %Y").to_string()
}

/// Short English name used for weekday buckets.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
