//! Time utilities: spreadsheet cell formats, worksheet naming, decimal hours.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Date column format (e.g. `07.03.2025`)
pub fn date_cell<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%d.%m.%Y").to_string()
}

/// Start/end column format (e.g. `09:05`)
pub fn time_cell<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%H:%M").to_string()
}

/// One worksheet per month, named `MM-YYYY`
pub fn month_sheet_name<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%m-%Y").to_string()
}

/// Whole minutes between two instants; partial minutes are dropped.
pub fn elapsed_minutes<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    end.clone()
        .signed_duration_since(start.clone())
        .num_seconds()
        .div_euclid(60)
}

/// Minutes → hours, rounded to two decimals (90 → 1.5)
pub fn decimal_hours(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

/// Render hours the way they are shown to the user and stored in the sheet:
/// at least one decimal, at most two (`8.0`, `1.5`, `7.33`).
pub fn format_hours(hours: f64) -> String {
    let two = format!("{:.2}", hours);
    let trimmed = two.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}
