use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};

/// RFC 3339 in UTC with fixed microsecond precision, so stored timestamps
/// sort lexically in the same order as chronologically.
pub fn format_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn now_rfc3339() -> String {
    format_rfc3339(Utc::now())
}

/// Half-open `[start, end)` bounds of a calendar month, formatted like stored timestamps.
pub fn month_bounds(month: u32, year: i32) -> Option<(String, String)> {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()?;
    Some((format_rfc3339(start), format_rfc3339(end)))
}

pub fn current_month_year() -> (u32, i32) {
    let now = Utc::now();
    (now.month(), now.year())
}
