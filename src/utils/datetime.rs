use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses the timestamp shapes the backend has produced over time.
pub fn parse_datetime(dt_str: &str) -> Option<DateTime<Utc>> {
    let dt_str = dt_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(dt_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    let clean_str = dt_str.trim_end_matches('Z');
    for fmt in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(clean_str, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    NaiveDate::parse_from_str(clean_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Whole and fractional hours between `then` and `now`, never negative.
pub fn age_in_hours(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - then).num_seconds().max(0);
    seconds as f64 / 3600.0
}
