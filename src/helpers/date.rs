//! Date helper functions
//!
//! Post dates are calendar days. Anything that needs an instant uses UTC
//! midnight of that day.

use chrono::{DateTime, NaiveDate, Utc};

/// UTC midnight at the start of `date`
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Long English form, e.g. "January 5, 2024"
pub fn full_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// ISO 8601 with milliseconds and a `Z` suffix, e.g. "2024-01-05T00:00:00.000Z"
pub fn date_xml<Tz: chrono::TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// RFC 1123 form used by RSS, e.g. "Fri, 05 Jan 2024 00:00:00 GMT"
pub fn date_rfc1123<Tz: chrono::TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Publication instant of a post in ISO form
pub fn published_xml(date: NaiveDate) -> String {
    date_xml(&utc_midnight(date))
}
