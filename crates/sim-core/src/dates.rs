//! Calendar helpers and the ISO-8601 date codec used by save files.
//!
//! Game dates are whole days. On the wire they are written as UTC midnight
//! with millisecond precision (`2024-01-01T00:00:00.000Z`); parsing accepts
//! that form and a bare `YYYY-MM-DD`.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

/// Timestamp layout recognized when reviving dates from a snapshot.
pub const ISO_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const DAYS_PER_YEAR: f64 = 365.25;

pub fn to_iso(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, ISO_MILLIS_FORMAT)
        .map(|dt| dt.date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// `date + days`, saturating at the calendar's upper bound.
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Last calendar day of the month preceding `date`'s month.
pub fn last_day_of_previous_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Length of the month that just ended when the calendar reached `date`.
pub fn days_in_previous_month(date: NaiveDate) -> u32 {
    last_day_of_previous_month(date).day()
}

/// Fractional years elapsed between two dates (negative when `to < from`).
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Serde adapter for `NaiveDate` fields using the ISO millisecond format.
pub mod iso {
    use super::{parse_iso, to_iso};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&to_iso(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_iso(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }
}
