//! ISO week windows.
//!
//! A [`WeekWindow`] is expressed in local wall-clock time. Conversion to UTC
//! instants goes through a [`Clock`], which owns the notion of "local".

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

/// Source of the current local time and of the local → UTC mapping
pub trait Clock: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// Map a local wall-clock time to a UTC instant
    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc>;
}

/// Monday 00:00:00.000 through Sunday 23:59:59.999, local time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub week_key: String,
}

impl WeekWindow {
    /// Resolve the week containing `now`, shifted by `week_offset` weeks.
    ///
    /// Sunday belongs to the week that started the Monday before it. Offsets
    /// that leave chrono's date range clamp to the first or last full week.
    pub fn resolve(now: NaiveDateTime, week_offset: i64) -> Self {
        let today = now.date();
        let days_since_monday = u64::from(today.weekday().num_days_from_monday());
        let this_monday = today
            .checked_sub_days(Days::new(days_since_monday))
            .unwrap_or_else(first_monday);

        Self::starting(shift_weeks(this_monday, week_offset))
    }

    /// Window for the week starting on `monday`
    fn starting(monday: NaiveDate) -> Self {
        let sunday = monday
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX);

        Self {
            start: monday.and_time(NaiveTime::MIN),
            end: sunday.and_time(last_millisecond()),
            week_key: week_key(monday),
        }
    }

    /// Local bounds as UTC instants
    pub fn utc_bounds(&self, clock: &dyn Clock) -> (DateTime<Utc>, DateTime<Utc>) {
        (clock.to_utc(self.start), clock.to_utc(self.end))
    }
}

/// ISO-8601 week key (`YYYY-Www`) of the week containing `date`.
///
/// The year is the ISO week-year, which differs from the calendar year for
/// some days around January 1st.
pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Monday of the week named by a `YYYY-Www` key, or `None` if there is no such week
pub fn parse_week_key(key: &str) -> Option<NaiveDate> {
    let (year, week) = key.split_once("-W")?;
    if week.len() != 2 || !week.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

fn shift_weeks(monday: NaiveDate, weeks: i64) -> NaiveDate {
    TimeDelta::try_weeks(weeks)
        .and_then(|delta| monday.checked_add_signed(delta))
        .filter(|m| m.checked_add_days(Days::new(6)).is_some())
        .unwrap_or_else(|| {
            if weeks < 0 {
                first_monday()
            } else {
                last_monday()
            }
        })
}

fn first_monday() -> NaiveDate {
    let min = NaiveDate::MIN;
    let ahead = (7 - min.weekday().num_days_from_monday()) % 7;
    min.checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(min)
}

fn last_monday() -> NaiveDate {
    let latest_start = NaiveDate::MAX
        .checked_sub_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);
    let back = latest_start.weekday().num_days_from_monday();
    latest_start
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(latest_start)
}

fn last_millisecond() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}
