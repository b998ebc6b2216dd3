//! Trading-day resolution around weekends and exchange holidays.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

use crate::clock::Clock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("no holiday calendar configured for {0}")]
    UnsupportedYear(i32),
}

/// Exchange holidays, grouped by year.
///
/// A year that is absent is unsupported: asking whether one of its dates is
/// a holiday is an error rather than a silent "no".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    years: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

/// Built-in German exchange holidays.
const DEFAULT_HOLIDAYS: &[(i32, &[(u32, u32)])] = &[
    (
        2020,
        &[
            (1, 1),
            (4, 10),
            (4, 13),
            (5, 1),
            (6, 1),
            (10, 3),
            (12, 25),
            (12, 26),
        ],
    ),
    (
        2021,
        &[
            (1, 1),
            (4, 2),
            (4, 4),
            (4, 5),
            (5, 1),
            (5, 13),
            (5, 23),
            (5, 24),
            (10, 3),
            (12, 25),
            (12, 26),
        ],
    ),
    (
        2022,
        &[
            (1, 1),
            (4, 15),
            (4, 18),
            (5, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ],
    ),
    (
        2023,
        &[
            (1, 1),
            (4, 7),
            (4, 10),
            (5, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ],
    ),
    (
        2024,
        &[
            (1, 1),
            (3, 29),
            (4, 1),
            (5, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ],
    ),
    (
        2025,
        &[
            (1, 1),
            (4, 18),
            (4, 21),
            (5, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ],
    ),
    (
        2026,
        &[
            (1, 1),
            (4, 3),
            (4, 6),
            (5, 1),
            (12, 24),
            (12, 25),
            (12, 26),
            (12, 31),
        ],
    ),
];

impl Default for HolidayCalendar {
    fn default() -> Self {
        let mut calendar = Self::empty();
        for (year, days) in DEFAULT_HOLIDAYS {
            let dates = days
                .iter()
                .filter_map(|(month, day)| NaiveDate::from_ymd_opt(*year, *month, *day));
            calendar = calendar.with_year(*year, dates);
        }
        calendar
    }
}

impl HolidayCalendar {
    /// A calendar that supports no year at all.
    pub fn empty() -> Self {
        Self {
            years: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the holidays for `year`.
    ///
    /// Dates outside `year` are ignored. An empty list still marks the year as
    /// supported.
    pub fn with_year(mut self, year: i32, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        let days = holidays.into_iter().filter(|d| d.year() == year).collect();
        self.years.insert(year, days);
        self
    }

    pub fn covers(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        self.years
            .get(&date.year())
            .map(|days| days.contains(&date))
            .ok_or(CalendarError::UnsupportedYear(date.year()))
    }
}

/// Maps `date` to the nearest trading day on or before it.
///
/// Saturdays step back one day, Sundays two, and holidays one; the result is
/// re-checked until a weekday that is not a holiday is reached.
pub fn resolve_trading_day(
    date: NaiveDate,
    calendar: &HolidayCalendar,
) -> Result<NaiveDate, CalendarError> {
    match date.weekday() {
        Weekday::Sat => resolve_trading_day(date - Duration::days(1), calendar),
        Weekday::Sun => resolve_trading_day(date - Duration::days(2), calendar),
        _ if calendar.is_holiday(date)? => resolve_trading_day(date - Duration::days(1), calendar),
        _ => Ok(date),
    }
}

/// The trading day before `day`.
pub fn previous_trading_day(
    day: NaiveDate,
    calendar: &HolidayCalendar,
) -> Result<NaiveDate, CalendarError> {
    resolve_trading_day(day - Duration::days(1), calendar)
}

/// The trading day whose close is the most recent one at `now`.
///
/// Before `cutoff_hour` (local to `now`) the market is treated as not yet
/// open and resolution starts from the previous calendar day.
pub fn current_trading_day<T: TimeZone>(
    now: &DateTime<T>,
    cutoff_hour: u32,
    calendar: &HolidayCalendar,
) -> Result<NaiveDate, CalendarError> {
    let today = now.date_naive();
    let start = if now.hour() < cutoff_hour {
        today - Duration::days(1)
    } else {
        today
    };
    resolve_trading_day(start, calendar)
}

/// Exchange session settings: where the exchange is and when it opens.
#[derive(Debug, Clone)]
pub struct TradingSession {
    pub calendar: HolidayCalendar,
    pub timezone: Tz,
    pub open_hour: u32,
}

impl Default for TradingSession {
    fn default() -> Self {
        Self {
            calendar: HolidayCalendar::default(),
            timezone: chrono_tz::Europe::Berlin,
            open_hour: 9,
        }
    }
}

impl TradingSession {
    pub fn current_trading_day(&self, clock: &dyn Clock) -> Result<NaiveDate, CalendarError> {
        current_trading_day(&clock.now_in(self.timezone), self.open_hour, &self.calendar)
    }

    pub fn previous_trading_day(&self, day: NaiveDate) -> Result<NaiveDate, CalendarError> {
        previous_trading_day(day, &self.calendar)
    }

    pub fn resolve(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        resolve_trading_day(date, &self.calendar)
    }
}
