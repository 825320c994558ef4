//! Resolves the six optional date query parameters (`fyear`, `fmonth`, `fday`,
//! `tyear`, `tmonth`, `tday`) into a concrete, inclusive date range.
//!
//! Each parameter defaults to "this month" when absent: the from/to year and
//! month default to today's, the from day to 1 and the to day to the last day
//! of the to month. A day past the end of its month falls back to that bound
//! too, so `fmonth=2&fday=31` means the start of February and
//! `tmonth=2&tday=31` the end of it, rather than an error.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, Month, util::days_in_year_month};

use crate::Error;

const YEAR_DOMAIN: RangeInclusive<i32> = 1..=9999;
const MONTH_DOMAIN: RangeInclusive<i32> = 1..=12;
const DAY_DOMAIN: RangeInclusive<i32> = 1..=31;

/// The raw date query parameters, as sent by the client.
///
/// The fields are strings so that number parsing failures produce the
/// application's own validation error rather than a generic deserialization
/// rejection.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct DateRangeParams {
    /// The year of the start of the range.
    #[serde(default)]
    pub fyear: Option<String>,
    /// The month of the start of the range.
    #[serde(default)]
    pub fmonth: Option<String>,
    /// The day of the start of the range.
    #[serde(default)]
    pub fday: Option<String>,
    /// The year of the end of the range.
    #[serde(default)]
    pub tyear: Option<String>,
    /// The month of the end of the range.
    #[serde(default)]
    pub tmonth: Option<String>,
    /// The day of the end of the range.
    #[serde(default)]
    pub tday: Option<String>,
}

/// An inclusive range of calendar dates.
///
/// Serializes as a two element array of `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first date in the range.
    pub from: Date,
    /// The last date in the range.
    pub to: Date,
}

impl DateRange {
    /// Resolve the raw query parameters into a date range, filling in the
    /// blanks relative to `today`.
    ///
    /// # Errors
    /// Returns [Error::Validation] with:
    /// - `"Value must be numeric"` if a parameter is not an integer,
    /// - `"Out of range"` if a parameter is outside its domain (year 1-9999,
    ///   month 1-12, day 1-31),
    /// - `"Start date is newer then end date"` if the range is inverted.
    pub fn resolve(params: &DateRangeParams, today: Date) -> Result<Self, Error> {
        let from_year = parse_param(params.fyear.as_deref(), YEAR_DOMAIN)?
            .unwrap_or_else(|| today.year());
        let from_month = parse_param(params.fmonth.as_deref(), MONTH_DOMAIN)?
            .unwrap_or(today.month() as i32);
        let from_day = parse_param(params.fday.as_deref(), DAY_DOMAIN)?.unwrap_or(1);

        let to_year =
            parse_param(params.tyear.as_deref(), YEAR_DOMAIN)?.unwrap_or_else(|| today.year());
        let to_month =
            parse_param(params.tmonth.as_deref(), MONTH_DOMAIN)?.unwrap_or(today.month() as i32);
        let to_day = parse_param(params.tday.as_deref(), DAY_DOMAIN)?.unwrap_or(31);

        let from = build_date(from_year, from_month, from_day, Bound::Start)?;
        let to = build_date(to_year, to_month, to_day, Bound::End)?;

        if from > to {
            return Err(Error::Validation(
                "Start date is newer then end date".to_owned(),
            ));
        }

        Ok(Self { from, to })
    }

    /// The range as a standard inclusive range, for querying.
    pub fn as_range(&self) -> RangeInclusive<Date> {
        self.from..=self.to
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([self.from.to_string(), self.to.to_string()])
    }
}

/// Parse a single query parameter, treating absent and empty values as "use
/// the default".
pub(crate) fn parse_param(
    value: Option<&str>,
    domain: RangeInclusive<i32>,
) -> Result<Option<i32>, Error> {
    let Some(text) = value else {
        return Ok(None);
    };

    if text.is_empty() {
        return Ok(None);
    }

    let number: i32 = text
        .parse()
        .map_err(|_| Error::Validation("Value must be numeric".to_owned()))?;

    if !domain.contains(&number) {
        return Err(Error::Validation("Out of range".to_owned()));
    }

    Ok(Some(number))
}

/// Which end of the range a date is for.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Build a date. A `day` the month does not have falls back to the first day
/// for the start of the range and the last day for the end of it.
///
/// `month` must already be validated to be in 1-12.
fn build_date(year: i32, month: i32, day: i32, bound: Bound) -> Result<Date, Error> {
    let month =
        Month::try_from(month as u8).map_err(|_| Error::Validation("Out of range".to_owned()))?;
    let last_day = days_in_year_month(year, month);
    let day = match (day as u8, bound) {
        (day, _) if day <= last_day => day,
        (_, Bound::Start) => 1,
        (_, Bound::End) => last_day,
    };

    Date::from_calendar_date(year, month, day)
        .map_err(|_| Error::Validation("Out of range".to_owned()))
}
