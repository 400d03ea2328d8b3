//! Turns the raw period dates of the feed into `Period` descriptors.
//!
//! The feed stores each half-year as the last day of the month before it starts, so
//! `2023-02-28` is the period that starts in March 2023 and `2023-08-31` the one that starts in
//! September 2023. Only March and September periods exist.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::Amount;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::{trace, warn};

/// The half of the year that a period covers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum Season {
    /// The period that starts in March.
    Mar,
    /// The period that starts in September.
    Sep,
}

serde_plain::derive_display_from_serialize!(Season);

impl Season {
    /// The season of a period that starts in `month` (1-based), if any.
    fn from_start_month(month: u32) -> Option<Self> {
        match month {
            3 => Some(Season::Mar),
            9 => Some(Season::Sep),
            _ => None,
        }
    }
}

/// One billing half-year.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Period {
    index: usize,
    label: String,
    season: Season,
    year: i32,
    raw_date: NaiveDate,
    start_date: NaiveDate,
    unit_price: Amount,
    is_price_change_marker: bool,
}

impl Period {
    fn new(index: usize, raw_date: NaiveDate) -> Res<Self> {
        let start_date = start_of_next_month(raw_date)?;
        let season = match Season::from_start_month(start_date.month()) {
            Some(season) => season,
            None => {
                warn!(
                    "Period {index} ({raw_date}) starts in month {} which is neither March nor \
                    September",
                    start_date.month()
                );
                bail!(
                    "The period date {raw_date} at index {index} does not precede a March or \
                    September period start"
                )
            }
        };
        let year = start_date.year();
        Ok(Self {
            index,
            label: label(season, year),
            season,
            year,
            raw_date,
            start_date,
            unit_price: unit_price(season, year),
            is_price_change_marker: is_price_change_marker(season, year),
        })
    }

    /// Zero-based position in the chronological sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Short display name, e.g. `Mar 23`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the period starts in March or September.
    pub fn season(&self) -> Season {
        self.season
    }

    /// The full year in which the period starts.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The date as it appeared in the feed.
    pub fn raw_date(&self) -> NaiveDate {
        self.raw_date
    }

    /// The first day of the period.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The fee in effect for this period.
    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    /// Whether this period is the first one at a new price.
    pub fn is_price_change_marker(&self) -> bool {
        self.is_price_change_marker
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Converts the raw period dates of a feed into `Period` descriptors.
///
/// # Errors
/// - A date that cannot be parsed.
/// - A date that is not strictly after the one before it.
/// - A date whose following month is neither March nor September.
pub fn normalize<S>(raw_period_dates: &[S]) -> Result<Vec<Period>>
where
    S: AsRef<str>,
{
    normalize_inner(raw_period_dates).pub_result(ErrorType::Feed)
}

pub(crate) fn normalize_inner<S>(raw_period_dates: &[S]) -> Res<Vec<Period>>
where
    S: AsRef<str>,
{
    let mut periods: Vec<Period> = Vec::with_capacity(raw_period_dates.len());
    for (index, raw) in raw_period_dates.iter().enumerate() {
        let raw = raw.as_ref();
        let date = parse_date(raw).with_context(|| format!("Bad period date at index {index}"))?;
        if let Some(previous) = periods.last() {
            if date <= previous.raw_date {
                bail!(
                    "Period dates must be strictly increasing, but {date} at index {index} comes \
                    after {}",
                    previous.raw_date
                );
            }
        }
        let period = Period::new(index, date)?;
        trace!("Period {index}: {raw} -> {}", period.label);
        periods.push(period);
    }
    Ok(periods)
}

/// Parses either a plain `YYYY-MM-DD` date or an RFC 3339 date-time, keeping only the date.
fn parse_date(raw: &str) -> Res<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .with_context(|| format!("Unable to parse '{raw}' as an ISO-8601 date"))
}

fn start_of_next_month(date: NaiveDate) -> Res<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("The month after {date} is out of range"))
}

fn label(season: Season, year: i32) -> String {
    format!("{season} {:02}", year.rem_euclid(100))
}

/// The price step function. The price went up in September 2023 and again in September 2025.
fn unit_price(season: Season, year: i32) -> Amount {
    let euros = match (year, season) {
        (..=2022, _) => 10,
        (2023, Season::Mar) => 10,
        (2023, Season::Sep) => 13,
        (2024, _) => 13,
        (2025, Season::Mar) => 13,
        (2025, Season::Sep) => 15,
        (2026.., _) => 15,
    };
    Amount::euros(euros)
}

fn is_price_change_marker(season: Season, year: i32) -> bool {
    season == Season::Sep && (year == 2023 || year == 2025)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(periods: &[Period]) -> Vec<&str> {
        periods.iter().map(|p| p.label()).collect()
    }

    #[test]
    fn test_normalize_example() {
        let periods = normalize(&["2023-02-28", "2023-08-31", "2024-02-29"]).unwrap();
        assert_eq!(labels(&periods), vec!["Mar 23", "Sep 23", "Mar 24"]);
        let prices: Vec<Amount> = periods.iter().map(|p| p.unit_price()).collect();
        assert_eq!(
            prices,
            vec![Amount::euros(10), Amount::euros(13), Amount::euros(13)]
        );
        assert_eq!(
            periods.iter().map(|p| p.index()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            periods[1].start_date(),
            NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
        );
        assert_eq!(
            periods[1].raw_date(),
            NaiveDate::from_ymd_opt(2023, 8, 31).unwrap()
        );
    }

    #[test]
    fn test_price_step_function() {
        let cases = [
            (Season::Sep, 2021, 10),
            (Season::Mar, 2022, 10),
            (Season::Mar, 2023, 10),
            (Season::Sep, 2023, 13),
            (Season::Mar, 2024, 13),
            (Season::Sep, 2024, 13),
            (Season::Mar, 2025, 13),
            (Season::Sep, 2025, 15),
            (Season::Mar, 2026, 15),
            (Season::Sep, 2031, 15),
        ];
        for (season, year, euros) in cases {
            assert_eq!(
                unit_price(season, year),
                Amount::euros(euros),
                "{season} {year}"
            );
        }
    }

    #[test]
    fn test_price_is_monotonic() {
        let raw: Vec<String> = (2019..2030)
            .flat_map(|y| [format!("{y}-02-28"), format!("{y}-08-31")])
            .collect();
        let periods = normalize(&raw).unwrap();
        for pair in periods.windows(2) {
            assert!(pair[0].unit_price() <= pair[1].unit_price());
        }
    }

    #[test]
    fn test_price_change_markers() {
        let raw: Vec<String> = (2022..2027)
            .flat_map(|y| [format!("{y}-02-28"), format!("{y}-08-31")])
            .collect();
        let periods = normalize(&raw).unwrap();
        let markers: Vec<&str> = periods
            .iter()
            .filter(|p| p.is_price_change_marker())
            .map(|p| p.label())
            .collect();
        assert_eq!(markers, vec!["Sep 23", "Sep 25"]);
    }

    #[test]
    fn test_rfc3339_dates() {
        let periods = normalize(&["2022-02-28T00:00:00Z", "2022-08-31T00:00:00.000Z"]).unwrap();
        assert_eq!(labels(&periods), vec!["Mar 22", "Sep 22"]);
    }

    #[test]
    fn test_empty() {
        let periods = normalize::<&str>(&[]).unwrap();
        assert!(periods.is_empty());
    }

    #[test]
    fn test_unexpected_month_is_rejected() {
        let err = normalize(&["2023-02-28", "2023-05-31"]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Feed);
        assert!(err.to_string().contains("2023-05-31"));
    }

    #[test]
    fn test_december_rolls_over() {
        // The month after December is January of the next year, which is not a valid start.
        assert!(normalize(&["2023-12-31"]).is_err());
        assert_eq!(
            start_of_next_month(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_not_increasing_is_rejected() {
        assert!(normalize(&["2023-08-31", "2023-02-28"]).is_err());
        assert!(normalize(&["2023-08-31", "2023-08-31"]).is_err());
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = normalize(&["2023-02-28", "not a date"]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Feed);
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_mid_month_date_uses_following_month() {
        let periods = normalize(&["2024-02-15"]).unwrap();
        assert_eq!(periods[0].label(), "Mar 24");
        assert_eq!(
            periods[0].start_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
