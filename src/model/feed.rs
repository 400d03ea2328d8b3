//! The raw shapes in which the payment sheet is published.
//!
//! Two formats are supported:
//!
//! - JSON, which already has one record per member:
//!   ```json
//!   {
//!     "periods": ["2023-02-28", "2023-08-31"],
//!     "members": [{ "name": "Eleni", "data": [1, 0] }],
//!     "lastUpdated": "2023-09-04"
//!   }
//!   ```
//! - CSV, which is the spreadsheet export and has one row per period. The first column holds the
//!   raw period date (its header is ignored, conventionally `Period`) and every other header cell
//!   is a member name:
//!   ```csv
//!   Period,Eleni,Nikos
//!   2023-02-28,1,1
//!   2023-08-31,0,1
//!   ```
//!   CSV is transposed into the same per-member records as JSON.

use crate::error::Res;
use crate::model::{Member, PaymentFlag};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Cursor;

/// The supported feed encodings.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Json,
    Csv,
}

serde_plain::derive_display_from_serialize!(FeedFormat);
serde_plain::derive_fromstr_from_deserialize!(FeedFormat);

/// The feed exactly as published, before any validation of dates or lengths.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeed {
    pub(crate) periods: Vec<String>,
    pub(crate) members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_updated: Option<String>,
}

impl RawFeed {
    /// Parses `text` according to `format`.
    pub(crate) fn parse(text: &str, format: FeedFormat) -> Res<Self> {
        match format {
            FeedFormat::Json => Self::from_json(text),
            FeedFormat::Csv => Self::from_csv(text),
        }
    }

    pub(crate) fn from_json(text: &str) -> Res<Self> {
        serde_json::from_str(text).context("Unable to parse the JSON feed")
    }

    /// Transposes the row-per-period spreadsheet export into one record per member.
    pub(crate) fn from_csv(text: &str) -> Res<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(Cursor::new(text.as_bytes()));

        let headers = rdr
            .headers()
            .context("Unable to read the CSV header row")?
            .clone();
        let mut columns = headers.iter();
        if columns.next().is_none() {
            bail!("The CSV feed has no header row");
        }

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for (ix, name) in columns.enumerate() {
            if name.is_empty() {
                bail!("The CSV header has an empty member name in column {}", ix + 2);
            }
            if !seen.insert(name) {
                bail!("The CSV header lists member '{name}' more than once");
            }
            names.push(name.to_string());
        }

        let mut periods = Vec::new();
        let mut flags: Vec<Vec<PaymentFlag>> = vec![Vec::new(); names.len()];
        for (row_ix, result) in rdr.records().enumerate() {
            // Row numbers are 1-based and the header is row 1.
            let row_number = row_ix + 2;
            let record = result.with_context(|| format!("Unable to read CSV row {row_number}"))?;
            let mut cells = record.iter();
            let period = cells.next().unwrap_or_default();
            if period.is_empty() {
                bail!("CSV row {row_number} has no period date");
            }
            periods.push(period.to_string());
            for ((cell, name), member_flags) in cells.zip(&names).zip(flags.iter_mut()) {
                let flag = cell.parse::<PaymentFlag>().with_context(|| {
                    format!("Bad payment flag for '{name}' in CSV row {row_number}")
                })?;
                member_flags.push(flag);
            }
        }

        let members = names
            .into_iter()
            .zip(flags)
            .map(|(name, member_flags)| Member::new(name, member_flags))
            .collect();

        Ok(Self {
            periods,
            members,
            last_updated: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "periods": ["2023-02-28", "2023-08-31"],
            "members": [
                { "name": "Eleni", "data": [1, 0] },
                { "name": "Nikos", "data": [1, 1] }
            ],
            "lastUpdated": "2023-09-04"
        }"#;
        let feed = RawFeed::from_json(json).unwrap();
        assert_eq!(feed.periods, vec!["2023-02-28", "2023-08-31"]);
        assert_eq!(feed.members.len(), 2);
        assert_eq!(feed.members[1].name(), "Nikos");
        assert_eq!(feed.last_updated.as_deref(), Some("2023-09-04"));
    }

    #[test]
    fn test_from_json_without_last_updated() {
        let json = r#"{ "periods": [], "members": [] }"#;
        let feed = RawFeed::from_json(json).unwrap();
        assert!(feed.last_updated.is_none());
    }

    #[test]
    fn test_from_json_missing_members() {
        assert!(RawFeed::from_json(r#"{ "periods": ["2023-02-28"] }"#).is_err());
    }

    #[test]
    fn test_from_json_bad_flag() {
        let json = r#"{ "periods": ["2023-02-28"], "members": [{ "name": "A", "data": [3] }] }"#;
        assert!(RawFeed::from_json(json).is_err());
    }

    #[test]
    fn test_from_csv_transposes() {
        let csv = "Period,Eleni,Nikos\n2023-02-28,1,1\n2023-08-31,0,1\n2024-02-29, 0 ,0\n";
        let feed = RawFeed::from_csv(csv).unwrap();
        assert_eq!(feed.periods, vec!["2023-02-28", "2023-08-31", "2024-02-29"]);
        assert_eq!(
            feed.members,
            vec![
                Member::new("Eleni", [true, false, false]),
                Member::new("Nikos", [true, true, false]),
            ]
        );
    }

    #[test]
    fn test_from_csv_ignores_first_header() {
        let csv = "whatever,A\n2023-02-28,1\n";
        let feed = RawFeed::from_csv(csv).unwrap();
        assert_eq!(feed.members[0].name(), "A");
    }

    #[test]
    fn test_from_csv_duplicate_name() {
        let csv = "Period,A,A\n2023-02-28,1,0\n";
        let err = RawFeed::from_csv(csv).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_from_csv_empty_name() {
        let csv = "Period,A,\n2023-02-28,1,0\n";
        assert!(RawFeed::from_csv(csv).is_err());
    }

    #[test]
    fn test_from_csv_ragged_row() {
        let csv = "Period,A,B\n2023-02-28,1\n";
        assert!(RawFeed::from_csv(csv).is_err());
    }

    #[test]
    fn test_from_csv_bad_flag() {
        let csv = "Period,A\n2023-02-28,x\n";
        let err = RawFeed::from_csv(csv).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_from_csv_empty_cell() {
        let csv = "Period,A\n2023-02-28,\n";
        assert!(RawFeed::from_csv(csv).is_err());
    }

    #[test]
    fn test_parse_dispatches_on_format() {
        let csv = "Period,A\n2023-02-28,1\n";
        assert!(RawFeed::parse(csv, FeedFormat::Csv).is_ok());
        assert!(RawFeed::parse(csv, FeedFormat::Json).is_err());
    }

    #[test]
    fn test_feed_format_plain_serde() {
        assert_eq!(FeedFormat::Csv.to_string(), "csv");
        assert_eq!("json".parse::<FeedFormat>().unwrap(), FeedFormat::Json);
    }
}
