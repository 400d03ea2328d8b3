//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole app can
//! be run, top-to-bottom, without a published feed. Set `DUES_IN_TEST_MODE` to use it.

use crate::api::Source;
use crate::error::Res;
use crate::model::FeedFormat;

/// An implementation of the `Source` trait that holds the feed text in memory and, by default, is
/// seeded with the data from this module.
pub(crate) struct TestSource {
    format: FeedFormat,
    data: String,
}

impl TestSource {
    /// Create a new `TestSource` that will return `data` as a feed encoded as `format`.
    pub(crate) fn new(format: FeedFormat, data: impl Into<String>) -> Self {
        Self {
            format,
            data: data.into(),
        }
    }

    /// Create a `TestSource` holding the seed data from this module, encoded as `format`.
    pub(crate) fn seeded(format: FeedFormat) -> Self {
        let data = match format {
            FeedFormat::Json => SEED_JSON,
            FeedFormat::Csv => SEED_CSV,
        };
        Self::new(format, data)
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn fetch(&self) -> Res<String> {
        Ok(self.data.clone())
    }

    fn format(&self) -> FeedFormat {
        self.format
    }

    fn describe(&self) -> String {
        format!("in-memory test data ({})", self.format)
    }
}

/// Seed data in the JSON feed format.
const SEED_JSON: &str = r#"{
  "periods": [
    "2021-08-31",
    "2022-02-28",
    "2022-08-31",
    "2023-02-28",
    "2023-08-31",
    "2024-02-29",
    "2024-08-31",
    "2025-02-28",
    "2025-08-31",
    "2026-02-28",
    "2026-08-31"
  ],
  "members": [
    { "name": "Nikos", "data": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1] },
    { "name": "Eleni", "data": [1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0] },
    { "name": "Giorgos", "data": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0] },
    { "name": "Katerina", "data": [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0] },
    { "name": "Dimitris", "data": [0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0] }
  ],
  "lastUpdated": "2026-09-01"
}"#;

/// The same seed data as the spreadsheet's CSV export, one row per period.
const SEED_CSV: &str = r#"Period,Nikos,Eleni,Giorgos,Katerina,Dimitris
2021-08-31,1,1,0,1,0
2022-02-28,1,1,0,1,1
2022-08-31,1,1,0,1,0
2023-02-28,1,1,0,1,1
2023-08-31,1,1,0,1,1
2024-02-29,1,1,0,1,0
2024-08-31,1,1,0,1,0
2025-02-28,1,0,0,1,0
2025-08-31,1,0,0,1,0
2026-02-28,1,0,0,0,0
2026-08-31,1,0,0,0,0
"#;
