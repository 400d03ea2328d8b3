//! Fetching the payment sheet and handing off reminder requests.
//!
//! The `Source` trait is the seam between the pure ledger logic and the outside world. A fresh
//! `Snapshot` is loaded from a `Source` for every command, and nothing is cached between loads.

mod file;
mod http;
mod reminder;
mod test_source;

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{FeedFormat, Ledger, RawFeed};
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub(crate) use file::FileSource;
pub(crate) use http::HttpSource;
pub(crate) use reminder::{send_reminder, Reminder};
pub(crate) use test_source::TestSource;

/// The environment variable that, when set to a non-empty value, switches to `Mode::Testing`.
pub const TEST_MODE_ENV: &str = "DUES_IN_TEST_MODE";

/// Whether to talk to the real feed and reminder endpoints or to in-memory stand-ins.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Live,
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Testing` if `DUES_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Live`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Live,
        }
    }
}

/// Something that can produce the raw text of the payment sheet.
#[async_trait::async_trait]
pub(crate) trait Source {
    /// Fetches the raw feed text.
    async fn fetch(&self) -> Res<String>;

    /// The encoding of the text returned by `fetch`.
    fn format(&self) -> FeedFormat;

    /// A short description of where the data comes from, for logging.
    fn describe(&self) -> String;
}

/// The outcome of one attempt to load the ledger.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Snapshot {
    /// The feed was fetched and validated.
    Ready(Ledger),
    /// The feed could not be fetched. There is nothing to reconcile.
    Unavailable { reason: String },
}

impl Snapshot {
    /// The ledger, or an `Unavailable` error explaining why there is none.
    pub fn ledger(&self) -> Result<&Ledger> {
        match self {
            Snapshot::Ready(ledger) => Ok(ledger),
            Snapshot::Unavailable { reason } => {
                Err(anyhow!("The payment data is not available: {reason}"))
                    .pub_result(ErrorType::Unavailable)
            }
        }
    }

    /// Consumes the snapshot, returning the ledger or an `Unavailable` error.
    pub fn into_ledger(self) -> Result<Ledger> {
        match self {
            Snapshot::Ready(ledger) => Ok(ledger),
            Snapshot::Unavailable { reason } => {
                Err(anyhow!("The payment data is not available: {reason}"))
                    .pub_result(ErrorType::Unavailable)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Snapshot::Ready(_))
    }
}

/// Creates the `Source` described by `config`, or the in-memory source in `Mode::Testing`.
pub(crate) fn source(config: &Config, mode: Mode) -> Res<Box<dyn Source + Send + Sync>> {
    let source: Box<dyn Source + Send + Sync> = match mode {
        Mode::Testing => Box::new(TestSource::seeded(config.feed_format())),
        Mode::Live => match config.feed_location()? {
            FeedLocation::Url(url) => Box::new(HttpSource::new(url, config.feed_format())),
            FeedLocation::Path(path) => Box::new(FileSource::new(path, config.feed_format())),
        },
    };
    Ok(source)
}

/// Fetches and validates a new snapshot.
///
/// A failed fetch is not an error here: it becomes `Snapshot::Unavailable`. A feed that was
/// fetched but cannot be parsed or validated is a `Feed` error.
pub(crate) async fn load(source: &(dyn Source + Send + Sync)) -> Result<Snapshot> {
    let description = source.describe();
    debug!("Fetching payment data from {description}");
    let text = match source.fetch().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Unable to fetch payment data from {description}: {e:#}");
            return Ok(Snapshot::Unavailable {
                reason: format!("{e:#}"),
            });
        }
    };
    let ledger = RawFeed::parse(&text, source.format())
        .and_then(Ledger::from_feed_inner)
        .with_context(|| format!("The payment data from {description} is malformed"))
        .pub_result(ErrorType::Feed)?;
    Ok(Snapshot::Ready(ledger))
}

/// Where the configured feed lives.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum FeedLocation {
    Url(url::Url),
    Path(std::path::PathBuf),
}

impl FeedLocation {
    /// `http` and `https` URLs are fetched over the network, `file` URLs and anything that does
    /// not parse as a URL are treated as local paths.
    pub(crate) fn parse(s: &str) -> Res<Self> {
        match url::Url::parse(s) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(FeedLocation::Url(url)),
                "file" => url
                    .to_file_path()
                    .map(FeedLocation::Path)
                    .map_err(|_| anyhow!("Unable to convert '{s}' to a file path")),
                // A Windows drive letter such as `C:` parses as a one-letter scheme.
                drive if drive.len() == 1 => Ok(FeedLocation::Path(s.into())),
                other => Err(anyhow!("Unsupported feed URL scheme '{other}' in '{s}'")),
            },
            Err(_) => Ok(FeedLocation::Path(s.into())),
        }
    }
}
