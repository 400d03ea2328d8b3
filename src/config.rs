//! Configuration file handling for dues.
//!
//! The configuration file is stored at `$DUES_HOME/config.json` and records where the payment
//! sheet is published, how it is encoded, where reminder requests go, and whether the current
//! period counts toward the amount owed by default.

use crate::api::FeedLocation;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::FeedFormat;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "dues";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$DUES_HOME` and from there it loads `$DUES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and an initial `config.json` inside it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the dues home, e.g. `$HOME/dues`
    /// - `feed_url` - An `http(s)` URL, a `file://` URL or a local path to the published sheet
    /// - `feed_format` - Whether the sheet is published as JSON or as a CSV export
    /// - `reminder_url` - Where reminder requests are POSTed, if anywhere
    ///
    /// # Errors
    /// - Returns a `Config` error if either URL is unusable or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        feed_url: &str,
        feed_format: FeedFormat,
        reminder_url: Option<&str>,
    ) -> Result<Self> {
        Self::create_inner(dir.into(), feed_url, feed_format, reminder_url)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(
        maybe_relative: PathBuf,
        feed_url: &str,
        feed_format: FeedFormat,
        reminder_url: Option<&str>,
    ) -> Res<Self> {
        FeedLocation::parse(feed_url).context("The feed URL is not usable")?;
        if let Some(reminder_url) = reminder_url {
            validate_reminder_url(reminder_url)?;
        }

        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the dues home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            feed_url: feed_url.to_string(),
            feed_format,
            reminder_url: reminder_url.map(str::to_string),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `dues_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(dues_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(dues_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        if !maybe_relative.is_dir() {
            bail!(
                "The dues home directory is missing '{}', run 'dues init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'dues init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn feed_url(&self) -> &str {
        &self.config_file.feed_url
    }

    pub fn feed_format(&self) -> FeedFormat {
        self.config_file.feed_format
    }

    pub fn reminder_url(&self) -> Option<&str> {
        self.config_file.reminder_url.as_deref()
    }

    /// Whether the period that has already started counts toward the amount owed when the caller
    /// does not say otherwise.
    pub fn include_current(&self) -> bool {
        self.config_file.include_current
    }

    pub(crate) fn feed_location(&self) -> Res<FeedLocation> {
        let location = FeedLocation::parse(self.feed_url())?;
        // Relative paths are relative to the home directory.
        Ok(match location {
            FeedLocation::Path(p) if p.is_relative() => FeedLocation::Path(self.root.join(p)),
            other => other,
        })
    }
}

fn validate_reminder_url(s: &str) -> Res<()> {
    let url = url::Url::parse(s).with_context(|| format!("Invalid reminder URL '{s}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("The reminder URL must be http or https, got '{other}'"),
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "dues",
///   "config_version": 1,
///   "feed_url": "https://example.com/spotify-family.json",
///   "feed_format": "json",
///   "reminder_url": "https://script.example.com/reminders",
///   "include_current": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "dues"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL or path of the published payment sheet
    feed_url: String,

    #[serde(default)]
    feed_format: FeedFormat,

    /// Endpoint that receives reminder requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reminder_url: Option<String>,

    #[serde(default = "default_include_current")]
    include_current: bool,
}

fn default_include_current() -> bool {
    true
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            feed_url: String::new(),
            feed_format: FeedFormat::default(),
            reminder_url: None,
            include_current: default_include_current(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {}, this build understands up to {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
