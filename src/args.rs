//! These structs provide the CLI interface for the dues CLI.

use crate::model::FeedFormat;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// dues: A command-line tool for keeping track of who has paid for a shared subscription.
///
/// The payment sheet is published somewhere (a JSON file or a spreadsheet CSV export) with one
/// column of period dates and one 0/1 flag per member per period. This program reads that sheet,
/// works out how far each member has paid and tells you how much someone owes right now.
///
/// There is also a mode in which an AI agent can use this program through the mcp subcommand.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you want to keep the
    /// configuration in and pass it as --dues-home, otherwise it will be $HOME/dues. Then pass the
    /// location of the published payment sheet as --feed-url.
    Init(InitArgs),
    /// Show every billing period with its label, start date and price.
    Periods,
    /// Show how far every member has paid.
    Status(StatusArgs),
    /// Work out how much a member owes.
    Owed(OwedArgs),
    /// Ask to be reminded when a payment is due.
    Remind(RemindArgs),
    /// Run as an MCP server over stdio.
    Mcp,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the dues configuration is held. Defaults to ~/dues
    #[arg(long, env = "DUES_HOME", default_value_t = default_dues_home())]
    dues_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, dues_home: PathBuf) -> Self {
        Self {
            log_level,
            dues_home: dues_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn dues_home(&self) -> &DisplayPath {
        &self.dues_home
    }
}

/// (Not shown): Args for the `dues init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where the payment sheet is published: an http(s) URL, a file:// URL or a local path.
    /// Relative paths are resolved against the dues home directory.
    #[arg(long)]
    feed_url: String,

    /// How the payment sheet is encoded.
    #[arg(long, value_enum, default_value_t = FeedFormat::Json)]
    feed_format: FeedFormat,

    /// Where reminder requests are POSTed. Without it, `dues remind` is unavailable.
    #[arg(long)]
    reminder_url: Option<String>,
}

impl InitArgs {
    pub fn new(
        feed_url: impl Into<String>,
        feed_format: FeedFormat,
        reminder_url: Option<String>,
    ) -> Self {
        Self {
            feed_url: feed_url.into(),
            feed_format,
            reminder_url,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn feed_format(&self) -> FeedFormat {
        self.feed_format
    }

    pub fn reminder_url(&self) -> Option<&str> {
        self.reminder_url.as_deref()
    }
}

/// Args for the `dues status` command and the `status` MCP tool.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusArgs {
    /// Charge for the period that has already started (`--include-current` or
    /// `--include-current=false`). When this is not given, the `include_current` setting from
    /// config.json applies.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        overrides_with = "exclude_current"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_current: Option<bool>,

    /// Do not charge for the period that has already started. Same as `--include-current=false`.
    #[arg(long, overrides_with = "include_current")]
    #[serde(skip)]
    exclude_current: bool,

    /// Compute as if today were this date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub as_of: Option<NaiveDate>,
}

impl StatusArgs {
    pub fn new(include_current: Option<bool>, as_of: Option<NaiveDate>) -> Self {
        Self {
            include_current,
            exclude_current: false,
            as_of,
        }
    }

    /// The caller's choice about the current period, if they made one.
    pub fn include_current(&self) -> Option<bool> {
        resolve_include_current(self.include_current, self.exclude_current)
    }
}

/// Args for the `dues owed` command and the `owed` MCP tool.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OwedArgs {
    /// The member's name, exactly as it appears in the payment sheet.
    #[arg(long)]
    pub member: String,

    /// Charge for the period that has already started (`--include-current` or
    /// `--include-current=false`). When this is not given, the `include_current` setting from
    /// config.json applies.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        overrides_with = "exclude_current"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_current: Option<bool>,

    /// Do not charge for the period that has already started. Same as `--include-current=false`.
    #[arg(long, overrides_with = "include_current")]
    #[serde(skip)]
    exclude_current: bool,

    /// Compute as if today were this date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub as_of: Option<NaiveDate>,
}

impl OwedArgs {
    pub fn new(
        member: impl Into<String>,
        include_current: Option<bool>,
        as_of: Option<NaiveDate>,
    ) -> Self {
        Self {
            member: member.into(),
            include_current,
            exclude_current: false,
            as_of,
        }
    }

    /// The caller's choice about the current period, if they made one.
    pub fn include_current(&self) -> Option<bool> {
        resolve_include_current(self.include_current, self.exclude_current)
    }
}

// The two flags override each other, so at most one of them is set.
fn resolve_include_current(include_current: Option<bool>, exclude_current: bool) -> Option<bool> {
    if exclude_current {
        Some(false)
    } else {
        include_current
    }
}

/// Args for the `dues remind` command and the `remind` MCP tool.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemindArgs {
    /// The member's name, exactly as it appears in the payment sheet.
    #[arg(long)]
    pub member: String,

    /// The address the reminder should go to.
    #[arg(long)]
    pub email: String,
}

impl RemindArgs {
    pub fn new(member: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            email: email.into(),
        }
    }
}

fn default_dues_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("dues"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --dues-home or DUES_HOME instead of relying on the default \
                dues home directory.",
            );
            PathBuf::from("dues")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
