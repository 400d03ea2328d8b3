//! Command handlers for the dues CLI.
//!
//! This module contains implementations for all CLI subcommands. The MCP tools call the same
//! handlers.

mod init;
mod mcp;
mod owed;
mod periods;
mod remind;
mod status;

use crate::api::{self, Mode};
use crate::error::{ErrorType, IntoResult};
use crate::model::Ledger;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use init::init;
pub use mcp::mcp;
pub use owed::{owed, OwedReport};
pub use periods::{periods, PeriodsReport, PriceChange};
pub use remind::remind;
pub use status::{status, MemberStatus, StatusReport};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to both the command line and MCP server interfaces.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads a fresh snapshot for one command. An unreachable feed is an `Unavailable` error here
/// because every command needs the data.
async fn load_ledger(config: &Config, mode: Mode) -> Result<Ledger> {
    let source = api::source(config, mode).pub_result(ErrorType::Config)?;
    api::load(source.as_ref()).await?.into_ledger()
}

/// Today's date in the local time zone.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
