//! Reads a shared-subscription payment sheet and works out how far each member has paid and how
//! much they owe.
//!
//! The core is pure: `model::normalize` turns the sheet's raw period dates into `Period`s and
//! `reconcile` turns one member's payment flags into a `Reconciliation`. Everything else fetches
//! the sheet or presents the results on the command line or over MCP.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
mod mcp;
pub mod model;
pub mod reconcile;
mod utils;


pub use api::{Mode, Snapshot, TEST_MODE_ENV};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use mcp::DuesServer;
pub use reconcile::{reconcile, Reconciliation};
