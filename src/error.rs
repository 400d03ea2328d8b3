//! Error types for the public interface.
//!
//! Internally, code uses `anyhow` through the `Res` alias so that context can be added freely.
//! Anything that crosses the public boundary is converted to `Result` with `pub_result`, which
//! tags the error with an `ErrorType` so that callers can tell a malformed feed apart from a feed
//! that could not be reached.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad categories of failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The feed was fetched but its contents are missing fields, have bad flags or bad dates.
    Feed,
    /// An input contract was violated, e.g. a flag vector does not line up with the periods.
    Precondition,
    /// There is no data to work with because the feed could not be fetched.
    Unavailable,
    /// A reminder request was invalid or the hand-off failed.
    Reminder,
    /// The configuration file or home directory is missing or broken.
    Config,
    /// The MCP service failed.
    Service,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// A public error: an `ErrorType` along with the underlying chain of causes.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: anyhow::Error) -> Self {
        Self { error_type, inner }
    }

    /// The category of this error.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal `Res` into a public `Result` by tagging it with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
