//! Implements the `Source` trait by reading the feed from a local file.

use crate::api::Source;
use crate::error::Res;
use crate::model::FeedFormat;
use crate::utils;
use std::path::PathBuf;

/// Reads the feed from a file on disk, e.g. a spreadsheet export saved by hand.
pub(crate) struct FileSource {
    path: PathBuf,
    format: FeedFormat,
}

impl FileSource {
    pub(crate) fn new(path: impl Into<PathBuf>, format: FeedFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

#[async_trait::async_trait]
impl Source for FileSource {
    async fn fetch(&self) -> Res<String> {
        utils::read(&self.path).await
    }

    fn format(&self) -> FeedFormat {
        self.format
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
