//! Implements the `Source` trait by fetching the feed over HTTP.

use crate::api::Source;
use crate::error::Res;
use crate::model::FeedFormat;
use anyhow::{bail, Context};
use tracing::trace;
use url::Url;

/// Fetches the feed with a plain `GET`, e.g. from a raw GitHub URL or a spreadsheet CSV export.
pub(crate) struct HttpSource {
    url: Url,
    format: FeedFormat,
    client: reqwest::Client,
}

impl HttpSource {
    pub(crate) fn new(url: Url, format: FeedFormat) -> Self {
        Self {
            url,
            format,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn fetch(&self) -> Res<String> {
        trace!("GET {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send the request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Fetching {} failed with status {status}", self.url);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read the response body from {}", self.url))
    }

    fn format(&self) -> FeedFormat {
        self.format
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
