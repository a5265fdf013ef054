// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use tracing::debug;
use votewatch_domain::JurisdictionType;

use crate::error::ScraperError;

const USER_AGENT: &str = concat!("votewatch/", env!("CARGO_PKG_VERSION"));

/// One published results export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub jurisdiction: JurisdictionType,
    pub url: String,
}

impl Feed {
    #[must_use]
    pub fn new(jurisdiction: JurisdictionType, url: impl Into<String>) -> Self {
        Self {
            jurisdiction,
            url: url.into(),
        }
    }
}

/// HTTP client for the results feeds.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http_client: reqwest::Client,
}

impl FeedClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let http_client: reqwest::Client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| ScraperError::Network {
                url: String::new(),
                source,
            })?;

        Ok(Self { http_client })
    }

    /// Downloads the raw bytes of a feed.
    ///
    /// The body is returned untouched so its fingerprint matches the
    /// published file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the server
    /// answers with a non-success status.
    pub async fn fetch(&self, feed: &Feed) -> Result<Vec<u8>, ScraperError> {
        let network_error = |source: reqwest::Error| ScraperError::Network {
            url: feed.url.clone(),
            source,
        };

        let response: reqwest::Response = self
            .http_client
            .get(&feed.url)
            .send()
            .await
            .map_err(network_error)?;

        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            return Err(ScraperError::Fetch {
                url: feed.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: Vec<u8> = response.bytes().await.map_err(network_error)?.to_vec();
        debug!(
            jurisdiction = %feed.jurisdiction,
            url = %feed.url,
            bytes = body.len(),
            "Fetched feed"
        );
        Ok(body)
    }
}
