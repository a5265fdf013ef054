// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use votewatch_ingest::IngestError;
use votewatch_persistence::PersistenceError;

/// Errors raised while fetching, importing or ingesting snapshots.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// The snapshot could not be parsed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The snapshot could not be stored.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The HTTP request failed before a response arrived.
    #[error("Network error fetching {url}: {source}")]
    Network {
        /// The feed URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The feed answered with a non-success status.
    #[error("Fetch of {url} failed with status {status}")]
    Fetch {
        /// The feed URL that was requested.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Reading an import file or directory failed, or the signal handler
    /// could not be installed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command-line value could not be interpreted.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An import file name names no known feed.
    #[error("Unknown jurisdiction type from file name: {0}")]
    UnclassifiedFile(String),
}
