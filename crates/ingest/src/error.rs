// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use votewatch_domain::DomainError;

/// Errors raised while reading and parsing a snapshot.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The CSV is malformed, lacks a required header, or holds a bad value.
    #[error("{}", describe_parse_error(*line, message))]
    Parse {
        /// The 1-based line of the offending record, when known.
        line: Option<u64>,
        /// What was wrong with the input.
        message: String,
    },

    /// The jurisdiction tag does not name a known feed.
    #[error("Unknown jurisdiction type: {0}")]
    UnknownJurisdiction(String),

    /// Reading the byte stream failed.
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// A canonical value failed domain validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn describe_parse_error(line: Option<u64>, message: &str) -> String {
    match line {
        Some(line) => format!("CSV parse error at line {line}: {message}"),
        None => format!("CSV parse error: {message}"),
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line: Option<u64> = err.position().map(csv::Position::line);
        if err.is_io_error() {
            if let csv::ErrorKind::Io(io_err) = err.into_kind() {
                return Self::Io(io_err);
            }
            return Self::Parse {
                line,
                message: String::from("I/O error"),
            };
        }
        Self::Parse {
            line,
            message: err.to_string(),
        }
    }
}
