// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Snapshot ingestion for votewatch.
//!
//! Turns the raw bytes of a published results export into canonical vote
//! records plus the content fingerprint that identifies the snapshot version.
//! Each jurisdiction publishes its own CSV layout; both layouts resolve to
//! [`votewatch_domain::CanonicalVoteRecord`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod fingerprint;
mod parse;
mod schema;

pub use error::IngestError;
pub use fingerprint::{FingerprintReader, fingerprint_bytes};
pub use parse::{ParseOptions, ParsedSnapshot, parse_snapshot, parse_snapshot_tagged};
pub use schema::{CountyCsvRecord, SourceRecord, StateCsvRecord};
