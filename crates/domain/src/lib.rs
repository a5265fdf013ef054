// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod keys;
mod normalize;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use keys::{CONTEST_KEY_SEPARATOR, candidate_key, contest_key, election_key};
pub use normalize::{
    DEFAULT_STATEWIDE_DISTRICT, FEDERAL_DISTRICT, RACE_SEPARATOR, extract_party, normalize_text,
    normalize_text_for, split_race,
};
pub use types::{CanonicalVoteRecord, Fingerprint, JurisdictionType};
pub use validation::validate_snapshot;
