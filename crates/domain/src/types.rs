// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::keys::contest_key;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of reporting body that published a snapshot.
///
/// Each jurisdiction publishes its own independent series of updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JurisdictionType {
    /// The statewide results export.
    State,
    /// The per-county results export.
    County,
}

impl FromStr for JurisdictionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "State" => Ok(Self::State),
            "County" => Ok(Self::County),
            _ => Err(DomainError::UnknownJurisdiction(s.to_string())),
        }
    }
}

impl std::fmt::Display for JurisdictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl JurisdictionType {
    /// All jurisdiction types, in the order feeds are polled.
    pub const ALL: [Self; 2] = [Self::State, Self::County];

    /// Converts this jurisdiction type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "State",
            Self::County => "County",
        }
    }
}

/// One normalized ballot-response row, independent of the source schema.
///
/// All text fields have already been through [`crate::normalize_text`], so
/// two snapshots that differ only in casing or spacing produce equal records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVoteRecord {
    /// The district or jurisdiction label of the contest.
    pub district: String,
    /// The display title of the contest.
    pub ballot_title: String,
    /// The candidate or ballot choice.
    pub ballot_response: String,
    /// Votes counted for this response.
    pub votes: i64,
    /// Share of the contest's votes, as published (0-100).
    pub vote_percentage: f64,
    /// The party preference, if the source carried one.
    pub party_preference: Option<String>,
    /// The jurisdiction that published the row.
    pub jurisdiction: JurisdictionType,
}

impl CanonicalVoteRecord {
    /// Returns the contest key this record resolves to.
    #[must_use]
    pub fn contest_key(&self) -> String {
        contest_key(&self.ballot_title, &self.district)
    }
}

/// A hex-encoded SHA-256 digest of a snapshot's raw bytes.
///
/// Two snapshots are the same version if and only if their fingerprints are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of a hex-encoded SHA-256 digest.
    pub const HEX_LEN: usize = 64;

    /// Wraps a hex digest, normalizing it to lower case.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not 64 hexadecimal characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value: String = value.into();
        if value.len() != Self::HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidFingerprint(value));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
