// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::JurisdictionType;

/// Errors raised while validating canonical snapshot data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The jurisdiction tag is not one of the known feeds.
    UnknownJurisdiction(String),
    /// A snapshot mixes records from more than one jurisdiction.
    InconsistentJurisdiction {
        /// The jurisdiction of the first record.
        expected: JurisdictionType,
        /// The first differing jurisdiction found.
        found: JurisdictionType,
    },
    /// A snapshot contains no records.
    EmptySnapshot,
    /// A fingerprint is not a hex-encoded SHA-256 digest.
    InvalidFingerprint(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownJurisdiction(tag) => write!(f, "Unknown jurisdiction type: {tag}"),
            Self::InconsistentJurisdiction { expected, found } => write!(
                f,
                "Inconsistent jurisdiction types in snapshot: expected {expected}, found {found}"
            ),
            Self::EmptySnapshot => write!(f, "Snapshot contains no vote records"),
            Self::InvalidFingerprint(value) => write!(f, "Invalid fingerprint: '{value}'"),
        }
    }
}

impl std::error::Error for DomainError {}
