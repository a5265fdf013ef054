// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{CanonicalVoteRecord, JurisdictionType};

/// Validates that a snapshot can be committed as a single update.
///
/// # Arguments
///
/// * `records` - The canonical records of one snapshot
///
/// # Returns
///
/// The jurisdiction shared by every record.
///
/// # Errors
///
/// Returns an error if:
/// - The snapshot is empty
/// - Records come from more than one jurisdiction
pub fn validate_snapshot(records: &[CanonicalVoteRecord]) -> Result<JurisdictionType, DomainError> {
    let first: &CanonicalVoteRecord = records.first().ok_or(DomainError::EmptySnapshot)?;
    let expected: JurisdictionType = first.jurisdiction;

    if let Some(other) = records.iter().find(|r| r.jurisdiction != expected) {
        return Err(DomainError::InconsistentJurisdiction {
            expected,
            found: other.jurisdiction,
        });
    }

    Ok(expected)
}
