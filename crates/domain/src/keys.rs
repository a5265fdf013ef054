// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stable lookup keys for elections, contests and candidates.
//!
//! Keys are derived from normalized text only. Normalization turns `_` into
//! whitespace and collapses whitespace runs, so a normalized field never
//! contains `__` and the contest key join cannot collide.

/// Joins the title and district halves of a contest key.
pub const CONTEST_KEY_SEPARATOR: &str = "__";

fn underscored(value: &str) -> String {
    value.replace(' ', "_")
}

/// Derives the contest key from a normalized title and district.
#[must_use]
pub fn contest_key(ballot_title: &str, district: &str) -> String {
    format!(
        "{}{CONTEST_KEY_SEPARATOR}{}",
        underscored(ballot_title),
        underscored(district)
    )
}

/// Derives the candidate key from the owning contest's ID and the normalized name.
#[must_use]
pub fn candidate_key(contest_id: i64, ballot_response: &str) -> String {
    format!("{contest_id}-{ballot_response}")
}

/// Derives the URL-friendly election key from its display name.
#[must_use]
pub fn election_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<String>>()
        .join("_")
}
