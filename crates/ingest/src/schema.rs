// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Source CSV layouts.
//!
//! The statewide export packs district and title into one `Race` column. The
//! county export carries them separately and adds columns we do not use.
//! Unknown columns are ignored in both.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};
use votewatch_domain::{
    CanonicalVoteRecord, JurisdictionType, extract_party, normalize_text, normalize_text_for,
    split_race,
};

/// Headers every statewide export must carry.
pub const STATE_HEADERS: &[&str] = &[
    "Race",
    "Candidate",
    "Party",
    "Votes",
    "PercentageOfTotalVotes",
];

/// Headers every county export must carry.
pub const COUNTY_HEADERS: &[&str] = &[
    "District Name",
    "Ballot Title",
    "Ballot Response",
    "Party Preference",
    "Votes",
    "Percent of Votes",
];

/// Reads a numeric cell, treating a blank cell as zero.
fn blank_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let raw: String = String::deserialize(deserializer)?;
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed
        .parse::<T>()
        .map_err(|e| de::Error::custom(format!("invalid number '{trimmed}': {e}")))
}

/// Reads a percentage cell. Blank is zero; `NaN` and infinities are rejected.
fn finite_percentage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = blank_as_zero(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("non-finite percentage '{value}'")))
    }
}

/// One row of the statewide export.
#[derive(Debug, Clone, Deserialize)]
pub struct StateCsvRecord {
    #[serde(rename = "Race")]
    pub race: String,
    #[serde(rename = "Candidate")]
    pub candidate: String,
    #[serde(rename = "Party", default)]
    pub party: String,
    #[serde(rename = "Votes", deserialize_with = "blank_as_zero")]
    pub votes: i64,
    #[serde(rename = "PercentageOfTotalVotes", deserialize_with = "finite_percentage")]
    pub percentage_of_total_votes: f64,
    #[serde(rename = "JurisdictionName", default)]
    pub jurisdiction_name: Option<String>,
}

/// One row of the county export.
#[derive(Debug, Clone, Deserialize)]
pub struct CountyCsvRecord {
    #[serde(rename = "District Name")]
    pub district_name: String,
    #[serde(rename = "Ballot Title")]
    pub ballot_title: String,
    #[serde(rename = "Ballot Response")]
    pub ballot_response: String,
    #[serde(rename = "Party Preference", default)]
    pub party_preference: String,
    #[serde(rename = "Votes", deserialize_with = "blank_as_zero")]
    pub votes: i64,
    #[serde(rename = "Percent of Votes", deserialize_with = "finite_percentage")]
    pub percent_of_votes: f64,
}

/// A parsed row in its source layout.
#[derive(Debug, Clone)]
pub enum SourceRecord {
    State(StateCsvRecord),
    County(CountyCsvRecord),
}

impl SourceRecord {
    /// The jurisdiction that publishes this layout.
    #[must_use]
    pub const fn jurisdiction(&self) -> JurisdictionType {
        match self {
            Self::State(_) => JurisdictionType::State,
            Self::County(_) => JurisdictionType::County,
        }
    }

    /// Converts the row to its canonical, normalized form.
    ///
    /// # Arguments
    ///
    /// * `statewide_district` - District label for statewide races that carry no district,
    ///   and the reading of the `STATEWIDE` placeholder in either layout
    #[must_use]
    pub fn into_canonical(self, statewide_district: &str) -> CanonicalVoteRecord {
        let jurisdiction: JurisdictionType = self.jurisdiction();
        match self {
            Self::State(row) => {
                let (district, ballot_title) = split_race(&row.race, statewide_district);
                CanonicalVoteRecord {
                    district,
                    ballot_title,
                    ballot_response: normalize_text(&row.candidate),
                    votes: row.votes,
                    vote_percentage: row.percentage_of_total_votes,
                    party_preference: extract_party(&row.party),
                    jurisdiction,
                }
            }
            Self::County(row) => CanonicalVoteRecord {
                district: normalize_text_for(&row.district_name, statewide_district),
                ballot_title: normalize_text_for(&row.ballot_title, statewide_district),
                ballot_response: normalize_text(&row.ballot_response),
                votes: row.votes,
                vote_percentage: row.percent_of_votes,
                party_preference: extract_party(&row.party_preference),
                jurisdiction,
            },
        }
    }
}
