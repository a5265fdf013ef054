// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;
use std::io::Read;

use csv::StringRecord;
use tracing::debug;
use votewatch_domain::{
    CanonicalVoteRecord, DEFAULT_STATEWIDE_DISTRICT, Fingerprint, JurisdictionType,
};

use crate::error::IngestError;
use crate::fingerprint::FingerprintReader;
use crate::schema::{
    COUNTY_HEADERS, CountyCsvRecord, STATE_HEADERS, SourceRecord, StateCsvRecord,
};

/// Parser settings shared by every feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// District label for statewide races that carry no district prefix.
    pub statewide_district: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            statewide_district: String::from(DEFAULT_STATEWIDE_DISTRICT),
        }
    }
}

/// A snapshot turned into canonical records, with its content fingerprint.
#[derive(Debug, Clone)]
pub struct ParsedSnapshot {
    pub jurisdiction: JurisdictionType,
    pub records: Vec<CanonicalVoteRecord>,
    pub fingerprint: Fingerprint,
}

const fn required_headers(jurisdiction: JurisdictionType) -> &'static [&'static str] {
    match jurisdiction {
        JurisdictionType::State => STATE_HEADERS,
        JurisdictionType::County => COUNTY_HEADERS,
    }
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord, required: &[&str]) -> Result<(), IngestError> {
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|header| !present.contains(header))
        .collect();

    if !missing.is_empty() {
        return Err(IngestError::Parse {
            line: Some(1),
            message: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(())
}

fn deserialize_row(
    row: &StringRecord,
    headers: &StringRecord,
    jurisdiction: JurisdictionType,
) -> Result<SourceRecord, csv::Error> {
    Ok(match jurisdiction {
        JurisdictionType::State => {
            SourceRecord::State(row.deserialize::<StateCsvRecord>(Some(headers))?)
        }
        JurisdictionType::County => {
            SourceRecord::County(row.deserialize::<CountyCsvRecord>(Some(headers))?)
        }
    })
}

/// Parses one snapshot into canonical records and fingerprints its bytes.
///
/// The whole stream is hashed, including any bytes after the last record.
///
/// # Arguments
///
/// * `reader` - The raw snapshot bytes
/// * `jurisdiction` - Which feed published the snapshot, selecting the CSV layout
/// * `options` - Parser settings
///
/// # Errors
///
/// Returns an error if:
/// - A required header is missing
/// - A row is malformed or holds a value of the wrong type
/// - Reading the stream fails
pub fn parse_snapshot<R: Read>(
    reader: R,
    jurisdiction: JurisdictionType,
    options: &ParseOptions,
) -> Result<ParsedSnapshot, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(FingerprintReader::new(reader));

    let headers: StringRecord = csv_reader.headers()?.clone();
    validate_headers(&headers, required_headers(jurisdiction))?;

    let mut records: Vec<CanonicalVoteRecord> = Vec::new();
    for result in csv_reader.records() {
        let row: StringRecord = result?;
        let source: SourceRecord = deserialize_row(&row, &headers, jurisdiction)?;
        records.push(source.into_canonical(&options.statewide_district));
    }

    let mut tee: FingerprintReader<R> = csv_reader.into_inner();
    tee.drain()?;
    let bytes_read: u64 = tee.bytes_read();
    let fingerprint: Fingerprint = tee.finish()?;

    debug!(
        jurisdiction = jurisdiction.as_str(),
        records = records.len(),
        bytes_read,
        fingerprint = fingerprint.as_str(),
        "Parsed snapshot"
    );

    Ok(ParsedSnapshot {
        jurisdiction,
        records,
        fingerprint,
    })
}

/// Parses one snapshot whose jurisdiction is given as its tag string.
///
/// # Errors
///
/// Returns [`IngestError::UnknownJurisdiction`] for an unrecognized tag, or
/// any error of [`parse_snapshot`].
pub fn parse_snapshot_tagged<R: Read>(
    reader: R,
    jurisdiction_tag: &str,
    options: &ParseOptions,
) -> Result<ParsedSnapshot, IngestError> {
    let jurisdiction: JurisdictionType = jurisdiction_tag
        .parse()
        .map_err(|_| IngestError::UnknownJurisdiction(jurisdiction_tag.to_string()))?;
    parse_snapshot(reader, jurisdiction, options)
}
