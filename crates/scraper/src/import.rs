// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Historical import of archived result exports.
//!
//! Archive files are named after the feed and the day they were captured,
//! e.g. `20241105_allstate.csv` or `webresults-20241106-final.csv`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use tracing::{error, info, warn};
use votewatch_domain::{JurisdictionType, election_key};
use votewatch_ingest::ParseOptions;
use votewatch_persistence::{DuplicatePolicy, Election, Persistence, UpdateOutcome};

use crate::error::ScraperError;
use crate::pipeline::{IngestSummary, ingest_snapshot};

const FILE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]");

/// Settings for one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Replace updates whose fingerprint is already committed.
    pub overwrite: bool,
    pub parse_options: ParseOptions,
}

/// Determines which feed an archive file came from.
///
/// # Errors
///
/// Returns `ScraperError::UnclassifiedFile` if the name matches no feed.
pub fn classify_file(file_name: &str) -> Result<JurisdictionType, ScraperError> {
    if file_name.contains("allstate") {
        Ok(JurisdictionType::State)
    } else if file_name.contains("webresults") {
        Ok(JurisdictionType::County)
    } else {
        Err(ScraperError::UnclassifiedFile(file_name.to_string()))
    }
}

/// Extracts the capture time from an archive file name.
///
/// The date is taken as midnight UTC. Returns `None` if the name carries no
/// `YYYYMMDD` date.
#[must_use]
pub fn file_timestamp(file_name: &str) -> Option<OffsetDateTime> {
    let stem: &str = Path::new(file_name).file_stem()?.to_str()?;
    let stem: &str = stem.strip_suffix("_allstate").unwrap_or(stem);
    let stem: &str = stem.strip_suffix("-final").unwrap_or(stem);
    let stem: &str = stem.strip_prefix("webresults-").unwrap_or(stem);

    let date: Date = Date::parse(stem, FILE_DATE_FORMAT).ok()?;
    Some(date.with_time(Time::MIDNIGHT).assume_utc())
}

/// Returns the election to import into, deleting any existing one first
/// when `reset` is set.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn prepare_election(
    persistence: &mut Persistence,
    name: &str,
    election_date: Date,
    reset: bool,
) -> Result<Election, ScraperError> {
    if reset {
        match persistence.find_election_by_key(&election_key(name))? {
            Some(existing) => {
                info!(
                    election_id = existing.election_id,
                    election_key = %existing.election_key,
                    "Deleting election {}", existing.name
                );
                persistence.delete_election(existing.election_id)?;
            }
            None => info!("No election with name {} found", name),
        }
    }

    Ok(persistence.find_or_create_election(name, election_date)?)
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, ScraperError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path: PathBuf = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn import_file(
    persistence: &mut Persistence,
    election: &Election,
    path: &Path,
    jurisdiction: JurisdictionType,
    ingested_at: OffsetDateTime,
    options: &ImportOptions,
) -> Result<UpdateOutcome, ScraperError> {
    let policy: DuplicatePolicy = if options.overwrite {
        DuplicatePolicy::Overwrite
    } else {
        DuplicatePolicy::Skip
    };
    let reader: BufReader<File> = BufReader::new(File::open(path)?);
    ingest_snapshot(
        persistence,
        election,
        reader,
        jurisdiction,
        &options.parse_options,
        ingested_at,
        policy,
    )
}

/// Imports every `*.csv` archive file in a directory, in name order.
///
/// Files are independent: one that fails is logged and counted, and the
/// import continues with the next.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn import_directory(
    persistence: &mut Persistence,
    election: &Election,
    dir: &Path,
    options: &ImportOptions,
) -> Result<IngestSummary, ScraperError> {
    let mut summary: IngestSummary = IngestSummary::default();

    for path in csv_files(dir)? {
        let file_name: String = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing file: {}", file_name);

        let jurisdiction: JurisdictionType = match classify_file(&file_name) {
            Ok(jurisdiction) => jurisdiction,
            Err(e) => {
                error!("{}", e);
                summary.failed += 1;
                continue;
            }
        };

        let Some(ingested_at) = file_timestamp(&file_name) else {
            warn!("Failed to parse date from file name {}; skipping", file_name);
            summary.skipped += 1;
            continue;
        };

        let result: Result<UpdateOutcome, ScraperError> =
            import_file(persistence, election, &path, jurisdiction, ingested_at, options);
        if let Err(e) = &result {
            error!("Failed to import file {}: {}", file_name, e);
        }
        summary.record(&result);
    }

    info!(
        committed = summary.committed,
        replaced = summary.replaced,
        unchanged = summary.unchanged,
        failed = summary.failed,
        skipped = summary.skipped,
        "Historical data import completed"
    );
    Ok(summary)
}
