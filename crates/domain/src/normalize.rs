// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Free-text normalization shared by every source schema.
//!
//! Feeds disagree on casing ("PRESIDENT" vs "President"), spacing and
//! abbreviations. Every text field is passed through [`normalize_text`]
//! before it is used as, or folded into, a lookup key.

/// Separates district and title in the statewide `Race` column.
pub const RACE_SEPARATOR: &str = " - ";

/// District assigned to federal races that carry no district prefix.
pub const FEDERAL_DISTRICT: &str = "Federal";

/// District assigned to statewide races that carry no district prefix.
pub const DEFAULT_STATEWIDE_DISTRICT: &str = "State of Washington";

const STOP_WORDS: [&str; 5] = ["of", "the", "and", "in", "for"];

const PRESERVED_ACRONYMS: [&str; 2] = ["US", "USA"];

const ENTITY_DECODES: [(&str, &str); 1] = [("&quot;", "\"")];

const FOOTNOTE_MARKERS: [&str; 2] = ["#0", "No. "];

/// Abbreviations, matched case-insensitively anywhere in the text.
const ABBREVIATIONS: [(&str, &str); 2] = [("lt.", "Lieutenant"), ("u.s.", "United States")];

const PHRASE_REWRITES: [(&str, &str); 2] = [
    ("SUPREME COURT", "State Supreme Court"),
    ("of the United States", ""),
];

/// Placeholder the feeds use for the statewide district.
const STATEWIDE_MARKER: &str = "STATEWIDE";

/// Normalizes a free-text field, reading `STATEWIDE` as
/// [`DEFAULT_STATEWIDE_DISTRICT`].
///
/// Decodes HTML quotes, strips footnote markers, expands abbreviations,
/// applies the fixed phrase rewrites, then title-cases every word except the
/// stop words. Whitespace (including `_`) is collapsed to single spaces.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    normalize_text_for(raw, DEFAULT_STATEWIDE_DISTRICT)
}

/// Normalizes a free-text field, reading `STATEWIDE` as `statewide_district`.
#[must_use]
pub fn normalize_text_for(raw: &str, statewide_district: &str) -> String {
    let mut text: String = raw.to_string();
    for (entity, decoded) in ENTITY_DECODES {
        text = text.replace(entity, decoded);
    }
    for marker in FOOTNOTE_MARKERS {
        text = text.replace(marker, "");
    }
    for (abbreviation, expansion) in ABBREVIATIONS {
        text = replace_ignore_ascii_case(&text, abbreviation, expansion);
    }
    for (phrase, rewrite) in PHRASE_REWRITES {
        text = text.replace(phrase, rewrite);
    }
    text = text.replace(STATEWIDE_MARKER, statewide_district);

    text.replace('_', " ")
        .split_whitespace()
        .map(normalize_word)
        .collect::<Vec<String>>()
        .join(" ")
}

/// Replaces every occurrence of the lower-case ASCII `pattern`, ignoring case.
fn replace_ignore_ascii_case(text: &str, pattern: &str, replacement: &str) -> String {
    // ASCII lower-casing keeps byte offsets, so matches index into `text`.
    let lower: String = text.to_ascii_lowercase();
    let mut out: String = String::with_capacity(text.len());
    let mut last: usize = 0;
    for (start, matched) in lower.match_indices(pattern) {
        out.push_str(&text[last..start]);
        out.push_str(replacement);
        last = start + matched.len();
    }
    out.push_str(&text[last..]);
    out
}

fn normalize_word(word: &str) -> String {
    if PRESERVED_ACRONYMS.contains(&word) {
        return word.to_string();
    }
    let lower: String = word.to_lowercase();
    if STOP_WORDS.contains(&lower.as_str()) {
        return lower;
    }
    title_case(&lower)
}

/// Upper-cases the first letter of every alphanumeric run.
///
/// Apostrophes do not start a new run, so "o'brien" becomes "O'brien" while
/// "smith-jones" becomes "Smith-Jones".
fn title_case(word: &str) -> String {
    let mut out: String = String::with_capacity(word.len());
    let mut at_boundary: bool = true;
    for ch in word.chars() {
        if ch.is_alphanumeric() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = ch != '\'' && ch != '\u{2019}';
        }
    }
    out
}

/// Splits a statewide `Race` field into normalized `(district, title)`.
///
/// The district comes first: `"Legislative District 1 - State Senator"`
/// yields `("Legislative District 1", "State Senator")`. Without a separator
/// the whole field is the title and the district is `Federal` for
/// United States offices, otherwise `statewide_district`.
#[must_use]
pub fn split_race(race: &str, statewide_district: &str) -> (String, String) {
    if let Some((district, title)) = race.split_once(RACE_SEPARATOR) {
        return (
            normalize_text_for(district, statewide_district),
            normalize_text_for(title, statewide_district),
        );
    }

    let title: String = normalize_text_for(race, statewide_district);
    let district: String = if title.contains("United States") {
        FEDERAL_DISTRICT.to_string()
    } else {
        normalize_text_for(statewide_district, statewide_district)
    };
    (district, title)
}

/// Cleans a party field.
///
/// Strips one surrounding pair of parentheses and a leading `Prefers `
/// before normalizing. Returns `None` when nothing is left.
#[must_use]
pub fn extract_party(raw: &str) -> Option<String> {
    let trimmed: &str = raw.trim();
    let unwrapped: &str = trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .map_or(trimmed, str::trim);
    let party: &str = unwrapped.strip_prefix("Prefers ").unwrap_or(unwrapped);

    let normalized: String = normalize_text(party);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
