//! Event line parsing
//!
//! Each data line is one JSON object, optionally followed by the punctuation
//! of the surrounding array document: a trailing `,` on most rows and `]}`
//! after the last one. The parser strips that punctuation, reads the point
//! and language code, and maps the code to its display name.

use super::LanguageTable;
use crate::error::{GeoTallyError, Result};
use crate::grid::Point;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// JSON pointer to the `[x, y]` point of an event
pub const POINT_POINTER: &str = "/doc/coordinates/coordinates";
/// JSON pointers to the language code, tried in order
pub const LANGUAGE_POINTERS: [&str; 2] = ["/doc/metadata/iso_language_code", "/doc/lang"];
/// Language code marking "language could not be determined"
pub const DEFAULT_UNDEFINED_LANGUAGE: &str = "und";

/// Why a well-formed line contributes nothing to the counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusableReason {
    EmptyLine,
    MissingCoordinates,
    MissingLanguage,
    UndefinedLanguage,
    UnknownLanguage,
    UnclassifiablePoint,
}

impl fmt::Display for UnusableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyLine => "empty line",
            Self::MissingCoordinates => "missing or malformed coordinates",
            Self::MissingLanguage => "missing language code",
            Self::UndefinedLanguage => "undefined language",
            Self::UnknownLanguage => "unknown language code",
            Self::UnclassifiablePoint => "point outside the grid",
        };
        f.write_str(text)
    }
}

/// A usable line: where it was posted from and in which language
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub point: Point,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Usable(EventRecord),
    Unusable(UnusableReason),
}

/// Remove array-element punctuation around one JSON object
///
/// Returns the bare object text plus, for lines ending in `]}`, the
/// unstripped text to try when the stripped form does not parse (an object
/// whose own last member is an array also ends in `]}`).
pub fn strip_array_punctuation(line: &str) -> (&str, Option<&str>) {
    let body = line.trim().trim_end_matches(',').trim_end();
    match body.strip_suffix("]}") {
        Some(inner) => (inner.trim_end(), Some(body)),
        None => (body, None),
    }
}

fn parse_object(line_no: usize, line: &str) -> Result<Option<Value>> {
    let (candidate, whole) = strip_array_punctuation(line);
    if candidate.is_empty() {
        return Ok(None);
    }

    match (serde_json::from_str::<Value>(candidate), whole) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(_), Some(whole)) => serde_json::from_str(whole)
            .map(Some)
            .map_err(|e| GeoTallyError::malformed_line(line_no, e.to_string()).with_source(e)),
        (Err(e), None) => {
            Err(GeoTallyError::malformed_line(line_no, e.to_string()).with_source(e))
        }
    }
}

fn extract_point(doc: &Value) -> Option<Point> {
    match doc.pointer(POINT_POINTER)?.as_array()?.as_slice() {
        [x, y, ..] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

fn extract_language_code(doc: &Value) -> Option<&str> {
    LANGUAGE_POINTERS
        .iter()
        .find_map(|pointer| doc.pointer(pointer).and_then(Value::as_str))
}

/// Turns raw lines into [`LineOutcome`]s against a shared language table
#[derive(Debug, Clone)]
pub struct EventParser {
    languages: Arc<LanguageTable>,
    undefined_language: String,
}

impl EventParser {
    pub fn new(languages: Arc<LanguageTable>, undefined_language: impl Into<String>) -> Self {
        Self {
            languages,
            undefined_language: undefined_language.into(),
        }
    }

    /// Parse one line; `line_no` is the 1-based line number in the file
    ///
    /// Invalid JSON is a [`GeoTallyError::MalformedLine`]; every other
    /// problem is an [`LineOutcome::Unusable`] with its reason.
    pub fn parse(&self, line_no: usize, line: &str) -> Result<LineOutcome> {
        let Some(doc) = parse_object(line_no, line)? else {
            return Ok(LineOutcome::Unusable(UnusableReason::EmptyLine));
        };

        let Some(point) = extract_point(&doc) else {
            trace!("Line {}: no usable coordinates", line_no);
            return Ok(LineOutcome::Unusable(UnusableReason::MissingCoordinates));
        };

        let Some(code) = extract_language_code(&doc) else {
            trace!("Line {}: no language code", line_no);
            return Ok(LineOutcome::Unusable(UnusableReason::MissingLanguage));
        };

        if code == self.undefined_language {
            return Ok(LineOutcome::Unusable(UnusableReason::UndefinedLanguage));
        }

        match self.languages.name(code) {
            Some(name) => Ok(LineOutcome::Usable(EventRecord {
                point,
                language: name.to_string(),
            })),
            None => {
                warn!("Line {}: unknown language code {}", line_no, code);
                Ok(LineOutcome::Unusable(UnusableReason::UnknownLanguage))
            }
        }
    }
}
