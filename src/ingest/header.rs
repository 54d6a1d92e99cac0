//! Event file header
//!
//! Line 1 of the event file is never data. It carries the number of data
//! rows that follow as `"total_rows":<integer>` somewhere in the line.

use crate::error::{common, ErrorCode, GeoTallyError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

static TOTAL_ROWS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""total_rows"\s*:\s*(\d+)"#).expect("Invalid regex pattern"));

/// Extract the data row count from a header line
pub fn parse_total_rows(header: &str) -> Result<usize> {
    let digits = TOTAL_ROWS_REGEX
        .captures(header)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            GeoTallyError::config_with_code(
                ErrorCode::CONFIG_MISSING_HEADER,
                "header line has no \"total_rows\" count",
            )
        })?;

    digits.as_str().parse::<usize>().map_err(|e| {
        GeoTallyError::config_with_code(
            ErrorCode::CONFIG_MISSING_HEADER,
            format!("total_rows value {} is not usable", digits.as_str()),
        )
        .with_source(e)
    })
}

/// Read line 1 of the event file and return its row count
pub async fn read_total_rows(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(common::input_not_found(path));
    }

    let file = File::open(path)
        .await
        .map_err(|e| common::read_failed(path, e))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .await
        .map_err(|e| common::read_failed(path, e))?;

    parse_total_rows(header.trim()).map_err(|e| e.with_path(path))
}
