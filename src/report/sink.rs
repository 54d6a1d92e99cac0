//! Timestamped report file

use super::formatter::{ranking_cell, ranking_header, CELL_HEADER, LANGUAGES_HEADER, TOTAL_HEADER};
use crate::error::{common, ErrorExt, Result};
use crate::mapreduce::reducer::Report;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// `report-YYYYmmdd-HHMMSS.tsv`
pub fn report_file_name(at: DateTime<Local>) -> String {
    format!("report-{}.tsv", at.format("%Y%m%d-%H%M%S"))
}

/// Write the report table as tab-delimited values under `dir`
pub fn write_report_file(
    dir: &Path,
    report: &Report,
    top_n: usize,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .to_io_error(format!("cannot create report directory {}", dir.display()))?;
    let path = dir.join(report_file_name(at));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .map_err(|e| common::write_failed(&path, e))?;

    writer
        .write_record([
            CELL_HEADER.to_string(),
            TOTAL_HEADER.to_string(),
            LANGUAGES_HEADER.to_string(),
            ranking_header(top_n),
        ])
        .map_err(|e| common::write_failed(&path, e))?;

    for cell in &report.cells {
        writer
            .write_record([
                cell.cell.clone(),
                cell.total.to_string(),
                cell.languages.to_string(),
                ranking_cell(cell, top_n),
            ])
            .map_err(|e| common::write_failed(&path, e))?;
    }

    writer.flush().map_err(|e| common::write_failed(&path, e))?;
    info!("Report written to {}", path.display());
    Ok(path)
}
