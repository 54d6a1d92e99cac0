//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::Result;
use geotally::config::RunConfig;
use geotally::report::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 2x2 unit grid spanning x in [0, 2] and y in [0, 2]
pub const GRID_2X2: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 2], [1, 2], [1, 1], [0, 1], [0, 2]]]}},
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[1, 2], [2, 2], [2, 1], [1, 1], [1, 2]]]}},
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 1], [1, 1], [1, 0], [0, 0], [0, 1]]]}},
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[1, 1], [2, 1], [2, 0], [1, 0], [1, 1]]]}}
]}"#;

pub const LANGUAGES: &str = r#"{"en": "English", "fr": "French", "es": "Spanish", "und": "Undefined"}"#;

/// One event line in the shape of a geotagged tweet dump row
pub fn event_line(x: f64, y: f64, lang: &str) -> String {
    format!(
        r#"{{"id":"1","doc":{{"coordinates":{{"type":"Point","coordinates":[{},{}]}},"metadata":{{"iso_language_code":"{}"}}}}}},"#,
        x, y, lang
    )
}

/// Builder for a temporary directory holding grid, language and event files
pub struct TestDataBuilder {
    temp_dir: TempDir,
    grid: String,
    languages: String,
    rows: Vec<String>,
    total_rows: Option<usize>,
    header: Option<String>,
}

impl TestDataBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            grid: GRID_2X2.to_string(),
            languages: LANGUAGES.to_string(),
            rows: Vec::new(),
            total_rows: None,
            header: None,
        })
    }

    pub fn with_grid(mut self, grid: &str) -> Self {
        self.grid = grid.to_string();
        self
    }

    pub fn with_row(mut self, row: impl Into<String>) -> Self {
        self.rows.push(row.into());
        self
    }

    pub fn with_event(self, x: f64, y: f64, lang: &str) -> Self {
        self.with_row(event_line(x, y, lang))
    }

    /// Override the header row count (defaults to the number of rows)
    pub fn with_total_rows(mut self, total: usize) -> Self {
        self.total_rows = Some(total);
        self
    }

    /// Replace the whole first line of the events file
    pub fn with_header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn build(self) -> Result<TestData> {
        let root = self.temp_dir.path();
        fs::write(root.join("grid.json"), &self.grid)?;
        fs::write(root.join("language.json"), &self.languages)?;

        let header = self.header.unwrap_or_else(|| {
            format!(
                r#"{{"total_rows":{},"offset":0,"rows":["#,
                self.total_rows.unwrap_or(self.rows.len())
            )
        });
        let mut content = header;
        content.push('\n');
        for row in &self.rows {
            content.push_str(row);
            content.push('\n');
        }
        content.push_str("]}\n");
        fs::write(root.join("events.json"), content)?;

        Ok(TestData {
            temp_dir: self.temp_dir,
        })
    }
}

pub struct TestData {
    temp_dir: TempDir,
}

impl TestData {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn events(&self) -> PathBuf {
        self.path().join("events.json")
    }

    pub fn grid(&self) -> PathBuf {
        self.path().join("grid.json")
    }

    pub fn languages(&self) -> PathBuf {
        self.path().join("language.json")
    }

    pub fn config(&self, workers: usize) -> RunConfig {
        RunConfig {
            events: self.events(),
            grid: self.grid(),
            languages: self.languages(),
            workers,
            top_n: 10,
            output_dir: None,
            format: OutputFormat::Text,
            undefined_language: "und".to_string(),
        }
    }
}
