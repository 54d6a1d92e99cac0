//! # geotally
//!
//! Counts geotagged events per (grid cell, language) pair across a fixed
//! number of parallel workers.
//!
//! ## Usage
//!
//! ```bash
//! geotally -f events.json --grid grid.json [--lang-map language.json] [-n workers]
//! ```
//!
//! ## Modules
//!
//! - `config` - Layered run configuration (TOML file, environment, CLI)
//! - `error` - Unified error type with numeric codes
//! - `grid` - Rectangular grid construction and point classification
//! - `ingest` - Event file header, language names and line parsing
//! - `mapreduce` - Shard planning, worker scanning and reduction
//! - `report` - Text/JSON rendering and timestamped report files
pub mod config;
pub mod error;
pub mod grid;
pub mod ingest;
pub mod mapreduce;
pub mod report;

pub use error::{GeoTallyError, Result};
