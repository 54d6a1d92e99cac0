//! Report presentation
//!
//! The ranked [`Report`](crate::mapreduce::Report) is rendered either as a
//! fixed-width, tab-delimited table or as JSON, and the table can be
//! duplicated to a timestamped `.tsv` file.

pub mod formatter;
pub mod sink;

pub use formatter::{OutputFormat, ReportFormatter, TextTable};
pub use sink::{report_file_name, write_report_file};
