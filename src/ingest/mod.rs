//! Event file input: header row count, language names and line parsing

pub mod header;
pub mod language;
pub mod parser;

pub use header::{parse_total_rows, read_total_rows};
pub use language::LanguageTable;
pub use parser::{EventParser, EventRecord, LineOutcome, UnusableReason};
