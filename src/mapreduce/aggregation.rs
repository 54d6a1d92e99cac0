//! Per-worker accumulation of (cell, language) counts

use crate::ingest::UnusableReason;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One counted occurrence: a language seen in a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub language: String,
    pub cell: String,
}

/// Cell id -> language name -> count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialCount {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl PartialCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to the count of `language` in `cell`
    pub fn add(&mut self, cell: &str, language: &str, n: u64) {
        *self
            .counts
            .entry(cell.to_string())
            .or_default()
            .entry(language.to_string())
            .or_default() += n;
    }

    pub fn get(&self, cell: &str, language: &str) -> u64 {
        self.counts
            .get(cell)
            .and_then(|langs| langs.get(language))
            .copied()
            .unwrap_or(0)
    }

    /// Fold another partial into this one, summing matching pairs
    pub fn merge(&mut self, other: PartialCount) {
        for (cell, languages) in other.counts {
            let target = self.counts.entry(cell).or_default();
            for (language, count) in languages {
                *target.entry(language).or_default() += count;
            }
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, u64>)> {
        self.counts.iter().map(|(cell, langs)| (cell.as_str(), langs))
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|langs| langs.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Line accounting for one shard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStats {
    pub lines_scanned: u64,
    pub events: u64,
    pub empty_lines: u64,
    pub missing_coordinates: u64,
    pub missing_language: u64,
    pub undefined_language: u64,
    pub unknown_language: u64,
    pub unclassifiable_point: u64,
    pub malformed_lines: u64,
}

impl ShardStats {
    pub fn record_unusable(&mut self, reason: UnusableReason) {
        let slot = match reason {
            UnusableReason::EmptyLine => &mut self.empty_lines,
            UnusableReason::MissingCoordinates => &mut self.missing_coordinates,
            UnusableReason::MissingLanguage => &mut self.missing_language,
            UnusableReason::UndefinedLanguage => &mut self.undefined_language,
            UnusableReason::UnknownLanguage => &mut self.unknown_language,
            UnusableReason::UnclassifiablePoint => &mut self.unclassifiable_point,
        };
        *slot += 1;
    }

    /// Lines that reached the parser but were not counted
    pub fn discarded(&self) -> u64 {
        self.empty_lines
            + self.missing_coordinates
            + self.missing_language
            + self.undefined_language
            + self.unknown_language
            + self.unclassifiable_point
            + self.malformed_lines
    }

    pub fn merge(&mut self, other: &ShardStats) {
        self.lines_scanned += other.lines_scanned;
        self.events += other.events;
        self.empty_lines += other.empty_lines;
        self.missing_coordinates += other.missing_coordinates;
        self.missing_language += other.missing_language;
        self.undefined_language += other.undefined_language;
        self.unknown_language += other.unknown_language;
        self.unclassifiable_point += other.unclassifiable_point;
        self.malformed_lines += other.malformed_lines;
    }
}

/// Folds events into a private [`PartialCount`]
#[derive(Debug, Default)]
pub struct PartialAggregator {
    partial: PartialCount,
    stats: ShardStats,
}

impl PartialAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, event: &Event) {
        self.partial.add(&event.cell, &event.language, 1);
        self.stats.events += 1;
    }

    pub fn reject(&mut self, reason: UnusableReason) {
        self.stats.record_unusable(reason);
    }

    pub fn malformed(&mut self) {
        self.stats.malformed_lines += 1;
    }

    pub fn line_scanned(&mut self) {
        self.stats.lines_scanned += 1;
    }

    pub fn stats(&self) -> &ShardStats {
        &self.stats
    }

    pub fn finish(self) -> (PartialCount, ShardStats) {
        (self.partial, self.stats)
    }
}
