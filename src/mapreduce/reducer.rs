//! Reduction of worker partials into the ranked report

use super::aggregation::PartialCount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: u64,
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub cell: String,
    pub total: u64,
    pub languages: usize,
    /// Count descending, language name ascending on ties
    pub ranking: Vec<LanguageCount>,
}

impl CellReport {
    pub fn top(&self, n: usize) -> &[LanguageCount] {
        &self.ranking[..self.ranking.len().min(n)]
    }
}

/// Final per-cell summary ordered by cell id string
///
/// The ordering is lexicographic, so `A10` sorts before `A2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub cells: Vec<CellReport>,
}

impl Report {
    pub fn cell(&self, id: &str) -> Option<&CellReport> {
        self.cells.iter().find(|c| c.cell == id)
    }

    pub fn total_events(&self) -> u64 {
        self.cells.iter().map(|c| c.total).sum()
    }
}

/// Sum partials in the given order
pub fn merge_partials(partials: impl IntoIterator<Item = PartialCount>) -> PartialCount {
    partials
        .into_iter()
        .fold(PartialCount::new(), |mut acc, partial| {
            acc.merge(partial);
            acc
        })
}

/// Order languages by name, then stably by count descending
pub fn rank_languages(counts: &BTreeMap<String, u64>) -> Vec<LanguageCount> {
    let mut ranking: Vec<LanguageCount> = counts
        .iter()
        .map(|(language, count)| LanguageCount {
            language: language.clone(),
            count: *count,
        })
        .collect();

    ranking.sort_by(|a, b| a.language.cmp(&b.language));
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

/// Merge all partials and rank languages within every cell
///
/// Every id in `cell_ids` gets a row, with zero counts when nothing landed
/// in it.
pub fn reduce_and_rank<'a>(
    partials: impl IntoIterator<Item = PartialCount>,
    cell_ids: impl IntoIterator<Item = &'a str>,
) -> Report {
    let merged = merge_partials(partials);

    let mut by_cell: BTreeMap<String, BTreeMap<String, u64>> = cell_ids
        .into_iter()
        .map(|id| (id.to_string(), BTreeMap::new()))
        .collect();
    for (cell, languages) in merged.cells() {
        let target = by_cell.entry(cell.to_string()).or_default();
        for (language, count) in languages {
            *target.entry(language.clone()).or_default() += count;
        }
    }

    let cells = by_cell
        .into_iter()
        .map(|(cell, languages)| {
            let ranking = rank_languages(&languages);
            CellReport {
                cell,
                total: ranking.iter().map(|l| l.count).sum(),
                languages: ranking.len(),
                ranking,
            }
        })
        .collect();

    Report { cells }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(entries: &[(&str, &str, u64)]) -> PartialCount {
        let mut p = PartialCount::new();
        for (cell, language, n) in entries {
            p.add(cell, language, *n);
        }
        p
    }

    #[test]
    fn test_rank_by_count_then_name() {
        let counts: BTreeMap<String, u64> = [
            ("Thai", 3),
            ("English", 10),
            ("Arabic", 3),
            ("French", 5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let ranked: Vec<_> = rank_languages(&counts)
            .into_iter()
            .map(|l| (l.language, l.count))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("English".to_string(), 10),
                ("French".to_string(), 5),
                ("Arabic".to_string(), 3),
                ("Thai".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_reduce_sums_across_workers() {
        let report = reduce_and_rank(
            vec![
                partial(&[("A1", "English", 2), ("B1", "French", 1)]),
                partial(&[("A1", "English", 1), ("A1", "Thai", 4)]),
            ],
            ["A1", "B1"],
        );

        let a1 = report.cell("A1").unwrap();
        assert_eq!(a1.total, 7);
        assert_eq!(a1.languages, 2);
        assert_eq!(a1.ranking[0].language, "Thai");
        assert_eq!(a1.ranking[1].count, 3);
        assert_eq!(report.total_events(), 8);
    }

    #[test]
    fn test_cells_order_lexicographically() {
        let report = reduce_and_rank(
            vec![partial(&[("A2", "English", 1), ("A10", "English", 1)])],
            ["A1", "A2", "A10", "B1"],
        );
        let ids: Vec<_> = report.cells.iter().map(|c| c.cell.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A10", "A2", "B1"]);
    }

    #[test]
    fn test_empty_cells_are_reported_with_zero_counts() {
        let report = reduce_and_rank(Vec::new(), ["A1", "A2"]);
        assert_eq!(report.cells.len(), 2);
        assert!(report.cells.iter().all(|c| c.total == 0 && c.languages == 0));
        assert_eq!(report.total_events(), 0);
    }

    #[test]
    fn test_reduction_order_does_not_matter() {
        let a = partial(&[("A1", "English", 2), ("B1", "French", 1)]);
        let b = partial(&[("A1", "French", 2)]);
        let c = partial(&[("B1", "French", 5), ("A2", "Thai", 1)]);

        let forward = reduce_and_rank(vec![a.clone(), b.clone(), c.clone()], ["A1"]);
        let backward = reduce_and_rank(vec![c, b, a], ["A1"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_top_truncates() {
        let report = reduce_and_rank(
            vec![partial(&[
                ("A1", "English", 3),
                ("A1", "French", 2),
                ("A1", "Thai", 1),
            ])],
            ["A1"],
        );
        let a1 = report.cell("A1").unwrap();
        assert_eq!(a1.top(2).len(), 2);
        assert_eq!(a1.top(10).len(), 3);
    }
}
