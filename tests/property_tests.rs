//! Property tests for the pure planning, grid and reduction functions
//!
//! These tests use proptest for automated property verification.

use geotally::grid::{row_label, BoundingBox, GridBuilder, Point};
use geotally::mapreduce::planning::FIRST_DATA_LINE;
use geotally::mapreduce::reducer::rank_languages;
use geotally::mapreduce::{plan_shards, reduce_and_rank, PartialCount};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Shard planning
// ============================================================================

proptest! {
    #[test]
    fn prop_shards_cover_data_lines_exactly(total in 0usize..5_000, workers in 1usize..64) {
        let plan = plan_shards(total, workers).unwrap();
        prop_assert_eq!(plan.shards.len(), workers);

        let mut next = FIRST_DATA_LINE;
        for (i, shard) in plan.shards.iter().enumerate() {
            prop_assert_eq!(shard.worker, i);
            prop_assert_eq!(shard.start_line, next);
            next = shard.end_line();
        }
        prop_assert_eq!(next, total + FIRST_DATA_LINE);
    }

    #[test]
    fn prop_shard_sizes_are_balanced(total in 0usize..5_000, workers in 1usize..64) {
        let plan = plan_shards(total, workers).unwrap();
        let sizes: Vec<_> = plan.shards.iter().map(|s| s.line_count).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        // larger shards come first
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }
}

// ============================================================================
// Grid naming and location
// ============================================================================

fn regular_grid(rows: usize, cols: usize) -> GridBuilder {
    let mut builder = GridBuilder::new();
    for r in 0..rows {
        for c in 0..cols {
            builder.add_rectangle(BoundingBox {
                x1: c as f64,
                x2: (c + 1) as f64,
                y1: r as f64,
                y2: (r + 1) as f64,
            });
        }
    }
    builder
}

proptest! {
    #[test]
    fn prop_row_labels_are_distinct(a in 1usize..20_000, b in 1usize..20_000) {
        prop_assume!(a != b);
        prop_assert_ne!(row_label(a), row_label(b));
    }

    #[test]
    fn prop_cell_names_are_unique(rows in 1usize..40, cols in 1usize..12) {
        let grid = regular_grid(rows, cols).build().unwrap();
        let names: HashSet<_> = grid.cell_ids().collect();
        prop_assert_eq!(names.len(), rows * cols);
    }

    #[test]
    fn prop_interior_point_hits_its_cell(
        rows in 1usize..30,
        cols in 1usize..10,
        fx in 0.01f64..0.99,
        fy in 0.01f64..0.99,
        seed in any::<usize>(),
    ) {
        let grid = regular_grid(rows, cols).build().unwrap();
        let r = seed % rows;
        let c = (seed / rows) % cols;
        let point = Point::new(c as f64 + fx, r as f64 + fy);

        let hits: Vec<_> = grid
            .cells()
            .iter()
            .filter(|cell| cell.bounds.contains(point))
            .collect();
        prop_assert_eq!(hits.len(), 1);

        // row letters count from the north, columns from the west
        let expected = format!("{}{}", row_label(rows - r), c + 1);
        prop_assert_eq!(grid.locate(point), Some(expected.as_str()));
    }
}

// ============================================================================
// Reduction
// ============================================================================

fn partial_strategy() -> impl Strategy<Value = PartialCount> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["A1", "A2", "B1", "B2"]),
            prop::sample::select(vec!["English", "French", "Thai", "Arabic"]),
            1u64..50,
        ),
        0..20,
    )
    .prop_map(|entries| {
        let mut partial = PartialCount::new();
        for (cell, language, n) in entries {
            partial.add(cell, language, n);
        }
        partial
    })
}

proptest! {
    #[test]
    fn prop_reduce_ignores_partial_order(
        (partials, shuffled) in prop::collection::vec(partial_strategy(), 1..8)
            .prop_flat_map(|p| (Just(p.clone()), Just(p).prop_shuffle()))
    ) {
        let cells = ["A1", "A2", "B1", "B2"];
        let expected = reduce_and_rank(partials, cells);
        let actual = reduce_and_rank(shuffled, cells);
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_reduce_preserves_totals(partials in prop::collection::vec(partial_strategy(), 0..8)) {
        let input_total: u64 = partials.iter().map(PartialCount::total).sum();
        let report = reduce_and_rank(partials, ["A1", "A2", "B1", "B2"]);
        prop_assert_eq!(report.cells.len(), 4);
        prop_assert_eq!(report.total_events(), input_total);
        for cell in &report.cells {
            prop_assert_eq!(cell.total, cell.ranking.iter().map(|l| l.count).sum::<u64>());
            prop_assert_eq!(cell.languages, cell.ranking.len());
        }
    }

    #[test]
    fn prop_ranking_is_count_then_name_ordered(
        counts in prop::collection::btree_map("[a-z]{1,6}", 1u64..20, 0..12)
    ) {
        let counts: BTreeMap<String, u64> = counts;
        let ranking = rank_languages(&counts);
        prop_assert_eq!(ranking.len(), counts.len());
        for pair in ranking.windows(2) {
            prop_assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].language < pair[1].language)
            );
        }
    }
}
