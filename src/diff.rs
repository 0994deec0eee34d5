//! # Diff Engine
//! Pure, testable logic that maps `(current, previous)` snapshots →
//! `Vec<RankDelta>`. No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: a `(platform, title)` pair absent from the previous snapshot is
//! NEW; otherwise `change = prev_rank - curr_rank` and anything inside the
//! ±threshold band is STEADY and dropped entirely (no STEADY rows are
//! materialized, which keeps downstream consumers simple).

use std::collections::HashMap;

use crate::model::{platform_name, Movement, RankDelta, RankingEntry};

/// Minimum rank improvement/drop to count as RISING/FALLING.
/// Tunable parameter, not a derived invariant; changing it changes report content.
pub const RISING_THRESHOLD: i32 = 5;

/// NEW entries only count within the top of the board.
pub const NEW_ENTRY_MAX_RANK: u32 = 30;

/// Index a snapshot by `(platform, title)` → rank for O(1) lookup.
/// Title is the match key; genre metadata drift between dates is irrelevant.
pub fn index_by_key(entries: &[RankingEntry]) -> HashMap<(&str, &str), u32> {
    entries
        .iter()
        .map(|e| ((e.platform.as_str(), e.title.as_str()), e.rank))
        .collect()
}

/// Compute rank deltas of `current` against `previous`.
///
/// Both inputs must already be overall-board rows only (the repository
/// adapter filters server-side); this function does not re-filter.
///
/// Output ordering is load-bearing for the segment splitter, which slices
/// without re-sorting: RISING first (descending change, tie ascending
/// current rank), then NEW (ascending current rank), then FALLING
/// (ascending change, i.e. worst drop first).
pub fn compute_deltas(current: &[RankingEntry], previous: &[RankingEntry]) -> Vec<RankDelta> {
    // 1) Index previous by (platform, title)
    let prev_index = index_by_key(previous);

    // 2) Classify every current row; STEADY is dropped here
    let mut rising = Vec::new();
    let mut new_entries = Vec::new();
    let mut falling = Vec::new();

    for e in current {
        match prev_index.get(&(e.platform.as_str(), e.title.as_str())) {
            None => {
                if e.rank <= NEW_ENTRY_MAX_RANK {
                    new_entries.push(delta_of(e, None, None, Movement::New));
                }
            }
            Some(&prev_rank) => {
                let change = prev_rank as i32 - e.rank as i32;
                if change >= RISING_THRESHOLD {
                    rising.push(delta_of(e, Some(prev_rank), Some(change), Movement::Rising));
                } else if change <= -RISING_THRESHOLD {
                    falling.push(delta_of(e, Some(prev_rank), Some(change), Movement::Falling));
                }
            }
        }
    }

    // 3) Category-local sort orders (see doc comment)
    rising.sort_by(|a, b| b.change.cmp(&a.change).then(a.curr_rank.cmp(&b.curr_rank)));
    new_entries.sort_by(|a, b| a.curr_rank.cmp(&b.curr_rank).then(a.platform.cmp(&b.platform)));
    falling.sort_by(|a, b| a.change.cmp(&b.change).then(a.curr_rank.cmp(&b.curr_rank)));

    let mut out = rising;
    out.append(&mut new_entries);
    out.append(&mut falling);
    out
}

fn delta_of(
    e: &RankingEntry,
    prev_rank: Option<u32>,
    change: Option<i32>,
    movement: Movement,
) -> RankDelta {
    RankDelta {
        platform: e.platform.clone(),
        platform_name: platform_name(&e.platform),
        title: e.title.clone(),
        title_localized: e.title_localized.clone(),
        prev_rank,
        curr_rank: e.rank,
        change,
        movement,
        unified_work_id: e.unified_work_id,
        is_vendor_work: e.is_vendor_work,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
    }

    fn row(platform: &str, title: &str, rank: u32) -> RankingEntry {
        RankingEntry::new(d(), platform, title, rank)
    }

    #[test]
    fn absent_previous_row_is_new_with_no_prev_rank() {
        let current = vec![row("piccoma", "A", 2)];
        let deltas = compute_deltas(&current, &[]);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].movement, Movement::New);
        assert_eq!(deltas[0].prev_rank, None);
        assert_eq!(deltas[0].change, None);
    }

    #[test]
    fn rising_threshold_is_inclusive_at_five() {
        // change = 4 → steady, dropped; change = 5 → rising
        let previous = vec![row("cmoa", "below", 10), row("cmoa", "at", 10)];
        let current = vec![row("cmoa", "below", 6), row("cmoa", "at", 5)];
        let deltas = compute_deltas(&current, &previous);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].title, "at");
        assert_eq!(deltas[0].movement, Movement::Rising);
        assert_eq!(deltas[0].change, Some(5));
    }

    #[test]
    fn falling_threshold_mirrors_rising() {
        let previous = vec![row("renta", "slips", 3), row("renta", "crashes", 3)];
        let current = vec![row("renta", "slips", 7), row("renta", "crashes", 8)];
        let deltas = compute_deltas(&current, &previous);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].title, "crashes");
        assert_eq!(deltas[0].movement, Movement::Falling);
        assert_eq!(deltas[0].change, Some(-5));
    }

    #[test]
    fn new_entries_beyond_rank_30_are_ignored() {
        let current = vec![row("piccoma", "deep", 31), row("piccoma", "shallow", 30)];
        let deltas = compute_deltas(&current, &[]);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].title, "shallow");
    }

    #[test]
    fn rising_sorted_by_change_then_rank_new_by_rank() {
        let previous = vec![
            row("p1", "big", 20),
            row("p1", "bigger", 30),
            row("p1", "tied", 25),
        ];
        let current = vec![
            row("p1", "big", 10),    // +10, rank 10
            row("p1", "bigger", 20), // +10, rank 20
            row("p1", "tied", 5),    // +20
            row("p1", "fresh-low", 9),
            row("p1", "fresh-top", 1),
        ];
        let deltas = compute_deltas(&current, &previous);
        let titles: Vec<&str> = deltas.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["tied", "big", "bigger", "fresh-top", "fresh-low"]);
    }

    #[test]
    fn match_key_is_platform_and_title() {
        // Same title on another platform is a distinct key → NEW there.
        let previous = vec![row("piccoma", "A", 1)];
        let current = vec![row("linemanga", "A", 1)];
        let deltas = compute_deltas(&current, &previous);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].movement, Movement::New);
        assert_eq!(deltas[0].platform, "linemanga");
    }
}
