//! # Report Assembler
//! The per-cycle pipeline: sanitize → diff → cluster → share → split →
//! narrate → assemble. Everything is synchronous and side-effect-free given
//! the two snapshots; the only non-deterministic field is `generated_at`.
//!
//! The caller (delivery layer) has already validated that two distinct
//! report dates exist and fetched both snapshots; this module never touches
//! storage.

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::cluster;
use crate::diff;
use crate::model::{MarketSegment, RankingEntry, TrendReport, VendorSegment};
use crate::narrative::{self, MarketSummaryData, VendorSummaryData};
use crate::segment;
use crate::share;

/// Run the full trend computation for one reporting cycle.
pub fn generate(
    data_date: NaiveDate,
    prev_date: NaiveDate,
    current: &[RankingEntry],
    previous: &[RankingEntry],
) -> TrendReport {
    let current = sanitize(current);
    let previous = sanitize(previous);

    let deltas = diff::compute_deltas(&current, &previous);
    let clusters = cluster::cluster_by_unified_work(&current);
    let shares = share::compute_shares(&current);
    let split = segment::split_segments(&deltas, &clusters, &current, &previous);

    let total_in_rankings: usize = shares.iter().map(|s| s.vendor_ranked).sum();
    let active_platforms = shares.iter().filter(|s| s.vendor_ranked > 0).count();

    let vendor_summary = narrative::build_vendor_summary(&VendorSummaryData {
        total_in_rankings,
        active_platforms,
        top_ranked: &split.vendor.top_ranked,
        rising: &split.vendor.rising,
        platform_share: &shares,
    });
    let market_summary = narrative::build_market_summary(&MarketSummaryData {
        rising: &split.market.top_rising,
        new_entries: &split.market.new_entries,
        multi_platform: &split.market.multi_platform,
        top1_works: &split.market.top1_works,
    });

    let vendor = VendorSegment {
        summary: vendor_summary,
        total_in_rankings,
        active_platforms,
        top_ranked: split.vendor.top_ranked,
        rising: split.vendor.rising,
        new_entries: split.vendor.new_entries,
        multi_platform: split.vendor.multi_platform,
        platform_share: shares,
    };
    let market = MarketSegment {
        summary: market_summary,
        top_rising: split.market.top_rising,
        new_entries: split.market.new_entries,
        multi_platform: split.market.multi_platform,
        top1_works: split.market.top1_works,
    };

    assemble(data_date, prev_date, vendor, market)
}

/// Pure composition of already-computed segment values into the final
/// immutable report, stamped with the generation time.
pub fn assemble(
    data_date: NaiveDate,
    prev_date: NaiveDate,
    vendor: VendorSegment,
    market: MarketSegment,
) -> TrendReport {
    TrendReport {
        generated_at: Utc::now(),
        data_date,
        prev_date,
        vendor,
        market,
    }
}

/// Log-and-skip rows missing required fields. One bad row must not void an
/// entire report, but the drop has to be visible in diagnostics.
fn sanitize(entries: &[RankingEntry]) -> Vec<RankingEntry> {
    entries
        .iter()
        .filter(|e| {
            let ok = e.is_well_formed();
            if !ok {
                warn!(
                    platform = %e.platform,
                    title = %e.title,
                    rank = e.rank,
                    "skipping malformed ranking row"
                );
            }
            ok
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Movement;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn row(platform: &str, title: &str, rank: u32) -> RankingEntry {
        RankingEntry::new(d(26), platform, title, rank)
    }

    /// Regression test for the threshold/classification boundary: A improves
    /// by 2 (below threshold → steady, dropped), B is new at rank 2.
    #[test]
    fn small_improvement_is_steady_and_dropped_newcomer_is_new() {
        let previous = vec![row("p1", "A", 3)];
        let current = vec![row("p1", "A", 1).vendor(), row("p1", "B", 2)];

        let report = generate(d(26), d(25), &current, &previous);

        // A climbed only 2 → no rising entry anywhere.
        assert!(report.market.top_rising.is_empty());
        assert!(report.vendor.rising.is_empty());

        // B is the sole new entry.
        assert_eq!(report.market.new_entries.len(), 1);
        assert_eq!(report.market.new_entries[0].title, "B");
        assert_eq!(report.market.new_entries[0].movement, Movement::New);

        // Vendor top-ranked holds A at rank 1; market top1 roster too.
        assert_eq!(report.vendor.top_ranked[0].title, "A");
        assert_eq!(report.vendor.top_ranked[0].rank, 1);
        assert_eq!(report.market.top1_works.len(), 1);
        assert_eq!(report.market.top1_works[0].title, "A");
        // B is rank 2, not a platform leader.
        assert!(report.market.top1_works.iter().all(|t| t.title != "B"));
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let current = vec![
            row("p1", "good", 1),
            row("", "no platform", 2),
            row("p1", "", 3),
            row("p1", "rank zero", 0),
        ];
        let report = generate(d(26), d(25), &current, &[]);
        assert_eq!(report.market.new_entries.len(), 1);
        assert_eq!(report.market.new_entries[0].title, "good");
        // Shares only count the surviving row.
        assert_eq!(report.vendor.platform_share.len(), 1);
        assert_eq!(report.vendor.platform_share[0].total_ranked, 1);
    }

    #[test]
    fn vendor_summary_always_has_presence_line() {
        let report = generate(d(26), d(25), &[], &[]);
        assert_eq!(report.vendor.summary, "0개 플랫폼, 0건 랭킹 진입");
        assert!(report.market.summary.is_empty());
    }

    #[test]
    fn assemble_is_idempotent_except_generated_at() {
        let current = vec![row("p1", "A", 1).vendor(), row("p2", "B", 1)];
        let previous = vec![row("p1", "A", 9)];

        let a = generate(d(26), d(25), &current, &previous);
        let b = generate(d(26), d(25), &current, &previous);

        assert_eq!(a.data_date, b.data_date);
        assert_eq!(a.prev_date, b.prev_date);
        assert_eq!(a.vendor, b.vendor);
        assert_eq!(a.market, b.market);
    }
}
