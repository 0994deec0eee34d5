//! # Segment Splitter
//! Partitions the computed results into the two report lenses: the vendor
//! segment (vendor-flagged rows only) and the market segment (everything).
//!
//! Pure filtering and capping over structures that arrive pre-sorted from
//! the diff engine and the aggregator — nothing here re-sorts or recomputes,
//! so the two lenses can never drift apart in behavior.

use std::collections::BTreeSet;

use crate::diff;
use crate::model::{
    platform_name, CrossPlatformCluster, Movement, RankDelta, RankedWork, RankingEntry,
    TopOneWork,
};

/// Vendor top-ranked list cap.
pub const VENDOR_TOP_LIMIT: usize = 8;
/// Vendor rising / new-entry / multi-platform caps.
pub const VENDOR_LIST_LIMIT: usize = 5;
/// Market rising / new-entry caps.
pub const MARKET_LIST_LIMIT: usize = 8;
/// Multi-platform cap, both lenses.
pub const MULTI_PLATFORM_LIMIT: usize = 5;

/// Vendor-lens slices of the computed results.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorLists {
    pub top_ranked: Vec<RankedWork>,
    pub rising: Vec<RankDelta>,
    pub new_entries: Vec<RankDelta>,
    pub multi_platform: Vec<CrossPlatformCluster>,
}

/// Market-lens slices of the computed results.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketLists {
    pub top_rising: Vec<RankDelta>,
    pub new_entries: Vec<RankDelta>,
    pub multi_platform: Vec<CrossPlatformCluster>,
    pub top1_works: Vec<TopOneWork>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSplit {
    pub vendor: VendorLists,
    pub market: MarketLists,
}

/// Split pre-computed deltas and clusters into the two lenses.
///
/// `current` and `previous` are only consulted for the naturally bounded
/// extras: the per-platform rank-1 roster and the vendor top-ranked list
/// (current vendor rows by rank, with their movement vs the previous
/// snapshot).
pub fn split_segments(
    deltas: &[RankDelta],
    clusters: &[CrossPlatformCluster],
    current: &[RankingEntry],
    previous: &[RankingEntry],
) -> SegmentSplit {
    let vendor = VendorLists {
        top_ranked: vendor_top_ranked(current, previous),
        rising: take_filtered(deltas, VENDOR_LIST_LIMIT, |d| {
            d.movement == Movement::Rising && d.is_vendor_work
        }),
        new_entries: take_filtered(deltas, VENDOR_LIST_LIMIT, |d| {
            d.movement == Movement::New && d.is_vendor_work
        }),
        multi_platform: clusters
            .iter()
            .filter(|c| c.is_vendor_work)
            .take(VENDOR_LIST_LIMIT)
            .cloned()
            .collect(),
    };

    let market = MarketLists {
        top_rising: take_filtered(deltas, MARKET_LIST_LIMIT, |d| {
            d.movement == Movement::Rising
        }),
        new_entries: take_filtered(deltas, MARKET_LIST_LIMIT, |d| d.movement == Movement::New),
        multi_platform: clusters.iter().take(MULTI_PLATFORM_LIMIT).cloned().collect(),
        top1_works: top1_per_platform(current),
    };

    SegmentSplit { vendor, market }
}

fn take_filtered(
    deltas: &[RankDelta],
    cap: usize,
    pred: impl Fn(&RankDelta) -> bool,
) -> Vec<RankDelta> {
    // Slicing only — input order is the diff engine's contract.
    deltas
        .iter()
        .filter(|&d| pred(d))
        .take(cap)
        .cloned()
        .collect()
}

/// Current vendor rows by ascending rank, capped, with movement vs previous.
/// A title absent from the previous snapshot reports `rank_change = 0`.
fn vendor_top_ranked(current: &[RankingEntry], previous: &[RankingEntry]) -> Vec<RankedWork> {
    let prev_index = diff::index_by_key(previous);

    let mut rows: Vec<&RankingEntry> = current.iter().filter(|e| e.is_vendor_work).collect();
    rows.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.platform.cmp(&b.platform)));

    rows.into_iter()
        .take(VENDOR_TOP_LIMIT)
        .map(|e| RankedWork {
            platform: e.platform.clone(),
            platform_name: platform_name(&e.platform),
            title: e.title.clone(),
            title_localized: e.title_localized.clone(),
            rank: e.rank,
            rank_change: prev_index
                .get(&(e.platform.as_str(), e.title.as_str()))
                .map(|&p| p as i32 - e.rank as i32)
                .unwrap_or(0),
            unified_work_id: e.unified_work_id,
            is_vendor_work: true,
        })
        .collect()
}

/// The single `rank == 1` row per platform, platform-ordered. Naturally
/// bounded by platform count, no cap needed.
fn top1_per_platform(current: &[RankingEntry]) -> Vec<TopOneWork> {
    let mut seen = BTreeSet::new();
    let mut tops: Vec<TopOneWork> = current
        .iter()
        .filter(|e| e.rank == 1)
        .filter(|e| seen.insert(e.platform.clone()))
        .map(|e| TopOneWork {
            platform: e.platform.clone(),
            platform_name: platform_name(&e.platform),
            title: e.title.clone(),
            title_localized: e.title_localized.clone(),
            unified_work_id: e.unified_work_id,
            is_vendor_work: e.is_vendor_work,
        })
        .collect();
    tops.sort_by(|a, b| a.platform.cmp(&b.platform));
    tops
}
