//! # Platform Share Calculator
//! Per-platform ranked-row totals and vendor counts for the current cycle,
//! reduced to a share percentage. Pure aggregation, no I/O.

use std::collections::BTreeMap;

use crate::model::{platform_name, PlatformShare, RankingEntry};

/// Compute per-platform vendor share for the current snapshot.
///
/// `share_pct = round(100 * vendor / total)`; an empty board is defined as
/// 0%, not a division error. Sorted by descending vendor count (platforms
/// with no vendor presence last), tie-broken by platform id.
pub fn compute_shares(current: &[RankingEntry]) -> Vec<PlatformShare> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for e in current {
        let c = counts.entry(e.platform.as_str()).or_insert((0, 0));
        c.0 += 1;
        if e.is_vendor_work {
            c.1 += 1;
        }
    }

    let mut shares: Vec<PlatformShare> = counts
        .into_iter()
        .map(|(platform, (total, vendor))| PlatformShare {
            platform: platform.to_string(),
            platform_name: platform_name(platform),
            total_ranked: total,
            vendor_ranked: vendor,
            share_pct: share_pct(vendor, total),
        })
        .collect();

    shares.sort_by(|a, b| {
        b.vendor_ranked
            .cmp(&a.vendor_ranked)
            .then(a.platform.cmp(&b.platform))
    });
    shares
}

fn share_pct(vendor: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((vendor as f64 / total as f64) * 100.0).round() as u32
}
