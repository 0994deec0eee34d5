//! # Cross-Platform Aggregator
//! Groups current-snapshot rows by their resolved unified-work identity and
//! keeps the works that rank on several storefronts at once.
//!
//! Rows without a `unified_work_id` cannot be cross-referenced and are
//! skipped — identity resolution is an upstream responsibility, not ours.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{platform_name, CrossPlatformCluster, PlatformRank, RankingEntry};

/// A work must rank on at least this many distinct platforms to count as a
/// cross-platform cluster. Tunable parameter preserved from the source data.
pub const MIN_CLUSTER_PLATFORMS: usize = 3;

/// Cluster current-snapshot rows by unified work id.
///
/// Sort order: descending platform count, then ascending best rank, then
/// ascending work id so the output is stable across runs.
pub fn cluster_by_unified_work(current: &[RankingEntry]) -> Vec<CrossPlatformCluster> {
    // 1) Group rows by resolved identity (BTreeMap keeps iteration stable)
    let mut groups: BTreeMap<i64, Vec<&RankingEntry>> = BTreeMap::new();
    for e in current {
        if let Some(id) = e.unified_work_id {
            groups.entry(id).or_default().push(e);
        }
    }

    // 2) Build clusters from groups spanning enough distinct platforms
    let mut clusters = Vec::new();
    for (id, mut members) in groups {
        let distinct: BTreeSet<&str> = members.iter().map(|m| m.platform.as_str()).collect();
        if distinct.len() < MIN_CLUSTER_PLATFORMS {
            continue;
        }

        members.sort_by(|a, b| a.rank.cmp(&b.rank).then(a.platform.cmp(&b.platform)));

        // One membership per platform, best rank wins (members are rank-sorted).
        let mut seen = BTreeSet::new();
        let platforms: Vec<PlatformRank> = members
            .iter()
            .filter(|m| seen.insert(m.platform.as_str()))
            .map(|m| PlatformRank {
                platform: m.platform.clone(),
                platform_name: platform_name(&m.platform),
                rank: m.rank,
            })
            .collect();

        let title_localized = members.iter().find_map(|m| m.title_localized.clone());
        let title = title_localized
            .clone()
            .unwrap_or_else(|| members[0].title.clone());
        let is_vendor_work = members.iter().any(|m| m.is_vendor_work);

        clusters.push(CrossPlatformCluster {
            unified_work_id: id,
            title,
            title_localized,
            platform_count: platforms.len(),
            platforms,
            is_vendor_work,
        });
    }

    // 3) Biggest footprint first, then best rank, then id for determinism
    clusters.sort_by(|a, b| {
        b.platform_count
            .cmp(&a.platform_count)
            .then(a.min_rank().cmp(&b.min_rank()))
            .then(a.unified_work_id.cmp(&b.unified_work_id))
    });
    clusters
}
