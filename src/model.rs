//! model.rs — Value types for the ranking trend analytics pipeline.
//!
//! Everything here is an immutable value: the engine takes snapshots in,
//! returns a `TrendReport` out, and no stage holds references to mutable
//! caller state. Field names are stable — the dashboard UI and the
//! integration tests consume the serialized shape 1:1.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One ranking-board row: platform + title + date + rank.
///
/// `sub_category == ""` marks the overall (cross-genre) board; only those
/// rows participate in trend analytics. The repository adapter filters
/// sub-genre rows out before the engine ever sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub date: NaiveDate,
    pub platform: String,
    pub title: String,
    /// Localized display name, if the upstream works table has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_localized: Option<String>,
    /// 1 = top of the board.
    pub rank: u32,
    /// Empty string = overall board.
    #[serde(default)]
    pub sub_category: String,
    /// True for titles from the reporting party's own catalog.
    #[serde(default)]
    pub is_vendor_work: bool,
    /// Cross-platform identity, resolved upstream. `None` = unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unified_work_id: Option<i64>,
}

impl RankingEntry {
    pub fn new(
        date: NaiveDate,
        platform: impl Into<String>,
        title: impl Into<String>,
        rank: u32,
    ) -> Self {
        Self {
            date,
            platform: platform.into(),
            title: title.into(),
            title_localized: None,
            rank,
            sub_category: String::new(),
            is_vendor_work: false,
            unified_work_id: None,
        }
    }

    /// Mark as a vendor-catalog title (builder style).
    pub fn vendor(mut self) -> Self {
        self.is_vendor_work = true;
        self
    }

    pub fn localized(mut self, title: impl Into<String>) -> Self {
        self.title_localized = Some(title.into());
        self
    }

    pub fn unified(mut self, id: i64) -> Self {
        self.unified_work_id = Some(id);
        self
    }

    pub fn is_overall_board(&self) -> bool {
        self.sub_category.is_empty()
    }

    /// Required fields present? Rank 0 is impossible on a 1-based board.
    pub fn is_well_formed(&self) -> bool {
        !self.platform.is_empty() && !self.title.is_empty() && self.rank >= 1
    }
}

/// Classification of a title's movement between the two snapshot dates.
/// STEADY rows carry no signal and are never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Movement {
    New,
    Rising,
    Falling,
}

/// Rank movement of one `(platform, title)` pair between two dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDelta {
    pub platform: String,
    pub platform_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_localized: Option<String>,
    /// Absent for NEW entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_rank: Option<u32>,
    pub curr_rank: u32,
    /// `prev_rank - curr_rank`; positive = improved. Absent for NEW entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<i32>,
    pub movement: Movement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_work_id: Option<i64>,
    pub is_vendor_work: bool,
}

/// A `(platform, rank)` membership inside a cross-platform cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRank {
    pub platform: String,
    pub platform_name: String,
    pub rank: u32,
}

/// The same underlying work ranked on ≥ 3 distinct platforms at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossPlatformCluster {
    pub unified_work_id: i64,
    /// Representative display title: localized if any member has one,
    /// else the title of the best-ranked member.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_localized: Option<String>,
    /// Memberships sorted by ascending rank, one per platform.
    pub platforms: Vec<PlatformRank>,
    pub platform_count: usize,
    /// True if at least one listing in the cluster is vendor-flagged.
    pub is_vendor_work: bool,
}

impl CrossPlatformCluster {
    /// Best rank across member platforms. An empty membership list is an
    /// aggregator bug, not a runtime condition.
    pub fn min_rank(&self) -> u32 {
        debug_assert!(!self.platforms.is_empty(), "cluster without members");
        self.platforms.first().map(|p| p.rank).unwrap_or(u32::MAX)
    }
}

/// Per-platform vendor presence this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    pub platform: String,
    pub platform_name: String,
    pub total_ranked: usize,
    pub vendor_ranked: usize,
    /// `round(100 * vendor_ranked / total_ranked)`, 0 when the board is empty.
    pub share_pct: u32,
}

/// One row of the vendor top-ranked list (current rank + movement vs prev).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWork {
    pub platform: String,
    pub platform_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_localized: Option<String>,
    pub rank: u32,
    /// `prev_rank - rank`; 0 when the title was not ranked previously.
    pub rank_change: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_work_id: Option<i64>,
    pub is_vendor_work: bool,
}

/// The `rank == 1` title of one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopOneWork {
    pub platform: String,
    pub platform_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_localized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_work_id: Option<i64>,
    pub is_vendor_work: bool,
}

/// Vendor-catalog lens over the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSegment {
    pub summary: String,
    pub total_in_rankings: usize,
    pub active_platforms: usize,
    pub top_ranked: Vec<RankedWork>,
    pub rising: Vec<RankDelta>,
    pub new_entries: Vec<RankDelta>,
    pub multi_platform: Vec<CrossPlatformCluster>,
    pub platform_share: Vec<PlatformShare>,
}

/// Whole-market lens over the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSegment {
    pub summary: String,
    pub top_rising: Vec<RankDelta>,
    pub new_entries: Vec<RankDelta>,
    pub multi_platform: Vec<CrossPlatformCluster>,
    pub top1_works: Vec<TopOneWork>,
}

/// The complete comparative report for one reporting cycle.
/// Computed fresh per invocation, never mutated afterwards; safe to cache
/// and serialize for the configured cycle duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub generated_at: DateTime<Utc>,
    pub data_date: NaiveDate,
    pub prev_date: NaiveDate,
    pub vendor: VendorSegment,
    pub market: MarketSegment,
}

/// Display name for a storefront id. Unknown ids pass through unchanged.
pub fn platform_name(id: &str) -> String {
    match id {
        "piccoma" => "픽코마",
        "linemanga" => "라인망가",
        "mechacomic" => "메챠코믹",
        "cmoa" => "코믹시모아",
        "comico" => "코미코",
        "renta" => "렌타",
        "booklive" => "북라이브",
        "ebookjapan" => "이북재팬",
        "lezhin" => "레진코믹스",
        "beltoon" => "벨툰",
        "unext" => "U-NEXT",
        "asura" => "Asura Scans",
        other => other,
    }
    .to_string()
}
