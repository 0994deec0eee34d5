// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cluster;
pub mod diff;
pub mod model;
pub mod narrative;
pub mod repo;
pub mod report;
pub mod segment;
pub mod share;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::model::{
    CrossPlatformCluster, MarketSegment, Movement, PlatformShare, RankDelta, RankedWork,
    RankingEntry, TopOneWork, TrendReport, VendorSegment,
};
pub use crate::repo::{SnapshotRepository, SnapshotStore};
