//! # Snapshot Repository
//! Query contract the engine's caller depends on, plus an in-memory store
//! loadable from a JSON snapshot dump.
//!
//! The adapter owns all potentially blocking work: the two dated snapshots
//! are fetched here, *before* the pure engine runs. Fetching the current and
//! previous snapshot are independent read-only queries and may run
//! concurrently.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::model::RankingEntry;

/// Query contract for materialized ranking rows.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Distinct report dates, newest first. The caller picks `current` and
    /// `previous` from the head of this list.
    async fn list_report_dates(&self) -> Result<Vec<NaiveDate>>;

    /// Overall-board rows (`sub_category == ""`) for one date. Sub-genre
    /// rows are filtered out here; the engine never re-filters.
    async fn list_overall_rankings(&self, date: NaiveDate) -> Result<Vec<RankingEntry>>;
}

/// In-memory snapshot store. Backs tests and the single-file deployment
/// mode; a database-backed adapter would implement the same trait.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    rows: Vec<RankingEntry>,
}

impl SnapshotStore {
    pub fn from_rows(rows: Vec<RankingEntry>) -> Self {
        Self { rows }
    }

    /// Load a JSON array of ranking rows from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading rankings from {}", path.display()))?;
        let rows: Vec<RankingEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing rankings JSON from {}", path.display()))?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl SnapshotRepository for SnapshotStore {
    async fn list_report_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates: BTreeSet<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        Ok(dates.into_iter().rev().collect())
    }

    async fn list_overall_rankings(&self, date: NaiveDate) -> Result<Vec<RankingEntry>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.date == date && r.is_overall_board())
            .cloned()
            .collect())
    }
}
