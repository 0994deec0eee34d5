//! # HTTP Delivery
//! Axum router serving the trend report to the dashboard, with a short-TTL
//! in-process cache keyed by the reporting cycle.
//!
//! The cache TTL is wall-clock (minutes), deliberately decoupled from the
//! daily data cadence; `X-Report-Cache: HIT|MISS` exposes cache behavior for
//! diagnostics and tests.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::model::TrendReport;
use crate::repo::SnapshotRepository;
use crate::report;

const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;

#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn SnapshotRepository>,
    cache: Arc<Mutex<Option<CachedReport>>>,
    ttl: Duration,
}

struct CachedReport {
    key: (NaiveDate, NaiveDate),
    stored_at: Instant,
    report: TrendReport,
}

/// Build the router. TTL comes from `REPORT_CACHE_TTL_MS` (default 5 min).
pub fn create_router(repo: Arc<dyn SnapshotRepository>) -> Router {
    let ttl_ms: u64 = std::env::var("REPORT_CACHE_TTL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_MS);

    let state = AppState {
        repo,
        cache: Arc::new(Mutex::new(None)),
        ttl: Duration::from_millis(ttl_ms),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/report/dates", get(report_dates))
        .route("/report/trend", get(report_trend))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn report_dates(State(state): State<AppState>) -> Response {
    match state.repo.list_report_dates().await {
        Ok(dates) => Json(dates).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn report_trend(State(state): State<AppState>) -> Response {
    // 1) Pick the reporting cycle; short-circuit before the engine runs.
    let dates = match state.repo.list_report_dates().await {
        Ok(d) => d,
        Err(e) => return internal_error(e),
    };
    if dates.len() < 2 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "insufficient history" })),
        )
            .into_response();
    }
    let (data_date, prev_date) = (dates[0], dates[1]);

    // 2) Cache hit for the same cycle within TTL?
    {
        let guard = state.cache.lock().expect("report cache mutex poisoned");
        if let Some(c) = guard.as_ref() {
            if c.key == (data_date, prev_date) && c.stored_at.elapsed() <= state.ttl {
                return with_cache_header(Json(c.report.clone()).into_response(), "HIT");
            }
        }
    }

    // 3) Two independent read-only queries; fetch concurrently.
    let (current, previous) = tokio::join!(
        state.repo.list_overall_rankings(data_date),
        state.repo.list_overall_rankings(prev_date),
    );
    let (current, previous) = match (current, previous) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => return internal_error(e),
    };

    let fresh = report::generate(data_date, prev_date, &current, &previous);
    info!(%data_date, %prev_date, "trend report generated");

    {
        let mut guard = state.cache.lock().expect("report cache mutex poisoned");
        *guard = Some(CachedReport {
            key: (data_date, prev_date),
            stored_at: Instant::now(),
            report: fresh.clone(),
        });
    }

    with_cache_header(Json(fresh).into_response(), "MISS")
}

fn with_cache_header(mut resp: Response, value: &'static str) -> Response {
    resp.headers_mut()
        .insert("X-Report-Cache", HeaderValue::from_static(value));
    resp
}

fn internal_error(e: anyhow::Error) -> Response {
    warn!("report request failed: {e:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal" })),
    )
        .into_response()
}
