//! End-to-end tests for the pure report pipeline.
//!
//! Covered (strict):
//! - Determinism: identical snapshot inputs → byte-identical report bodies
//! - The threshold/classification regression scenario (steady vs new)
//! - Cluster cardinality through the full pipeline
//! - Narrative omission with sparse data

use chrono::NaiveDate;
use ranking_trend_analyzer::{report, Movement, RankingEntry};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
}

fn row(platform: &str, title: &str, rank: u32) -> RankingEntry {
    RankingEntry::new(d(26), platform, title, rank)
}

/// A realistic two-snapshot fixture: one vendor climber, one market
/// newcomer, one three-platform cluster, one steady title.
fn fixture() -> (Vec<RankingEntry>, Vec<RankingEntry>) {
    let previous = vec![
        RankingEntry::new(d(25), "piccoma", "약탈의 전사", 14),
        RankingEntry::new(d(25), "piccoma", "잔잔한 작품", 5),
        RankingEntry::new(d(25), "linemanga", "클러스터작", 9),
    ];
    let current = vec![
        row("piccoma", "약탈의 전사", 2).vendor().unified(1),
        row("piccoma", "잔잔한 작품", 4),
        row("piccoma", "신작 돌풍", 1),
        row("linemanga", "클러스터작", 3).unified(2),
        row("cmoa", "클러스터작", 6).unified(2),
        row("renta", "클러스터작", 11).unified(2),
    ];
    (current, previous)
}

#[test]
fn identical_inputs_yield_byte_identical_bodies() {
    let (current, previous) = fixture();

    let mut a = serde_json::to_value(report::generate(d(26), d(25), &current, &previous)).unwrap();
    let mut b = serde_json::to_value(report::generate(d(26), d(25), &current, &previous)).unwrap();

    // generated_at is the single allowed difference.
    a.as_object_mut().unwrap().remove("generated_at");
    b.as_object_mut().unwrap().remove("generated_at");
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn full_pipeline_classifies_the_fixture() {
    let (current, previous) = fixture();
    let report = report::generate(d(26), d(25), &current, &previous);

    // 약탈의 전사: 14 → 2, change +12, vendor rising.
    assert_eq!(report.vendor.rising.len(), 1);
    let climber = &report.vendor.rising[0];
    assert_eq!(climber.title, "약탈의 전사");
    assert_eq!(climber.prev_rank, Some(14));
    assert_eq!(climber.change, Some(12));
    assert_eq!(climber.movement, Movement::Rising);

    // 잔잔한 작품: 5 → 4 is steady and appears nowhere.
    assert!(report
        .market
        .top_rising
        .iter()
        .all(|r| r.title != "잔잔한 작품"));
    assert!(report
        .market
        .new_entries
        .iter()
        .all(|r| r.title != "잔잔한 작품"));

    // 클러스터작 ranks on 3 platforms → exactly one cluster.
    assert_eq!(report.market.multi_platform.len(), 1);
    let cluster = &report.market.multi_platform[0];
    assert_eq!(cluster.unified_work_id, 2);
    assert_eq!(cluster.platform_count, 3);
    assert_eq!(cluster.min_rank(), 3);

    // New entries: 신작 돌풍 plus the cluster's two fresh platform listings.
    let new_titles: Vec<&str> = report
        .market
        .new_entries
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert!(new_titles.contains(&"신작 돌풍"));
    // Ascending current rank: 신작 돌풍 (1) leads the list.
    assert_eq!(report.market.new_entries[0].title, "신작 돌풍");

    // Platform leaders: 신작 돌풍 tops piccoma.
    assert!(report
        .market
        .top1_works
        .iter()
        .any(|t| t.title == "신작 돌풍" && t.platform == "piccoma"));

    // Vendor shares: piccoma has 1 vendor row out of 3 → 33%.
    let piccoma = report
        .vendor
        .platform_share
        .iter()
        .find(|s| s.platform == "piccoma")
        .unwrap();
    assert_eq!(piccoma.total_ranked, 3);
    assert_eq!(piccoma.vendor_ranked, 1);
    assert_eq!(piccoma.share_pct, 33);

    // Vendor summary carries the mandatory presence line and the climber.
    assert!(report.vendor.summary.starts_with("1개 플랫폼, 1건 랭킹 진입"));
    assert!(report.vendor.summary.contains("급상승 «약탈의 전사» 14→2위 (+12)"));
}

#[test]
fn two_platform_identity_never_clusters() {
    let current = vec![
        row("piccoma", "경계작", 1).unified(42),
        row("cmoa", "경계작", 2).unified(42),
    ];
    let report = report::generate(d(26), d(25), &current, &[]);
    assert!(report.market.multi_platform.is_empty());
    assert!(report.vendor.multi_platform.is_empty());
}

#[test]
fn sparse_data_omits_sentences_but_keeps_presence_line() {
    // One market row, nothing vendor, nothing rising, nothing clustered.
    let current = vec![row("piccoma", "외톨이", 17)];
    let report = report::generate(d(26), d(25), &current, &[]);

    assert_eq!(report.vendor.summary, "0개 플랫폼, 0건 랭킹 진입");
    assert!(!report.vendor.summary.contains("급상승"));
    assert!(!report.vendor.summary.contains("점유율"));

    // Market side still records the rank-17 newcomer, below the top-3
    // highlight bar.
    assert!(report.market.summary.contains("TOP 30 신규 1작품"));
    assert!(!report.market.summary.contains("신규 주목"));
}
