//! # Narrative Summary Builder
//! Deterministic template-based Korean summaries for the two report lenses.
//! One sentence per line, newline-joined, no LLM anywhere near this.
//!
//! Every sentence is conditionally emitted: an empty candidate list simply
//! omits its line. The builder never fabricates placeholder text — "no data"
//! strings are the UI's concern.

use crate::model::{CrossPlatformCluster, PlatformShare, RankDelta, RankedWork, TopOneWork};

/// Minimum platform share (in percent) worth calling out in the summary.
pub const SHARE_CALLOUT_MIN_PCT: u32 = 3;

/// Korean object/subject particle selection.
///
/// Returns `with_batchim` when `word` ends in a consonant-final syllable
/// block, `without_batchim` otherwise. Digits and Latin letters fall back to
/// their spoken-Korean finals; anything else defaults to the batchim form.
/// Pure and locale-independent so grammar can be tested in isolation.
pub fn josa<'a>(word: &str, with_batchim: &'a str, without_batchim: &'a str) -> &'a str {
    let Some(last) = word.chars().last() else {
        return with_batchim;
    };
    let code = last as u32;
    if (0xAC00..=0xD7A3).contains(&code) {
        return if (code - 0xAC00) % 28 != 0 {
            with_batchim
        } else {
            without_batchim
        };
    }
    if last.is_ascii_digit() {
        // 영/일/삼/육/칠 end in a consonant when read aloud.
        return if "01367".contains(last) {
            with_batchim
        } else {
            without_batchim
        };
    }
    if last.is_ascii_alphabetic() {
        return if "lmnrptLMNRPT".contains(last) {
            with_batchim
        } else {
            without_batchim
        };
    }
    with_batchim
}

/// Inputs for the vendor-lens summary. All slices arrive pre-sorted.
pub struct VendorSummaryData<'a> {
    pub total_in_rankings: usize,
    pub active_platforms: usize,
    pub top_ranked: &'a [RankedWork],
    pub rising: &'a [RankDelta],
    pub platform_share: &'a [PlatformShare],
}

/// Vendor summary: up to 4 sentences in fixed order.
pub fn build_vendor_summary(d: &VendorSummaryData<'_>) -> String {
    let mut lines = Vec::new();

    // 1) Always: overall presence
    lines.push(format!(
        "{}개 플랫폼, {}건 랭킹 진입",
        d.active_platforms, d.total_in_rankings
    ));

    // 2) Best-ranked vendor title, stronger phrasing inside the top 3
    if let Some(t) = d.top_ranked.first() {
        if t.rank <= 3 {
            lines.push(format!(
                "{} {}위 «{}» — 선두 유지",
                t.platform_name, t.rank, t.title
            ));
        } else {
            lines.push(format!(
                "최고 순위: {} {}위 «{}»",
                t.platform_name, t.rank, t.title
            ));
        }
    }

    // 3) Strongest platform share, if it clears the callout floor
    let top_share = d
        .platform_share
        .iter()
        .filter(|p| p.vendor_ranked > 0)
        .max_by_key(|p| p.share_pct);
    if let Some(top) = top_share {
        if top.share_pct >= SHARE_CALLOUT_MIN_PCT {
            lines.push(format!(
                "{} 점유율 {}% 최고",
                top.platform_name, top.share_pct
            ));
        }
    }

    // 4) Top rising vendor title with its transition
    if let Some(r) = d.rising.first() {
        if let (Some(prev), Some(change)) = (r.prev_rank, r.change) {
            lines.push(format!(
                "급상승 «{}» {}→{}위 (+{})",
                r.title, prev, r.curr_rank, change
            ));
        }
    }

    lines.join("\n")
}

/// Inputs for the market-lens summary. All slices arrive pre-sorted/capped.
pub struct MarketSummaryData<'a> {
    pub rising: &'a [RankDelta],
    pub new_entries: &'a [RankDelta],
    pub multi_platform: &'a [CrossPlatformCluster],
    pub top1_works: &'a [TopOneWork],
}

/// Market summary: platform leaders, rising, new entries, multi-platform.
pub fn build_market_summary(d: &MarketSummaryData<'_>) -> String {
    let mut lines = Vec::new();

    // 1) Non-vendor platform leaders, up to 3
    let leaders: Vec<String> = d
        .top1_works
        .iter()
        .filter(|w| !w.is_vendor_work)
        .take(3)
        .map(|w| format!("«{}»({})", w.title, w.platform_name))
        .collect();
    if !leaders.is_empty() {
        lines.push(format!("각 플랫폼 1위: {}", leaders.join(", ")));
    }

    // 2) Biggest climber + how broad the climb was
    if let Some(r) = d.rising.first() {
        if let Some(change) = r.change {
            lines.push(format!(
                "최대 급상승 «{}»{} +{}계단 ({})",
                r.title,
                josa(&r.title, "이", "가"),
                change,
                r.platform_name
            ));
        }
        if d.rising.len() > 2 {
            lines.push(format!("5위 이상 상승 {}작품", d.rising.len()));
        }
    }

    // 3) New entries, highlighting anything landing straight in the top 3
    if !d.new_entries.is_empty() {
        if let Some(w) = d.new_entries.iter().find(|w| w.curr_rank <= 3) {
            lines.push(format!(
                "신규 주목 «{}» {} {}위 진입",
                w.title, w.platform_name, w.curr_rank
            ));
        }
        lines.push(format!("TOP 30 신규 {}작품", d.new_entries.len()));
    }

    // 4) Widest multi-platform cluster
    if let Some(m) = d.multi_platform.first() {
        debug_assert!(m.platform_count > 0, "cluster without members");
        lines.push(format!(
            "«{}»{} {}개 플랫폼 동시 랭크인",
            m.title,
            josa(&m.title, "은", "는"),
            m.platform_count
        ));
    }

    lines.join("\n")
}
