//! Plain-text rendering for the `report` subcommand.

use std::fmt::Write;

use crate::aggregate::Direction;

use super::{format_metric, RenderModel};

/// Render the dashboard content as an aligned text report.
pub fn render_text(model: &RenderModel) -> String {
    let mut out = String::with_capacity(8 * 1024);

    out.push_str("=== 스타크래프트 여캠 티어 분석 로그 ===\n");
    if let Some(as_of) = model.as_of {
        let _ = writeln!(out, "데이터 기준일: {as_of}");
    }
    let _ = writeln!(out, "총 분석 인원: {} 명", model.total_players);
    for c in &model.classification_counts {
        let _ = writeln!(out, "  {}: {} 명", c.label, c.count);
    }

    out.push_str("\n[승급]\n");
    if model.promotions.is_empty() {
        out.push_str("  해당 없음\n");
    }
    for group in &model.promotions {
        let _ = writeln!(out, "  {}티어: {}", group.tier, group.names.join(", "));
    }
    out.push_str("[강등]\n");
    if model.demotions.is_empty() {
        out.push_str("  해당 없음\n");
    }
    for group in &model.demotions {
        let _ = writeln!(out, "  {}티어: {}", group.tier, group.names.join(", "));
    }

    out.push_str("\n[승률 기록]\n");
    for e in &model.extrema {
        let direction = match e.direction {
            Direction::Highest => "최고",
            Direction::Lowest => "최저",
        };
        match &e.result {
            Some(r) => {
                let _ = writeln!(
                    out,
                    "  {} {} ({}판 이상): {} [{}티어] {:.1}% ({}판)",
                    e.band_label, direction, e.min_games, r.name, r.tier, r.rate, r.games
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {} {} ({}판 이상): 해당 없음",
                    e.band_label, direction, e.min_games
                );
            }
        }
    }

    out.push_str("\n[리더보드]\n");
    for board in &model.leaderboards {
        let _ = writeln!(out, "  {}:", board.label);
        if board.entries.is_empty() {
            out.push_str("    해당 없음\n");
        }
        for (i, entry) in board.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {}. {} [{}티어] {}",
                i + 1,
                entry.name,
                entry.tier,
                format_metric(entry.value)
            );
        }
    }

    if !model.score_gains.is_empty() {
        out.push_str("\n[티어별 점수 획득 TOP]\n");
        for group in &model.score_gains {
            let _ = writeln!(out, "  {}티어:", group.tier);
            for entry in &group.entries {
                let _ = writeln!(out, "    {} +{:.1}", entry.name, entry.delta);
            }
        }
    }

    out.push_str("\n[티어별 인원 분포]\n");
    let dist = &model.distribution;
    for (ti, tier) in dist.tiers.iter().enumerate() {
        let _ = write!(out, "  {}티어 ({:2}명) ", tier, dist.tier_total(ti));
        for (ci, c) in dist.classifications.iter().enumerate() {
            let count = dist.counts[ti][ci];
            if count > 0 {
                let _ = write!(out, "{} {}  ", c.label_ko(), count);
            }
        }
        out.push('\n');
    }

    out
}
