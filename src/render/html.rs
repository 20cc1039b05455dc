//! Static HTML rendering of the dashboard page.

use std::fmt::Write;

use crate::aggregate::Direction;
use crate::models::Classification;

use super::{format_metric, RenderModel};

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn row_class(classification: Classification, notable: bool) -> &'static str {
    if notable {
        return "row-notable";
    }
    match classification {
        Classification::Active => "row-active",
        Classification::Pending => "row-pending",
        Classification::Inactive => "row-inactive",
        Classification::Youth => "row-youth",
    }
}

fn chart_color(classification: Classification) -> &'static str {
    match classification {
        Classification::Active => "#4c9f70",
        Classification::Pending => "#d9a441",
        Classification::Inactive => "#8a8f98",
        Classification::Youth => "#5b8dd9",
    }
}

const STYLE: &str = r#"
body { font-family: 'Malgun Gothic', sans-serif; margin: 2rem; background: #f7f7f9; color: #222; }
h1 { margin-bottom: 0.2rem; }
.caption { color: #666; margin-bottom: 1.5rem; }
.cards { display: flex; gap: 1rem; margin: 1rem 0; }
.card { background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 0.8rem 1.4rem; }
.card .num { font-size: 1.6rem; font-weight: bold; }
table { border-collapse: collapse; background: #fff; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #ddd; padding: 0.4rem 0.7rem; text-align: center; }
th { background: #eceef1; }
.row-active { background: #f2faf5; }
.row-pending { background: #fdf6e7; }
.row-inactive { background: #f0f0f0; color: #888; }
.row-youth { background: #eef4fd; }
.row-notable { background: #fdeef0; }
.section { background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 1rem 1.4rem; margin: 1rem 0; }
.na { color: #999; }
.bar { display: flex; height: 22px; margin: 2px 0; }
.bar span { display: block; height: 100%; }
.bar-label { display: inline-block; width: 3rem; }
.legend span { display: inline-block; margin-right: 1rem; }
.legend i { display: inline-block; width: 10px; height: 10px; margin-right: 4px; }
"#;

/// Render the full dashboard page.
pub fn render_html(model: &RenderModel) -> String {
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>티어 분석 로그</title>\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str("<h1>⭐ 스타크래프트 여캠 티어 분석 로그</h1>\n");
    if let Some(as_of) = model.as_of {
        let _ = writeln!(out, "<p class=\"caption\">데이터 기준일: {as_of}</p>");
    }

    // Summary cards
    out.push_str("<div class=\"cards\">\n");
    let _ = writeln!(
        out,
        "<div class=\"card\"><div class=\"num\">{} 명</div>총 분석 인원</div>",
        model.total_players
    );
    for c in &model.classification_counts {
        let _ = writeln!(
            out,
            "<div class=\"card\"><div class=\"num\">{} 명</div>{}</div>",
            c.count,
            escape(&c.label)
        );
    }
    out.push_str("</div>\n");

    // Promotion / demotion groups
    out.push_str("<div class=\"section\">\n<h2>승급 / 강등</h2>\n");
    render_tier_groups(&mut out, "승급", &model.promotions);
    render_tier_groups(&mut out, "강등", &model.demotions);
    out.push_str("</div>\n");

    // Extremum callouts
    out.push_str("<div class=\"section\">\n<h2>승률 기록</h2>\n<ul>\n");
    for e in &model.extrema {
        let direction = match e.direction {
            Direction::Highest => "최고",
            Direction::Lowest => "최저",
        };
        match &e.result {
            Some(r) => {
                let _ = writeln!(
                    out,
                    "<li>{} {} 승률 ({}판 이상): <b>{}</b> [{}티어] — {:.1}% ({}판)</li>",
                    escape(&e.band_label),
                    direction,
                    e.min_games,
                    escape(&r.name),
                    escape(&r.tier),
                    r.rate,
                    r.games
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "<li>{} {} 승률 ({}판 이상): <span class=\"na\">해당 없음</span></li>",
                    escape(&e.band_label),
                    direction,
                    e.min_games
                );
            }
        }
    }
    out.push_str("</ul>\n</div>\n");

    // Leaderboards
    out.push_str("<div class=\"section\">\n<h2>리더보드</h2>\n");
    for board in &model.leaderboards {
        let _ = writeln!(out, "<h3>{} TOP {}</h3>", escape(&board.label), board.entries.len());
        if board.entries.is_empty() {
            out.push_str("<p class=\"na\">해당 없음</p>\n");
            continue;
        }
        out.push_str("<ol>\n");
        for entry in &board.entries {
            let _ = writeln!(
                out,
                "<li>{} [{}티어] — {}</li>",
                escape(&entry.name),
                escape(&entry.tier),
                format_metric(entry.value)
            );
        }
        out.push_str("</ol>\n");
    }
    out.push_str("</div>\n");

    // Score gains (optional sheet; silently empty when absent)
    if !model.score_gains.is_empty() {
        out.push_str("<div class=\"section\">\n<h2>티어별 점수 획득 TOP</h2>\n");
        for group in &model.score_gains {
            let _ = writeln!(out, "<h3>{}티어</h3>\n<ul>", escape(&group.tier));
            for entry in &group.entries {
                let _ = writeln!(
                    out,
                    "<li>{} — +{:.1}</li>",
                    escape(&entry.name),
                    entry.delta
                );
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</div>\n");
    }

    // Stacked per-tier population chart
    out.push_str("<div class=\"section\">\n<h2>티어별 인원 분포</h2>\n");
    render_distribution(&mut out, model);
    out.push_str("</div>\n");

    // Full ranking table
    out.push_str("<div class=\"section\">\n<h2>종합 리포트</h2>\n<table>\n<tr>");
    for header in [
        "이름",
        "현재 티어",
        "이전 티어",
        "티어 변동",
        "티어 내 순위",
        "총 전적",
        "클러치",
        "표리부동",
        "동티어 상대",
        "상위 티어 상대",
        "하위 티어 상대",
    ] {
        let _ = write!(out, "<th>{header}</th>");
    }
    out.push_str("</tr>\n");
    for row in &model.rows {
        let _ = writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row_class(row.classification, row.notable),
            escape(&row.name),
            escape(&row.tier),
            row.previous_tier.as_deref().map(escape).unwrap_or_else(|| "-".to_string()),
            escape(&row.tier_change),
            row.rank,
            row.total_matches,
            escape(&row.clutch),
            row.duplicity,
            escape(&row.same_tier),
            escape(&row.higher_tier),
            escape(&row.lower_tier),
        );
    }
    out.push_str("</table>\n</div>\n");

    out.push_str("</body>\n</html>\n");
    out
}

fn render_tier_groups(out: &mut String, title: &str, groups: &[super::TierGroup]) {
    let _ = writeln!(out, "<h3>{title}</h3>");
    if groups.is_empty() {
        out.push_str("<p class=\"na\">해당 없음</p>\n");
        return;
    }
    out.push_str("<ul>\n");
    for group in groups {
        let _ = writeln!(
            out,
            "<li>{}티어: {}</li>",
            escape(&group.tier),
            group
                .names
                .iter()
                .map(|n| escape(n))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    out.push_str("</ul>\n");
}

fn render_distribution(out: &mut String, model: &RenderModel) {
    let dist = &model.distribution;
    let max_total = dist.max_tier_total();
    if max_total == 0 {
        out.push_str("<p class=\"na\">해당 없음</p>\n");
        return;
    }

    out.push_str("<div class=\"legend\">");
    for c in &dist.classifications {
        let _ = write!(
            out,
            "<span><i style=\"background:{}\"></i>{}</span>",
            chart_color(*c),
            c.label_ko()
        );
    }
    out.push_str("</div>\n");

    for (ti, tier) in dist.tiers.iter().enumerate() {
        let _ = write!(out, "<div><span class=\"bar-label\">{tier}티어</span>");
        out.push_str("<div class=\"bar\" style=\"display:inline-flex; width: 80%\">");
        for (ci, c) in dist.classifications.iter().enumerate() {
            let count = dist.counts[ti][ci];
            if count == 0 {
                continue;
            }
            let width = count as f64 / max_total as f64 * 100.0;
            let _ = write!(
                out,
                "<span style=\"width:{width:.1}%;background:{}\" title=\"{} {}\"></span>",
                chart_color(*c),
                c.label_ko(),
                count
            );
        }
        out.push_str("</div></div>\n");
    }
}
