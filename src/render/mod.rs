//! Presentation layer.
//!
//! [`build_render_model`] is a pure function from (snapshot, config) to
//! everything the page shows; `html` and `text` format that model. No
//! state survives between renders.

mod html;
mod text;

pub use html::render_html;
pub use text::render_text;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{
    band_extremum, count_by_classification, score_gain_groups, tier_change_groups,
    top_k_by_metric, Direction, ExtremumQuery, Metric, TierDistribution,
};
use crate::config::{AppConfig, ConfigError};
use crate::derive::{derive_all, sort_for_display};
use crate::load::Dataset;
use crate::models::{Band, Classification, DerivedRecord, TierChange};

/// One row of the ranking table, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub name: String,
    pub tier: String,
    pub previous_tier: Option<String>,
    pub tier_change: String,
    /// "-" is the unranked sentinel.
    pub rank: String,
    pub total_matches: u32,
    /// "N/A" when not applicable.
    pub clutch: String,
    pub duplicity: f64,
    pub same_tier: String,
    pub higher_tier: String,
    pub lower_tier: String,
    pub classification: Classification,
    pub notable: bool,
}

impl TableRow {
    fn from_derived(r: &DerivedRecord) -> Self {
        let rec = &r.record;
        Self {
            name: rec.name.clone(),
            tier: rec.current_tier.to_string(),
            previous_tier: rec.previous_tier.map(|t| t.to_string()),
            tier_change: rec.tier_change.label_ko().to_string(),
            rank: rec
                .rank_within_tier
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            total_matches: rec.total_matches,
            clutch: rec
                .clutch
                .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}")),
            duplicity: rec.duplicity,
            same_tier: rec.same_tier.clone(),
            higher_tier: rec.higher_tier.clone(),
            lower_tier: rec.lower_tier.clone(),
            classification: r.classification,
            notable: rec.is_notable(),
        }
    }
}

/// Count card for one classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationCount {
    pub classification: Classification,
    pub label: String,
    pub count: usize,
}

/// Promotion/demotion group for one destination tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierGroup {
    pub tier: String,
    pub names: Vec<String>,
}

/// The record an extremum query selected.
#[derive(Debug, Clone, Serialize)]
pub struct ExtremumResult {
    pub name: String,
    pub tier: String,
    pub rate: f64,
    pub games: u32,
}

/// One extremum callout. `result: None` renders as "해당 없음".
#[derive(Debug, Clone, Serialize)]
pub struct ExtremumEntry {
    pub band: Band,
    pub band_label: String,
    pub direction: Direction,
    pub min_games: u32,
    pub result: Option<ExtremumResult>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub tier: String,
    pub value: f64,
}

/// One top-k leaderboard section.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub metric: Metric,
    pub label: String,
    pub entries: Vec<LeaderboardEntry>,
}

/// Score-gain leaders for one tier.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreGainGroup {
    pub tier: String,
    pub entries: Vec<ScoreGainEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreGainEntry {
    pub name: String,
    pub delta: f64,
}

/// Everything the dashboard page shows, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub as_of: Option<NaiveDate>,
    pub total_players: usize,
    pub classification_counts: Vec<ClassificationCount>,
    pub rows: Vec<TableRow>,
    pub promotions: Vec<TierGroup>,
    pub demotions: Vec<TierGroup>,
    pub extrema: Vec<ExtremumEntry>,
    pub leaderboards: Vec<Leaderboard>,
    pub distribution: TierDistribution,
    pub score_gains: Vec<ScoreGainGroup>,
}

/// Integral metric values (match counts) print without a fraction;
/// everything else keeps two decimals.
pub(crate) fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn tier_groups(records: &[DerivedRecord], change: TierChange) -> Vec<TierGroup> {
    tier_change_groups(records, change)
        .into_iter()
        .map(|(tier, members)| TierGroup {
            tier: tier.to_string(),
            names: members.iter().map(|r| r.record.name.clone()).collect(),
        })
        .collect()
}

fn extremum_entry(records: &[DerivedRecord], query: ExtremumQuery) -> ExtremumEntry {
    let result = band_extremum(records, query).map(|r| {
        let stat = r.band_stat(query.band);
        ExtremumResult {
            name: r.record.name.clone(),
            tier: r.record.current_tier.to_string(),
            rate: stat.rate,
            games: stat.games,
        }
    });
    ExtremumEntry {
        band: query.band,
        band_label: query.band.label_ko().to_string(),
        direction: query.direction,
        min_games: query.min_games,
        result,
    }
}

/// Build the full render model from a freshly-loaded snapshot.
pub fn build_render_model(dataset: &Dataset, config: &AppConfig) -> Result<RenderModel, ConfigError> {
    let policy = config.classification.policy()?;
    let display_order = config.classification.display_order()?;
    let excluded_tiers = config.leaderboards.excluded_tiers()?;

    let mut derived = derive_all(&dataset.players, &policy);

    // Aggregates are computed over input order; only the table is
    // re-sorted for display afterwards.
    let counts = count_by_classification(&derived);
    let classification_counts = display_order
        .iter()
        .map(|c| ClassificationCount {
            classification: *c,
            label: c.label_ko().to_string(),
            count: counts.get(c).copied().unwrap_or(0),
        })
        .collect();

    let promotions = tier_groups(&derived, TierChange::Promoted);
    let demotions = tier_groups(&derived, TierChange::Demoted);

    let mut extrema = Vec::new();
    for band in Band::ALL {
        let min_games = match band {
            Band::SameTier => config.thresholds.same_tier_min_games,
            Band::HigherTier | Band::LowerTier => config.thresholds.cross_tier_min_games,
        };
        extrema.push(extremum_entry(
            &derived,
            ExtremumQuery {
                band,
                min_games,
                direction: Direction::Highest,
                prefer_fewest_games: false,
            },
        ));
        if config.extrema.include_lowest {
            extrema.push(extremum_entry(
                &derived,
                ExtremumQuery {
                    band,
                    min_games,
                    direction: Direction::Lowest,
                    prefer_fewest_games: config.extrema.lowest_prefers_fewest_games,
                },
            ));
        }
    }

    let leaderboards = [
        (Metric::TotalMatches, config.leaderboards.top_k_matches),
        (Metric::Clutch, config.leaderboards.top_k_metrics),
        (Metric::Duplicity, config.leaderboards.top_k_metrics),
    ]
    .into_iter()
    .map(|(metric, k)| Leaderboard {
        metric,
        label: metric.label_ko().to_string(),
        entries: top_k_by_metric(&derived, metric, k, &excluded_tiers)
            .into_iter()
            .filter_map(|r| {
                metric.value(r).map(|value| LeaderboardEntry {
                    name: r.record.name.clone(),
                    tier: r.record.current_tier.to_string(),
                    value,
                })
            })
            .collect(),
    })
    .collect();

    let distribution = TierDistribution::build(&derived, &display_order);

    let score_gains = score_gain_groups(&dataset.score_gains)
        .into_iter()
        .map(|(tier, entries)| ScoreGainGroup {
            tier: tier.to_string(),
            entries: entries
                .iter()
                .map(|g| ScoreGainEntry {
                    name: g.name.clone(),
                    delta: g.delta,
                })
                .collect(),
        })
        .collect();

    sort_for_display(&mut derived, &display_order);
    let rows = derived.iter().map(TableRow::from_derived).collect();

    Ok(RenderModel {
        as_of: config.data.as_of,
        total_players: dataset.players.len(),
        classification_counts,
        rows,
        promotions,
        demotions,
        extrema,
        leaderboards,
        distribution,
        score_gains,
    })
}
