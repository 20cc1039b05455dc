//! Aggregate queries over the derived table.
//!
//! Every query here is a pure read-only scan. All of them are total: an
//! empty or fully-filtered-out subset yields an empty collection or
//! `None`, never a panic — the presenter renders absence as "해당 없음".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Band, Classification, DerivedRecord, ScoreGain, Tier, TierChange};

/// Count of records per classification. Sums to the total record count.
pub fn count_by_classification(records: &[DerivedRecord]) -> HashMap<Classification, usize> {
    let mut counts = HashMap::new();
    for r in records {
        *counts.entry(r.classification).or_insert(0) += 1;
    }
    counts
}

/// Zero-filled (tier × classification) population matrix, the input for
/// the stacked per-tier bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    /// Tiers present in the snapshot, ascending.
    pub tiers: Vec<Tier>,
    /// Classification columns, in display order.
    pub classifications: Vec<Classification>,
    /// `counts[tier_idx][classification_idx]`, zero-filled.
    pub counts: Vec<Vec<usize>>,
}

impl TierDistribution {
    pub fn build(records: &[DerivedRecord], display_order: &[Classification]) -> Self {
        let mut tiers: Vec<Tier> = records.iter().map(|r| r.record.current_tier).collect();
        tiers.sort();
        tiers.dedup();

        let classifications = display_order.to_vec();
        let mut counts = vec![vec![0usize; classifications.len()]; tiers.len()];
        for r in records {
            let ti = tiers
                .iter()
                .position(|t| *t == r.record.current_tier)
                .unwrap_or(0);
            if let Some(ci) = classifications.iter().position(|c| *c == r.classification) {
                counts[ti][ci] += 1;
            }
        }

        Self {
            tiers,
            classifications,
            counts,
        }
    }

    /// Total population of one tier row.
    pub fn tier_total(&self, tier_idx: usize) -> usize {
        self.counts.get(tier_idx).map_or(0, |row| row.iter().sum())
    }

    /// Largest tier population, for chart scaling.
    pub fn max_tier_total(&self) -> usize {
        (0..self.tiers.len())
            .map(|i| self.tier_total(i))
            .max()
            .unwrap_or(0)
    }
}

/// Whether an extremum query looks for the best or the worst win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Highest,
    Lowest,
}

/// Extremum query over one opponent band.
#[derive(Debug, Clone, Copy)]
pub struct ExtremumQuery {
    pub band: Band,
    /// Records below this game count do not qualify.
    pub min_games: u32,
    pub direction: Direction,
    /// Tie-break for `Lowest`: prefer the record with fewer games over
    /// plain input order. Deployments have used both.
    pub prefer_fewest_games: bool,
}

/// The extremal active record for a band, or `None` when nothing
/// qualifies. Ties go to the first occurrence in input order unless the
/// query's lowest-tie-break says otherwise.
pub fn band_extremum<'a>(
    records: &'a [DerivedRecord],
    query: ExtremumQuery,
) -> Option<&'a DerivedRecord> {
    let mut best: Option<&DerivedRecord> = None;
    for r in records {
        if r.classification != Classification::Active {
            continue;
        }
        let stat = r.band_stat(query.band);
        if stat.games < query.min_games {
            continue;
        }
        let Some(b) = best else {
            best = Some(r);
            continue;
        };
        let best_stat = b.band_stat(query.band);
        let replace = match query.direction {
            Direction::Highest => stat.rate > best_stat.rate,
            Direction::Lowest => {
                stat.rate < best_stat.rate
                    || (query.prefer_fewest_games
                        && stat.rate == best_stat.rate
                        && stat.games < best_stat.games)
            }
        };
        if replace {
            best = Some(r);
        }
    }
    best
}

/// Scalar metric for leaderboard queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalMatches,
    Clutch,
    Duplicity,
}

impl Metric {
    /// Korean display label.
    pub fn label_ko(&self) -> &'static str {
        match self {
            Metric::TotalMatches => "총 전적",
            Metric::Clutch => "클러치",
            Metric::Duplicity => "표리부동",
        }
    }

    /// The metric value, or `None` for the "not applicable" sentinel.
    pub fn value(&self, record: &DerivedRecord) -> Option<f64> {
        match self {
            Metric::TotalMatches => Some(record.record.total_matches as f64),
            Metric::Clutch => record.record.clutch,
            Metric::Duplicity => Some(record.record.duplicity),
        }
    }
}

/// Top-k active records by a metric, descending, stable on input order.
///
/// Records in `excluded_tiers` are skipped (some tiers are not meaningful
/// for some metrics — which ones is a config decision). Records whose
/// metric is the N/A sentinel are skipped. `k` larger than the qualifying
/// subset returns the whole subset without padding.
pub fn top_k_by_metric<'a>(
    records: &'a [DerivedRecord],
    metric: Metric,
    k: usize,
    excluded_tiers: &[Tier],
) -> Vec<&'a DerivedRecord> {
    let mut qualifying: Vec<(&DerivedRecord, f64)> = records
        .iter()
        .filter(|r| r.classification == Classification::Active)
        .filter(|r| !excluded_tiers.contains(&r.record.current_tier))
        .filter_map(|r| metric.value(r).map(|v| (r, v)))
        .collect();

    // Stable sort keeps input order among equal values.
    qualifying.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    qualifying.truncate(k);
    qualifying.into_iter().map(|(r, _)| r).collect()
}

/// Promoted (or demoted) records grouped by destination tier, tiers
/// ascending, input order preserved within each group.
pub fn tier_change_groups(
    records: &[DerivedRecord],
    change: TierChange,
) -> Vec<(Tier, Vec<&DerivedRecord>)> {
    let mut groups: Vec<(Tier, Vec<&DerivedRecord>)> = Vec::new();
    for r in records {
        if r.record.tier_change != change {
            continue;
        }
        let tier = r.record.current_tier;
        match groups.iter_mut().find(|(t, _)| *t == tier) {
            Some((_, members)) => members.push(r),
            None => groups.push((tier, vec![r])),
        }
    }
    groups.sort_by_key(|(t, _)| *t);
    groups
}

/// Score-gain entries grouped by tier, ascending, sheet order preserved.
pub fn score_gain_groups(gains: &[ScoreGain]) -> Vec<(Tier, Vec<&ScoreGain>)> {
    let mut groups: Vec<(Tier, Vec<&ScoreGain>)> = Vec::new();
    for g in gains {
        match groups.iter_mut().find(|(t, _)| *t == g.tier) {
            Some((_, members)) => members.push(g),
            None => groups.push((g.tier, vec![g])),
        }
    }
    groups.sort_by_key(|(t, _)| *t);
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::derive::{derive_all, ClassificationPolicy};
    use crate::models::PlayerRecord;

    fn record(name: &str, tier: Tier, same_tier: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            current_tier: tier,
            previous_tier: None,
            tier_change: TierChange::None,
            rank_within_tier: Some(1),
            total_matches: 50,
            clutch: Some(1.0),
            duplicity: 0.5,
            same_tier: same_tier.to_string(),
            higher_tier: String::new(),
            lower_tier: String::new(),
            status: None,
        }
    }

    fn derive(records: Vec<PlayerRecord>) -> Vec<DerivedRecord> {
        derive_all(&records, &ClassificationPolicy::default_order())
    }

    #[test]
    fn test_counts_sum_to_total() {
        let mut inactive = record("c", Tier::new(3), "");
        inactive.tier_change = TierChange::Inactive;
        let mut pending = record("d", Tier::new(4), "");
        pending.rank_within_tier = None;

        let derived = derive(vec![
            record("a", Tier::new(1), ""),
            record("b", Tier::new(2), ""),
            inactive,
            pending,
        ]);
        let counts = count_by_classification(&derived);

        assert_eq!(counts.values().sum::<usize>(), derived.len());
        assert_eq!(counts[&Classification::Active], 2);
        assert_eq!(counts[&Classification::Inactive], 1);
        assert_eq!(counts[&Classification::Pending], 1);
    }

    #[test]
    fn test_tier_distribution_zero_filled() {
        let mut pending = record("b", Tier::new(2), "");
        pending.rank_within_tier = None;

        let derived = derive(vec![
            record("a", Tier::new(2), ""),
            pending,
            record("c", Tier::new(1), ""),
        ]);
        let dist = TierDistribution::build(&derived, &Classification::ALL);

        assert_eq!(dist.tiers, vec![Tier::new(1), Tier::new(2)]);
        // tier 1: one active, nothing else
        assert_eq!(dist.counts[0], vec![1, 0, 0, 0]);
        // tier 2: one active, one pending
        assert_eq!(dist.counts[1], vec![1, 1, 0, 0]);
        assert_eq!(dist.tier_total(1), 2);
        assert_eq!(dist.max_tier_total(), 2);
    }

    #[test]
    fn test_tier_distribution_empty() {
        let dist = TierDistribution::build(&[], &Classification::ALL);
        assert!(dist.tiers.is_empty());
        assert_eq!(dist.max_tier_total(), 0);
    }

    #[test]
    fn test_extremum_threshold() {
        let derived = derive(vec![
            record("A", Tier::new(3), "55.0% (42판)"),
            record("B", Tier::new(3), "30.0% (10판)"),
        ]);
        let best = band_extremum(
            &derived,
            ExtremumQuery {
                band: Band::SameTier,
                min_games: 40,
                direction: Direction::Highest,
                prefer_fewest_games: false,
            },
        )
        .unwrap();

        // Only A clears the 40-game threshold.
        assert_eq!(best.record.name, "A");
        assert_eq!(best.same_tier_stat.rate, 55.0);
    }

    #[test]
    fn test_extremum_empty_subset_is_none() {
        let derived = derive(vec![record("A", Tier::new(3), "55.0% (5판)")]);
        let result = band_extremum(
            &derived,
            ExtremumQuery {
                band: Band::SameTier,
                min_games: 40,
                direction: Direction::Highest,
                prefer_fewest_games: false,
            },
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_extremum_ignores_non_active() {
        let mut inactive = record("A", Tier::new(3), "90.0% (50판)");
        inactive.tier_change = TierChange::Inactive;
        let derived = derive(vec![inactive, record("B", Tier::new(3), "60.0% (50판)")]);

        let best = band_extremum(
            &derived,
            ExtremumQuery {
                band: Band::SameTier,
                min_games: 40,
                direction: Direction::Highest,
                prefer_fewest_games: false,
            },
        )
        .unwrap();
        assert_eq!(best.record.name, "B");
    }

    #[test]
    fn test_extremum_tie_first_occurrence_wins() {
        let derived = derive(vec![
            record("first", Tier::new(3), "60.0% (50판)"),
            record("second", Tier::new(3), "60.0% (45판)"),
        ]);
        let best = band_extremum(
            &derived,
            ExtremumQuery {
                band: Band::SameTier,
                min_games: 40,
                direction: Direction::Highest,
                prefer_fewest_games: false,
            },
        )
        .unwrap();
        assert_eq!(best.record.name, "first");
    }

    #[test]
    fn test_extremum_lowest_tie_break_configurable() {
        let derived = derive(vec![
            record("more_games", Tier::new(3), "40.0% (60판)"),
            record("fewer_games", Tier::new(3), "40.0% (45판)"),
        ]);

        let query = ExtremumQuery {
            band: Band::SameTier,
            min_games: 40,
            direction: Direction::Lowest,
            prefer_fewest_games: false,
        };
        assert_eq!(
            band_extremum(&derived, query).unwrap().record.name,
            "more_games"
        );

        let query = ExtremumQuery {
            prefer_fewest_games: true,
            ..query
        };
        assert_eq!(
            band_extremum(&derived, query).unwrap().record.name,
            "fewer_games"
        );
    }

    #[test]
    fn test_top_k_orders_and_truncates() {
        let mut a = record("a", Tier::new(3), "");
        a.total_matches = 10;
        let mut b = record("b", Tier::new(3), "");
        b.total_matches = 30;
        let mut c = record("c", Tier::new(3), "");
        c.total_matches = 20;

        let derived = derive(vec![a, b, c]);
        let top = top_k_by_metric(&derived, Metric::TotalMatches, 2, &[]);
        let names: Vec<&str> = top.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_top_k_larger_than_subset() {
        let derived = derive(vec![record("only", Tier::new(3), "")]);
        let top = top_k_by_metric(&derived, Metric::TotalMatches, 5, &[]);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_top_k_excludes_tiers_and_na_metric() {
        let mut no_clutch = record("na", Tier::new(3), "");
        no_clutch.clutch = None;
        let excluded = record("excluded", Tier::new(7), "");
        let mut kept = record("kept", Tier::new(3), "");
        kept.clutch = Some(2.0);

        let derived = derive(vec![no_clutch, excluded, kept]);
        let top = top_k_by_metric(&derived, Metric::Clutch, 5, &[Tier::new(7)]);
        let names: Vec<&str> = top.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["kept"]);
    }

    #[test]
    fn test_top_k_stable_on_ties() {
        let derived = derive(vec![
            record("first", Tier::new(3), ""),
            record("second", Tier::new(3), ""),
        ]);
        let top = top_k_by_metric(&derived, Metric::TotalMatches, 2, &[]);
        let names: Vec<&str> = top.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_tier_change_groups() {
        let mut p1 = record("p1", Tier::new(2), "");
        p1.tier_change = TierChange::Promoted;
        p1.previous_tier = Some(Tier::new(3));
        let mut p2 = record("p2", Tier::new(4), "");
        p2.tier_change = TierChange::Promoted;
        let mut p3 = record("p3", Tier::new(2), "");
        p3.tier_change = TierChange::Promoted;
        let mut d1 = record("d1", Tier::new(5), "");
        d1.tier_change = TierChange::Demoted;

        let derived = derive(vec![p1, p2, p3, d1, record("rest", Tier::new(1), "")]);
        let promoted = tier_change_groups(&derived, TierChange::Promoted);

        assert_eq!(promoted.len(), 2);
        assert_eq!(promoted[0].0, Tier::new(2));
        let names: Vec<&str> = promoted[0].1.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p3"]);
        assert_eq!(promoted[1].0, Tier::new(4));

        let demoted = tier_change_groups(&derived, TierChange::Demoted);
        assert_eq!(demoted.len(), 1);
        assert_eq!(demoted[0].1[0].record.name, "d1");
    }

    #[test]
    fn test_score_gain_groups() {
        let gains = vec![
            ScoreGain {
                tier: Tier::new(3),
                name: "a".to_string(),
                delta: 12.0,
            },
            ScoreGain {
                tier: Tier::new(1),
                name: "b".to_string(),
                delta: 8.0,
            },
            ScoreGain {
                tier: Tier::new(3),
                name: "c".to_string(),
                delta: 5.0,
            },
        ];
        let groups = score_gain_groups(&gains);
        assert_eq!(groups[0].0, Tier::new(1));
        assert_eq!(groups[1].0, Tier::new(3));
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].name, "a");
    }
}
