//! Field derivation.
//!
//! Augments raw player rows with computed columns:
//! - numeric win rate and game count parsed out of the composite band strings
//! - an activity classification chosen by an ordered rule list
//! - a stable sort key for display ordering
//!
//! Derivation never mutates raw values; running it twice over the same
//! snapshot yields identical output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Band, BandStat, Classification, DerivedRecord, PlayerRecord, TierChange};

/// Extracts `(rate, games)` from a composite band field such as
/// `"55.0% (42판)"`.
///
/// The field is free text: the rate is the first number directly followed
/// by a percent sign, the game count is the first integer inside
/// parentheses. A missing piece yields its zero default; malformed input
/// is never an error. Zero defaults sort last/lowest, so they cannot win
/// an extremum or leaderboard slot.
pub struct CompositeParser {
    rate_re: Regex,
    games_re: Regex,
}

impl CompositeParser {
    pub fn new() -> Self {
        // Patterns are constants; construction cannot fail.
        Self {
            rate_re: Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap(),
            games_re: Regex::new(r"\([^\d)]*(\d+)").unwrap(),
        }
    }

    pub fn parse(&self, raw: &str) -> BandStat {
        let rate = self
            .rate_re
            .captures(raw)
            .and_then(|c| c[1].parse::<f64>().ok())
            .unwrap_or(0.0);
        let games = self
            .games_re
            .captures(raw)
            .and_then(|c| c[1].parse::<u32>().ok())
            .unwrap_or(0);
        BandStat { rate, games }
    }
}

impl Default for CompositeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of the classification policy. Each rule either claims the
/// record with a classification or passes it to the next rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationRule {
    /// `tier_change == inactive` → inactive.
    InactiveChange,
    /// youth status flag → youth.
    YouthStatus,
    /// unranked sentinel → pending.
    UnrankedPending,
    /// Always matches → active. Must terminate every policy.
    ActiveFallback,
}

impl ClassificationRule {
    pub fn name(&self) -> &'static str {
        match self {
            ClassificationRule::InactiveChange => "inactive_change",
            ClassificationRule::YouthStatus => "youth_status",
            ClassificationRule::UnrankedPending => "unranked_pending",
            ClassificationRule::ActiveFallback => "active_fallback",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inactive_change" => Some(ClassificationRule::InactiveChange),
            "youth_status" => Some(ClassificationRule::YouthStatus),
            "unranked_pending" => Some(ClassificationRule::UnrankedPending),
            "active_fallback" => Some(ClassificationRule::ActiveFallback),
            _ => None,
        }
    }

    fn apply(&self, record: &PlayerRecord) -> Option<Classification> {
        match self {
            ClassificationRule::InactiveChange => {
                (record.tier_change == TierChange::Inactive).then_some(Classification::Inactive)
            }
            ClassificationRule::YouthStatus => record.is_youth().then_some(Classification::Youth),
            ClassificationRule::UnrankedPending => {
                record.rank_within_tier.is_none().then_some(Classification::Pending)
            }
            ClassificationRule::ActiveFallback => Some(Classification::Active),
        }
    }
}

/// Policy construction errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown classification rule: {0:?}")]
    UnknownRule(String),

    #[error("classification policy must end with the active_fallback rule")]
    MissingFallback,
}

/// Ordered rule list evaluated top-down; the first matching rule wins.
///
/// The exact order (and whether the youth rule is present at all) has
/// changed across deployments, so it is data, not code: built from config
/// via [`ClassificationPolicy::from_rule_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    rules: Vec<ClassificationRule>,
}

impl ClassificationPolicy {
    /// The current default: inactive beats youth beats unranked.
    pub fn default_order() -> Self {
        Self {
            rules: vec![
                ClassificationRule::InactiveChange,
                ClassificationRule::YouthStatus,
                ClassificationRule::UnrankedPending,
                ClassificationRule::ActiveFallback,
            ],
        }
    }

    pub fn new(rules: Vec<ClassificationRule>) -> Result<Self, PolicyError> {
        if rules.last() != Some(&ClassificationRule::ActiveFallback) {
            return Err(PolicyError::MissingFallback);
        }
        Ok(Self { rules })
    }

    pub fn from_rule_names(names: &[String]) -> Result<Self, PolicyError> {
        let rules = names
            .iter()
            .map(|n| {
                ClassificationRule::from_name(n).ok_or_else(|| PolicyError::UnknownRule(n.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    pub fn classify(&self, record: &PlayerRecord) -> Classification {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(record))
            // new() guarantees the fallback rule is present
            .unwrap_or(Classification::Active)
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::default_order()
    }
}

/// Derive all computed columns for a snapshot, preserving input order.
pub fn derive_all(records: &[PlayerRecord], policy: &ClassificationPolicy) -> Vec<DerivedRecord> {
    let parser = CompositeParser::new();
    records
        .iter()
        .enumerate()
        .map(|(index, record)| DerivedRecord {
            index,
            same_tier_stat: parser.parse(record.band_raw(Band::SameTier)),
            higher_tier_stat: parser.parse(record.band_raw(Band::HigherTier)),
            lower_tier_stat: parser.parse(record.band_raw(Band::LowerTier)),
            classification: policy.classify(record),
            record: record.clone(),
        })
        .collect()
}

/// Display sort key: classification group (per the configured display
/// order), then tier (special sub-tier above its base), then input index.
/// Stable and total.
pub fn sort_key(record: &DerivedRecord, display_order: &[Classification]) -> (usize, u8, u8, usize) {
    let group = display_order
        .iter()
        .position(|c| *c == record.classification)
        .unwrap_or(display_order.len());
    let tier = record.record.current_tier;
    (
        group,
        tier.level,
        if tier.special { 0 } else { 1 },
        record.index,
    )
}

/// Sort a derived snapshot for display.
pub fn sort_for_display(records: &mut [DerivedRecord], display_order: &[Classification]) {
    records.sort_by_key(|r| sort_key(r, display_order));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Tier;

    fn record(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            current_tier: Tier::new(3),
            previous_tier: None,
            tier_change: TierChange::None,
            rank_within_tier: Some(1),
            total_matches: 50,
            clutch: Some(1.0),
            duplicity: 0.5,
            same_tier: "55.0% (42판)".to_string(),
            higher_tier: "30.0% (10판)".to_string(),
            lower_tier: String::new(),
            status: None,
        }
    }

    #[test]
    fn test_parse_well_formed() {
        let p = CompositeParser::new();
        assert_eq!(
            p.parse("55.0% (42판)"),
            BandStat {
                rate: 55.0,
                games: 42
            }
        );
        assert_eq!(
            p.parse("100% (3판)"),
            BandStat {
                rate: 100.0,
                games: 3
            }
        );
    }

    #[test]
    fn test_parse_english_games_suffix() {
        let p = CompositeParser::new();
        assert_eq!(
            p.parse("55.0% (42 games)"),
            BandStat {
                rate: 55.0,
                games: 42
            }
        );
    }

    #[test]
    fn test_parse_missing_parenthetical() {
        let p = CompositeParser::new();
        assert_eq!(
            p.parse("40.5%"),
            BandStat {
                rate: 40.5,
                games: 0
            }
        );
    }

    #[test]
    fn test_parse_missing_rate() {
        let p = CompositeParser::new();
        assert_eq!(
            p.parse("(12판)"),
            BandStat {
                rate: 0.0,
                games: 12
            }
        );
    }

    #[test]
    fn test_parse_malformed_is_zero_default() {
        let p = CompositeParser::new();
        assert_eq!(p.parse(""), BandStat::default());
        assert_eq!(p.parse("데이터 없음"), BandStat::default());
        assert_eq!(p.parse("-"), BandStat::default());
    }

    #[test]
    fn test_parse_surrounding_text() {
        let p = CompositeParser::new();
        assert_eq!(
            p.parse("최근 55.0% 기록 (42판, 상승세)"),
            BandStat {
                rate: 55.0,
                games: 42
            }
        );
    }

    #[test]
    fn test_classify_default_priority() {
        let policy = ClassificationPolicy::default_order();

        let mut r = record("a");
        r.tier_change = TierChange::Inactive;
        r.status = Some("유망주".to_string());
        // inactive wins over youth at default priority
        assert_eq!(policy.classify(&r), Classification::Inactive);

        let mut r = record("b");
        r.status = Some("유망주".to_string());
        assert_eq!(policy.classify(&r), Classification::Youth);

        let mut r = record("c");
        r.rank_within_tier = None;
        assert_eq!(policy.classify(&r), Classification::Pending);

        assert_eq!(policy.classify(&record("d")), Classification::Active);
    }

    #[test]
    fn test_classify_without_youth_rule() {
        // Earlier deployments had no youth rule at all.
        let policy = ClassificationPolicy::new(vec![
            ClassificationRule::InactiveChange,
            ClassificationRule::UnrankedPending,
            ClassificationRule::ActiveFallback,
        ])
        .unwrap();

        let mut r = record("a");
        r.status = Some("유망주".to_string());
        assert_eq!(policy.classify(&r), Classification::Active);
    }

    #[test]
    fn test_policy_requires_fallback() {
        let err = ClassificationPolicy::new(vec![ClassificationRule::InactiveChange]);
        assert!(matches!(err, Err(PolicyError::MissingFallback)));
    }

    #[test]
    fn test_policy_from_names() {
        let policy = ClassificationPolicy::from_rule_names(&[
            "inactive_change".to_string(),
            "unranked_pending".to_string(),
            "youth_status".to_string(),
            "active_fallback".to_string(),
        ])
        .unwrap();

        // Youth rule moved below unranked: an unranked youth is pending.
        let mut r = record("a");
        r.rank_within_tier = None;
        r.status = Some("유망주".to_string());
        assert_eq!(policy.classify(&r), Classification::Pending);

        let err = ClassificationPolicy::from_rule_names(&["retired".to_string()]);
        assert!(matches!(err, Err(PolicyError::UnknownRule(_))));
    }

    #[test]
    fn test_derive_all_is_pure() {
        let records = vec![record("a"), record("b")];
        let policy = ClassificationPolicy::default_order();

        let first = derive_all(&records, &policy);
        let second = derive_all(&records, &policy);
        assert_eq!(first, second);

        // Raw rows untouched
        assert_eq!(records[0].same_tier, "55.0% (42판)");
        assert_eq!(first[0].same_tier_stat.rate, 55.0);
        assert_eq!(first[0].same_tier_stat.games, 42);
        assert_eq!(first[1].index, 1);
    }

    #[test]
    fn test_sort_groups_then_tier_then_index() {
        let policy = ClassificationPolicy::default_order();

        let mut inactive = record("inactive");
        inactive.tier_change = TierChange::Inactive;
        let mut special = record("special");
        special.current_tier = Tier::special(3);
        let mut low_tier = record("low");
        low_tier.current_tier = Tier::new(1);

        let mut derived = derive_all(&[inactive, record("base"), special, low_tier], &policy);
        sort_for_display(&mut derived, &Classification::ALL);

        let names: Vec<&str> = derived.iter().map(|r| r.record.name.as_str()).collect();
        // Actives first (tier 1, then 3S above 3), inactive group last.
        assert_eq!(names, vec!["low", "special", "base", "inactive"]);
    }
}
