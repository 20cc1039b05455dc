//! Raw and derived player records.

use serde::{Deserialize, Serialize};

use super::{Classification, Tier, TierChange};

/// Opponent grouping for win-rate metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    SameTier,
    HigherTier,
    LowerTier,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::SameTier, Band::HigherTier, Band::LowerTier];

    /// Korean display label.
    pub fn label_ko(&self) -> &'static str {
        match self {
            Band::SameTier => "동티어 상대",
            Band::HigherTier => "상위 티어 상대",
            Band::LowerTier => "하위 티어 상대",
        }
    }
}

/// Numeric win-rate stats extracted from one composite band field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandStat {
    /// Win rate in percent (e.g. 55.0 for "55.0%"). 0.0 when unparseable.
    pub rate: f64,
    /// Games played against the band. 0 when unparseable.
    pub games: u32,
}

/// One raw row of the source table. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub current_tier: Tier,
    pub previous_tier: Option<Tier>,
    pub tier_change: TierChange,
    /// `None` is the "unranked" sentinel.
    pub rank_within_tier: Option<u32>,
    pub total_matches: u32,
    /// `None` is the "not applicable" sentinel.
    pub clutch: Option<f64>,
    /// Consistency/variance metric ("표리부동" in the source table).
    pub duplicity: f64,
    /// Composite win-rate strings, e.g. `"55.0% (42판)"`.
    pub same_tier: String,
    pub higher_tier: String,
    pub lower_tier: String,
    /// Free-text status flag ("유망주", "주목").
    pub status: Option<String>,
}

impl PlayerRecord {
    /// The raw composite string for one band.
    pub fn band_raw(&self, band: Band) -> &str {
        match band {
            Band::SameTier => &self.same_tier,
            Band::HigherTier => &self.higher_tier,
            Band::LowerTier => &self.lower_tier,
        }
    }

    /// Whether the free-text status marks this player as a youth prospect.
    pub fn is_youth(&self) -> bool {
        self.status.as_deref().map(str::trim) == Some("유망주")
    }

    /// Whether the free-text status marks this player as notable.
    pub fn is_notable(&self) -> bool {
        self.status.as_deref().map(str::trim) == Some("주목")
    }
}

/// A raw record augmented with derived columns. Derivation is a pure
/// function of the raw row plus its input position; nothing is ever
/// written back to the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: PlayerRecord,
    /// Input position, used as the stable tie-break everywhere.
    pub index: usize,
    pub same_tier_stat: BandStat,
    pub higher_tier_stat: BandStat,
    pub lower_tier_stat: BandStat,
    pub classification: Classification,
}

impl DerivedRecord {
    pub fn band_stat(&self, band: Band) -> BandStat {
        match band {
            Band::SameTier => self.same_tier_stat,
            Band::HigherTier => self.higher_tier_stat,
            Band::LowerTier => self.lower_tier_stat,
        }
    }
}
