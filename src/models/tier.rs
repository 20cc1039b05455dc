//! Tier labels and tier-change categories.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A tier label: a numeric level, optionally carrying the "special"
/// sub-tier flag (e.g. `3S` sits above plain `3` in display order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tier {
    pub level: u8,
    pub special: bool,
}

impl Tier {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            special: false,
        }
    }

    pub fn special(level: u8) -> Self {
        Self {
            level,
            special: true,
        }
    }
}

/// Error for unparseable tier labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tier label: {0:?}")]
pub struct TierParseError(pub String);

impl FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, special) = match trimmed.strip_suffix(['S', 's']) {
            Some(rest) => (rest.trim(), true),
            None => (trimmed, false),
        };
        let level: u8 = digits
            .parse()
            .map_err(|_| TierParseError(s.to_string()))?;
        Ok(Self { level, special })
    }
}

impl TryFrom<String> for Tier {
    type Error = TierParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Tier> for String {
    fn from(t: Tier) -> String {
        t.to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.special {
            write!(f, "{}S", self.level)
        } else {
            write!(f, "{}", self.level)
        }
    }
}

impl Ord for Tier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower level first; the special sub-tier sits above its base tier.
        self.level
            .cmp(&other.level)
            .then_with(|| other.special.cmp(&self.special))
    }
}

impl PartialOrd for Tier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tier movement recorded for a player between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierChange {
    None,
    Promoted,
    Demoted,
    Pending,
    Inactive,
}

impl TierChange {
    /// Parse the tier-change column label. Unknown labels fall back to
    /// `None` rather than failing the row.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "승급" | "promoted" | "up" => TierChange::Promoted,
            "강등" | "demoted" | "down" => TierChange::Demoted,
            "보류" | "pending" => TierChange::Pending,
            "잠수" | "inactive" => TierChange::Inactive,
            _ => TierChange::None,
        }
    }

    /// Korean display label, as shown on the dashboard.
    pub fn label_ko(&self) -> &'static str {
        match self {
            TierChange::None => "유지",
            TierChange::Promoted => "승급",
            TierChange::Demoted => "강등",
            TierChange::Pending => "보류",
            TierChange::Inactive => "잠수",
        }
    }
}
