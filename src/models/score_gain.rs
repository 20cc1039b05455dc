//! Entries from the optional score-gain sheet.

use serde::{Deserialize, Serialize};

use super::Tier;

/// One row of the optional "top score gain" sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreGain {
    pub tier: Tier,
    pub name: String,
    pub delta: f64,
}
