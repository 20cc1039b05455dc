//! Dataset loading.
//!
//! Reads the report sheets exported as CSV with fixed Korean column
//! headers. The player sheet is required; the score-gain sheet is
//! optional. Individual malformed cells degrade to their documented
//! defaults instead of failing the load — only a missing player file is
//! fatal for a render.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::models::{PlayerRecord, ScoreGain, Tier, TierChange};

/// Loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("report file not found: {path}")]
    Missing { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// One loaded snapshot: required player rows plus the optional
/// score-gain sheet (empty when that sheet is absent).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub players: Vec<PlayerRecord>,
    pub score_gains: Vec<ScoreGain>,
}

// Raw CSV serde structs (private). Everything is read as text first and
// converted with per-cell defaults, because the sheets are hand-edited.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(rename = "이름")]
    name: String,
    #[serde(rename = "현재 티어")]
    current_tier: String,
    #[serde(rename = "이전 티어", default)]
    previous_tier: String,
    #[serde(rename = "티어 변동", default)]
    tier_change: String,
    #[serde(rename = "티어 내 순위", default)]
    rank_within_tier: String,
    #[serde(rename = "총 전적", default)]
    total_matches: String,
    #[serde(rename = "클러치", default)]
    clutch: String,
    #[serde(rename = "표리부동", default)]
    duplicity: String,
    #[serde(rename = "동티어 상대", default)]
    same_tier: String,
    #[serde(rename = "상위 티어 상대", default)]
    higher_tier: String,
    #[serde(rename = "하위 티어 상대", default)]
    lower_tier: String,
    #[serde(rename = "비고", default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct RawScoreGainRow {
    #[serde(rename = "티어")]
    tier: String,
    #[serde(rename = "이름")]
    name: String,
    #[serde(rename = "획득 점수", default)]
    delta: String,
}

fn non_empty(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty() && t != "-").then_some(t)
}

impl RawPlayerRow {
    /// Convert to a [`PlayerRecord`]. `None` means the row is unusable
    /// (no parseable tier) and is skipped with a warning.
    fn into_record(self) -> Option<PlayerRecord> {
        let current_tier: Tier = match self.current_tier.parse() {
            Ok(t) => t,
            Err(_) => {
                warn!(
                    "skipping row for {:?}: unparseable tier {:?}",
                    self.name, self.current_tier
                );
                return None;
            }
        };

        Some(PlayerRecord {
            name: self.name.trim().to_string(),
            current_tier,
            previous_tier: non_empty(&self.previous_tier).and_then(|s| s.parse().ok()),
            tier_change: TierChange::from_label(&self.tier_change),
            rank_within_tier: non_empty(&self.rank_within_tier).and_then(|s| s.parse().ok()),
            total_matches: non_empty(&self.total_matches)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            clutch: non_empty(&self.clutch)
                .filter(|s| !s.eq_ignore_ascii_case("n/a"))
                .and_then(|s| s.parse().ok()),
            duplicity: non_empty(&self.duplicity)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0),
            same_tier: self.same_tier.trim().to_string(),
            higher_tier: self.higher_tier.trim().to_string(),
            lower_tier: self.lower_tier.trim().to_string(),
            status: non_empty(&self.status).map(String::from),
        })
    }
}

/// Load player rows from any reader (used directly by tests).
pub fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for row in reader.deserialize::<RawPlayerRow>() {
        if let Some(record) = row?.into_record() {
            players.push(record);
        }
    }
    Ok(players)
}

/// Load score-gain rows from any reader.
pub fn load_score_gains_from_reader<R: Read>(rdr: R) -> Result<Vec<ScoreGain>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut gains = Vec::new();
    for row in reader.deserialize::<RawScoreGainRow>() {
        let row = row?;
        let Ok(tier) = row.tier.parse::<Tier>() else {
            warn!("skipping score-gain row for {:?}: bad tier", row.name);
            continue;
        };
        gains.push(ScoreGain {
            tier,
            name: row.name.trim().to_string(),
            delta: non_empty(&row.delta)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0),
        });
    }
    Ok(gains)
}

/// Load the required player sheet. A missing file is the one fatal
/// failure of the pipeline.
pub fn load_players(path: &Path) -> Result<Vec<PlayerRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_players_from_reader(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the optional score-gain sheet; absence yields an empty list.
pub fn load_score_gains(path: &Path) -> Result<Vec<ScoreGain>, LoadError> {
    if !path.exists() {
        debug!("score-gain sheet absent: {}", path.display());
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_score_gains_from_reader(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a fresh snapshot. Called once per render; nothing is cached
/// between invocations.
pub fn load_dataset(data: &DataConfig) -> Result<Dataset, LoadError> {
    let players = load_players(&data.players_path)?;
    let score_gains = load_score_gains(&data.score_gains_path)?;
    debug!(
        players = players.len(),
        score_gains = score_gains.len(),
        "dataset loaded"
    );
    Ok(Dataset {
        players,
        score_gains,
    })
}
