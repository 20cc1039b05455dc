//! Player classification derived from raw row fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity classification for a player, derived by the classification
/// policy (see `derive::ClassificationPolicy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Active,
    Pending,
    Inactive,
    Youth,
}

impl Classification {
    /// All classifications, in the default display order.
    pub const ALL: [Classification; 4] = [
        Classification::Active,
        Classification::Pending,
        Classification::Inactive,
        Classification::Youth,
    ];

    /// Korean display label.
    pub fn label_ko(&self) -> &'static str {
        match self {
            Classification::Active => "활동",
            Classification::Pending => "보류",
            Classification::Inactive => "잠수",
            Classification::Youth => "유망주",
        }
    }

    /// Stable machine name, used in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Active => "active",
            Classification::Pending => "pending",
            Classification::Inactive => "inactive",
            Classification::Youth => "youth",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "active" => Some(Classification::Active),
            "pending" => Some(Classification::Pending),
            "inactive" => Some(Classification::Inactive),
            "youth" => Some(Classification::Youth),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for c in Classification::ALL {
            assert_eq!(Classification::from_name(c.name()), Some(c));
        }
        assert_eq!(Classification::from_name("retired"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Classification::Active.label_ko(), "활동");
        assert_eq!(Classification::Youth.label_ko(), "유망주");
    }
}
