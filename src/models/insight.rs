//! Scouting findings produced by the insight rules.

use serde::{Deserialize, Serialize};

/// Stable key identifying which rule produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightCategory {
    Side,
    FirstBloodChoke,
    Pistol,
    Economy,
    MapTarget,
    MapBan,
    Tilt,
    PlayerTarget,
    OneTrick,
    Playstyle,
    /// Fallback when nothing else fired
    General,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Side => "side",
            InsightCategory::FirstBloodChoke => "first-blood-choke",
            InsightCategory::Pistol => "pistol",
            InsightCategory::Economy => "economy",
            InsightCategory::MapTarget => "map-target",
            InsightCategory::MapBan => "map-ban",
            InsightCategory::Tilt => "tilt",
            InsightCategory::PlayerTarget => "player-target",
            InsightCategory::OneTrick => "one-trick",
            InsightCategory::Playstyle => "playstyle",
            InsightCategory::General => "general",
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A natural-language scouting bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub text: String,
}

impl Insight {
    pub fn new(category: InsightCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}
