//! Team and series directory entries from the central data feed.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A team as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRef {
    pub id: String,
    pub name: String,
}

/// Teams found in the first configured tournament that had any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDirectory {
    pub tournament: Option<TournamentRef>,
    pub teams: Vec<TeamRef>,
}

/// A series a team took part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
    pub id: String,
    pub start_time_scheduled: Option<DateTime<Utc>>,
    pub tournament: Option<TournamentRef>,
    pub teams: Vec<TeamRef>,
}

impl SeriesRef {
    pub fn involves(&self, team_id: &str) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }
}

/// Strip the trailing numeric disambiguator GRID appends to some team
/// names, e.g. `"Cloud9 (1)"` becomes `"Cloud9"`.
pub fn clean_team_name(name: &str) -> String {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = SUFFIX.get_or_init(|| Regex::new(r"\s*\(\d+\)\s*$").expect("valid suffix regex"));
    re.replace(name, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_team_name() {
        assert_eq!(clean_team_name("Cloud9 (1)"), "Cloud9");
        assert_eq!(clean_team_name("  Sentinels "), "Sentinels");
        assert_eq!(clean_team_name("100 Thieves"), "100 Thieves");
        assert_eq!(clean_team_name("G2 Esports (23) "), "G2 Esports");
    }

    #[test]
    fn test_series_involves() {
        let series = SeriesRef {
            id: "s1".to_string(),
            start_time_scheduled: None,
            tournament: None,
            teams: vec![TeamRef {
                id: "79".to_string(),
                name: "Cloud9".to_string(),
                logo_url: None,
            }],
        };

        assert!(series.involves("79"));
        assert!(!series.involves("80"));
    }
}
