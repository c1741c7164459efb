//! Normalized per-game and per-round records.
//!
//! Every analyzer in [`crate::calculate`] consumes these shapes. They are
//! produced by [`crate::normalize`] from raw GRID payloads, or loaded
//! directly from JSON for offline analysis.

use serde::{Deserialize, Serialize};

/// Agent name used when the upstream character field is absent.
pub const UNKNOWN_AGENT: &str = "unknown";

/// Side a team played in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
    #[default]
    Unknown,
}

impl Side {
    /// Parse the upstream side string. Anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "attacker" | "attack" | "attackers" => Side::Attacker,
            "defender" | "defense" | "defence" | "defenders" => Side::Defender,
            _ => Side::Unknown,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Attacker => write!(f, "attacker"),
            Side::Defender => write!(f, "defender"),
            Side::Unknown => write!(f, "unknown"),
        }
    }
}

/// A player's agent and map totals for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAgent {
    pub id: String,
    pub name: String,
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
}

fn default_agent() -> String {
    UNKNOWN_AGENT.to_string()
}

/// One player's line for a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundStat {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub first_kill: bool,
}

/// One round within a game, from the scouted team's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    /// 1-based round number
    pub round_num: u32,
    #[serde(default)]
    pub side: Side,
    pub won: bool,
    #[serde(default)]
    pub players: Vec<PlayerRoundStat>,
    #[serde(default)]
    pub opp_players: Vec<PlayerRoundStat>,
}

impl RoundRecord {
    /// Whether any scouted player took the first kill of the round.
    pub fn team_first_kill(&self) -> bool {
        self.players.iter().any(|p| p.first_kill)
    }

    /// Whether any opponent took the first kill of the round.
    pub fn opp_first_kill(&self) -> bool {
        self.opp_players.iter().any(|p| p.first_kill)
    }

    pub fn team_deaths(&self) -> u32 {
        self.players.iter().map(|p| p.deaths).sum()
    }

    pub fn opp_deaths(&self) -> u32 {
        self.opp_players.iter().map(|p| p.deaths).sum()
    }
}

/// One finished map within a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub map: String,
    pub won: bool,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub opponent_score: u32,
    #[serde(default)]
    pub agents: Vec<PlayerAgent>,
    #[serde(default)]
    pub opponent_agents: Vec<PlayerAgent>,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
}

impl GameRecord {
    /// Agent played by `player_id` on this map, or [`UNKNOWN_AGENT`].
    pub fn agent_for(&self, player_id: &str) -> &str {
        self.agents
            .iter()
            .find(|a| a.id == player_id)
            .map(|a| a.agent.as_str())
            .unwrap_or(UNKNOWN_AGENT)
    }

    /// Whether the game carries per-player kill or death totals.
    pub fn has_player_totals(&self) -> bool {
        self.agents.iter().any(|a| a.kills > 0 || a.deaths > 0)
    }

    /// Rounds sorted by round number. Input order is not trusted.
    pub fn rounds_in_order(&self) -> Vec<&RoundRecord> {
        let mut rounds: Vec<&RoundRecord> = self.rounds.iter().collect();
        rounds.sort_by_key(|r| r.round_num);
        rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("attacker"), Side::Attacker);
        assert_eq!(Side::parse("Defender"), Side::Defender);
        assert_eq!(Side::parse(""), Side::Unknown);
        assert_eq!(Side::parse("spectator"), Side::Unknown);
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Attacker).unwrap(), "\"attacker\"");
        let side: Side = serde_json::from_str("\"defender\"").unwrap();
        assert_eq!(side, Side::Defender);
    }

    #[test]
    fn test_player_agent_defaults_to_unknown() {
        let agent: PlayerAgent = serde_json::from_str(r#"{"id":"1","name":"zeek"}"#).unwrap();
        assert_eq!(agent.agent, UNKNOWN_AGENT);
    }

    #[test]
    fn test_game_record_camel_case() {
        let json = r#"{
            "map": "Ascent",
            "won": true,
            "score": 13,
            "opponentScore": 7,
            "rounds": [
                {"roundNum": 2, "side": "attacker", "won": false},
                {"roundNum": 1, "side": "attacker", "won": true,
                 "players": [{"id":"1","name":"a","kills":1,"deaths":0,"firstKill":true}]}
            ]
        }"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();

        assert_eq!(game.opponent_score, 7);
        assert!(game.rounds[1].team_first_kill());
        let ordered = game.rounds_in_order();
        assert_eq!(ordered[0].round_num, 1);
        assert_eq!(ordered[1].round_num, 2);
    }

    #[test]
    fn test_agent_for_missing_player() {
        let game = GameRecord {
            map: "Bind".to_string(),
            won: false,
            score: 0,
            opponent_score: 0,
            agents: vec![PlayerAgent {
                id: "p1".to_string(),
                name: "one".to_string(),
                agent: "Jett".to_string(),
                kills: 0,
                deaths: 0,
            }],
            opponent_agents: vec![],
            rounds: vec![],
        };

        assert_eq!(game.agent_for("p1"), "Jett");
        assert_eq!(game.agent_for("p2"), UNKNOWN_AGENT);
        assert!(!game.has_player_totals());
    }
}
