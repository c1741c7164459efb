//! Derived statistics models.
//!
//! Every aggregate here is plain data computed fresh from a slice of
//! [`GameRecord`](super::GameRecord)s. Nothing carries a timestamp, so two
//! runs over the same input serialize identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculate::{percentage, rounded_percentage};

/// Win/total counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub wins: u32,
    pub total: u32,
}

impl WinTally {
    pub fn record(&mut self, won: bool) {
        self.total += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn losses(&self) -> u32 {
        self.total - self.wins
    }

    /// Win rate in percent, 0 when nothing was recorded.
    pub fn rate(&self) -> f64 {
        percentage(self.wins, self.total)
    }

    /// Sum of two tallies.
    pub fn combined(&self, other: &WinTally) -> WinTally {
        WinTally {
            wins: self.wins + other.wins,
            total: self.total + other.total,
        }
    }
}

/// Per-map record for the scouted team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoolEntry {
    pub map: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Rounded percentage (0-100)
    pub win_rate: u32,
    pub rounds_for: u32,
    pub rounds_against: u32,
    pub round_diff: i64,
}

impl MapPoolEntry {
    pub fn new(map: String) -> Self {
        Self {
            map,
            played: 0,
            wins: 0,
            losses: 0,
            win_rate: 0,
            rounds_for: 0,
            rounds_against: 0,
            round_diff: 0,
        }
    }

    /// Recompute the fields derived from the counters.
    pub fn finalize(&mut self) {
        self.win_rate = rounded_percentage(self.wins, self.played);
        self.round_diff = i64::from(self.rounds_for) - i64::from(self.rounds_against);
    }
}

/// Pistol-round tallies keyed by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PistolSplit {
    pub attack: WinTally,
    pub defense: WinTally,
}

/// Attack/defense round win rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSideAnalysis {
    pub attack: WinTally,
    pub defense: WinTally,
    pub pistol: PistolSplit,
}

impl RoundSideAnalysis {
    /// Both pistol buckets together.
    pub fn pistol_total(&self) -> WinTally {
        self.pistol.attack.combined(&self.pistol.defense)
    }
}

/// Opening-duel numbers for one scouted player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFirstBlood {
    pub id: String,
    pub name: String,
    pub first_kills: u32,
    /// Approximate: see [`crate::calculate::first_blood`]
    pub first_deaths: u32,
    pub rounds: u32,
    pub fb_rate: f64,
    pub fd_rate: f64,
}

/// Team and player first-blood statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstBloodSummary {
    #[serde(rename = "teamFBRate")]
    pub team_fb_rate: f64,
    #[serde(rename = "fbConversionRate")]
    pub fb_conversion_rate: f64,
    #[serde(rename = "fbChokeRate")]
    pub fb_choke_rate: f64,
    #[serde(rename = "teamFBs")]
    pub team_fbs: u32,
    #[serde(rename = "oppFBs")]
    pub opp_fbs: u32,
    pub fb_wins: u32,
    pub fb_losses: u32,
    pub total_rounds: u32,
    pub players: Vec<PlayerFirstBlood>,
}

/// First kills over rounds played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstKillTally {
    pub first_kills: u32,
    pub rounds: u32,
}

impl FirstKillTally {
    pub fn record(&mut self, first_kill: bool) {
        self.rounds += 1;
        if first_kill {
            self.first_kills += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        percentage(self.first_kills, self.rounds)
    }
}

/// First-kill rate for a player on one agent and one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstBloodTrend {
    pub player: String,
    pub agent: String,
    pub map: String,
    pub first_kills: u32,
    pub rounds: u32,
    pub fb_rate: f64,
    pub attack: FirstKillTally,
    pub defense: FirstKillTally,
}

/// First-kill rate for a player on one agent across all maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFirstBlood {
    pub player: String,
    pub agent: String,
    pub first_kills: u32,
    pub rounds: u32,
    pub fb_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstBloodTrends {
    pub trends: Vec<FirstBloodTrend>,
    pub agents: Vec<AgentFirstBlood>,
}

/// How rounds were won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinBreakdown {
    pub elimination: u32,
    pub spike: u32,
}

/// How rounds were lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossBreakdown {
    pub eliminated: u32,
    pub spike: u32,
}

/// Round-end classification inferred from death counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinCondition {
    Elimination,
    Spike,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinTypeSummary {
    pub wins: WinBreakdown,
    pub losses: LossBreakdown,
    pub attack_wins: WinBreakdown,
    pub defense_wins: WinBreakdown,
    pub total_wins: u32,
    pub total_losses: u32,
}

/// Inferred buy state for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EconomyPhase {
    Pistol,
    Eco,
    ForceBuy,
    FullBuy,
}

impl std::fmt::Display for EconomyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EconomyPhase::Pistol => write!(f, "pistol"),
            EconomyPhase::Eco => write!(f, "eco"),
            EconomyPhase::ForceBuy => write!(f, "force buy"),
            EconomyPhase::FullBuy => write!(f, "full buy"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomySummary {
    pub pistol: WinTally,
    pub eco: WinTally,
    pub force_buy: WinTally,
    pub full_buy: WinTally,
}

impl EconomySummary {
    pub fn phase(&self, phase: EconomyPhase) -> &WinTally {
        match phase {
            EconomyPhase::Pistol => &self.pistol,
            EconomyPhase::Eco => &self.eco,
            EconomyPhase::ForceBuy => &self.force_buy,
            EconomyPhase::FullBuy => &self.full_buy,
        }
    }

    pub fn phase_mut(&mut self, phase: EconomyPhase) -> &mut WinTally {
        match phase {
            EconomyPhase::Pistol => &mut self.pistol,
            EconomyPhase::Eco => &mut self.eco,
            EconomyPhase::ForceBuy => &mut self.force_buy,
            EconomyPhase::FullBuy => &mut self.full_buy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumSummary {
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    /// Rounds 2-3 / 14-15 after a won pistol
    pub post_pistol_win: WinTally,
    /// Rounds 2-3 / 14-15 after a lost pistol
    pub post_pistol_loss: WinTally,
    pub first_half: WinTally,
    pub second_half: WinTally,
    pub comebacks: u32,
    pub behind_at_half: u32,
    pub games_analyzed: u32,
}

/// One five-agent lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionStat {
    /// Sorted agent names joined with ", "
    pub agents: String,
    pub count: u32,
    pub wins: u32,
    pub win_rate: u32,
    pub maps: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUsage {
    pub agent: String,
    pub count: u32,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAgentPool {
    pub id: String,
    pub name: String,
    pub agents: Vec<AgentUsage>,
}

impl PlayerAgentPool {
    /// Maps played across every agent.
    pub fn maps_played(&self) -> u32 {
        self.agents.iter().map(|a| a.count).sum()
    }

    /// Most played agent; pools are sorted so this is the first entry.
    pub fn main_agent(&self) -> Option<&AgentUsage> {
        self.agents.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSummary {
    pub compositions: Vec<CompositionStat>,
    pub player_agents: Vec<PlayerAgentPool>,
}

/// Kill/death line for a scouted player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerKd {
    pub id: String,
    pub name: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
}

/// Headline numbers for the scouted team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    pub games_played: u32,
    pub games_won: u32,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub kd: f64,
    pub players: Vec<PlayerKd>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_tally_record() {
        let mut tally = WinTally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);

        assert_eq!(tally.wins, 2);
        assert_eq!(tally.total, 3);
        assert_eq!(tally.losses(), 1);
        assert!((tally.rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_win_tally_empty_rate() {
        assert_eq!(WinTally::default().rate(), 0.0);
    }

    #[test]
    fn test_map_pool_entry_finalize() {
        let mut entry = MapPoolEntry::new("Lotus".to_string());
        entry.played = 3;
        entry.wins = 2;
        entry.losses = 1;
        entry.rounds_for = 30;
        entry.rounds_against = 33;
        entry.finalize();

        assert_eq!(entry.win_rate, 67);
        assert_eq!(entry.round_diff, -3);
    }

    #[test]
    fn test_first_blood_summary_field_names() {
        let summary = FirstBloodSummary {
            team_fb_rate: 50.0,
            fb_conversion_rate: 75.0,
            fb_choke_rate: 25.0,
            team_fbs: 4,
            opp_fbs: 4,
            fb_wins: 3,
            fb_losses: 1,
            total_rounds: 8,
            players: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["teamFBRate"], 50.0);
        assert_eq!(json["teamFBs"], 4);
        assert_eq!(json["fbChokeRate"], 25.0);
        assert_eq!(json["totalRounds"], 8);
    }

    #[test]
    fn test_economy_phase_lookup() {
        let mut summary = EconomySummary::default();
        summary.phase_mut(EconomyPhase::ForceBuy).record(true);

        assert_eq!(summary.phase(EconomyPhase::ForceBuy).wins, 1);
        assert_eq!(summary.force_buy.total, 1);
        assert_eq!(summary.eco.total, 0);
    }

    #[test]
    fn test_player_agent_pool_maps_played() {
        let pool = PlayerAgentPool {
            id: "1".to_string(),
            name: "leaf".to_string(),
            agents: vec![
                AgentUsage {
                    agent: "Viper".to_string(),
                    count: 4,
                    wins: 2,
                },
                AgentUsage {
                    agent: "Harbor".to_string(),
                    count: 1,
                    wins: 1,
                },
            ],
        };

        assert_eq!(pool.maps_played(), 5);
        assert_eq!(pool.main_agent().map(|a| a.agent.as_str()), Some("Viper"));
    }
}
