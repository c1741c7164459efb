//! Raw series state to [`GameRecord`]s.
//!
//! GRID reports every game from both teams' points of view. Normalization
//! picks the scouted team out of each game, keeps finished games only, and
//! flattens round segments into [`RoundRecord`]s ordered by round number.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::grid::payload::{RawGame, RawGamePlayer, RawSeriesState, RawSegmentPlayer};
use crate::models::{GameRecord, PlayerAgent, PlayerRoundStat, RoundRecord, Side, UNKNOWN_AGENT};

/// Map name used when the feed omits it.
pub const UNKNOWN_MAP: &str = "Unknown";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Raw series state needs a team to scout")]
    MissingTeam,
}

/// Identifies the scouted team inside a game.
///
/// Teams are matched by id first. When no team carries the id, the first
/// team whose name contains `name` (case-insensitive) is used instead.
#[derive(Debug, Clone)]
pub struct TeamMatcher {
    pub id: String,
    pub name: Option<String>,
}

impl TeamMatcher {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Index of the scouted team among `teams`, given as (id, name) pairs.
    fn position<'a>(&self, teams: impl Iterator<Item = (&'a str, &'a str)> + Clone) -> Option<usize> {
        if let Some(pos) = teams.clone().position(|(id, _)| id == self.id) {
            return Some(pos);
        }
        let needle = self.name.as_deref()?.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        teams.into_iter().position(|(_, name)| name.to_lowercase().contains(&needle))
    }
}

/// Games from one series plus whether any round carried a first-kill value.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSeries {
    pub games: Vec<GameRecord>,
    pub first_kill_populated: bool,
}

/// Normalize every finished game in `state` that the scouted team played.
pub fn normalize_series(state: &RawSeriesState, team: &TeamMatcher) -> NormalizedSeries {
    let mut games: Vec<&RawGame> = state.games.iter().filter(|g| g.finished).collect();
    games.sort_by_key(|g| g.sequence_number);

    let mut series = NormalizedSeries::default();
    for game in games {
        match normalize_game(game, team) {
            Some((record, populated)) => {
                series.first_kill_populated |= populated;
                series.games.push(record);
            }
            None => debug!("Series {} game {} has no matching team", state.id, game.id),
        }
    }
    series
}

/// Normalize one game. Returns `None` when the scouted team is absent.
pub fn normalize_game(game: &RawGame, team: &TeamMatcher) -> Option<(GameRecord, bool)> {
    let ours = team.position(game.teams.iter().map(|t| (t.id.as_str(), t.name.as_str())))?;
    let own = &game.teams[ours];
    let opponent = game.teams.iter().enumerate().find(|(i, _)| *i != ours).map(|(_, t)| t);

    let map = game
        .map
        .as_ref()
        .and_then(|m| m.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_MAP)
        .to_string();

    let round_matcher = TeamMatcher {
        id: own.id.clone(),
        name: team.name.clone(),
    };
    let mut segments: Vec<_> = game.segments.iter().collect();
    segments.sort_by_key(|s| s.sequence_number);

    let mut populated = false;
    let mut rounds = Vec::with_capacity(segments.len());
    for segment in segments {
        let Some(idx) = round_matcher.position(
            segment.teams.iter().map(|t| (t.id.as_str(), t.name.as_str())),
        ) else {
            continue;
        };
        let own_round = &segment.teams[idx];
        let opp_players = segment
            .teams
            .iter()
            .enumerate()
            .find(|(i, _)| *i != idx)
            .map(|(_, t)| t.players.as_slice())
            .unwrap_or_default();

        populated |= own_round
            .players
            .iter()
            .chain(opp_players)
            .any(|p| p.first_kill.is_some());

        rounds.push(RoundRecord {
            round_num: segment.sequence_number,
            side: own_round.side.as_deref().map(Side::parse).unwrap_or_default(),
            won: own_round.won,
            players: own_round.players.iter().map(round_stat).collect(),
            opp_players: opp_players.iter().map(round_stat).collect(),
        });
    }

    let record = GameRecord {
        map,
        won: own.won,
        score: own.score,
        opponent_score: opponent.map(|t| t.score).unwrap_or_default(),
        agents: own.players.iter().map(player_agent).collect(),
        opponent_agents: opponent
            .map(|t| t.players.iter().map(player_agent).collect())
            .unwrap_or_default(),
        rounds,
    };
    Some((record, populated))
}

fn round_stat(player: &RawSegmentPlayer) -> PlayerRoundStat {
    PlayerRoundStat {
        id: player.id.clone(),
        name: player.name.clone(),
        kills: player.kills,
        deaths: player.deaths,
        first_kill: player.first_kill.unwrap_or(false),
    }
}

fn player_agent(player: &RawGamePlayer) -> PlayerAgent {
    let agent = player
        .character
        .as_ref()
        .and_then(|c| c.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_AGENT);

    PlayerAgent {
        id: player.id.clone(),
        name: player.name.clone(),
        agent: agent.to_string(),
        kills: player.kills,
        deaths: player.deaths,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OfflineInput {
    Games(Vec<GameRecord>),
    Series(Vec<RawSeriesState>),
    SingleSeries(RawSeriesState),
}

/// Parse offline input: either already-normalized games or raw series
/// state (one object or an array). Raw input needs `team`.
pub fn parse_offline(text: &str, team: Option<&TeamMatcher>) -> Result<Vec<GameRecord>, NormalizeError> {
    let input: OfflineInput = serde_json::from_str(text)?;
    let states = match input {
        OfflineInput::Games(games) => return Ok(games),
        OfflineInput::Series(states) => states,
        OfflineInput::SingleSeries(state) => vec![state],
    };

    let team = team.ok_or(NormalizeError::MissingTeam)?;
    Ok(states
        .iter()
        .flat_map(|state| normalize_series(state, team).games)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::payload::{RawCharacter, RawGameTeam, RawMap, RawSegment, RawSegmentTeam};
    use pretty_assertions::assert_eq;

    fn seg_player(id: &str, kills: u32, deaths: u32, first_kill: Option<bool>) -> RawSegmentPlayer {
        RawSegmentPlayer {
            id: id.to_string(),
            name: format!("player-{}", id),
            kills,
            deaths,
            first_kill,
        }
    }

    fn segment(num: u32, side: &str, won: bool, fk: Option<bool>) -> RawSegment {
        RawSegment {
            sequence_number: num,
            teams: vec![
                RawSegmentTeam {
                    id: "opp".to_string(),
                    name: "Sentinels".to_string(),
                    side: Some(if side == "attacker" { "defender" } else { "attacker" }.to_string()),
                    won: !won,
                    players: vec![seg_player("o1", 0, 1, fk.map(|_| false))],
                },
                RawSegmentTeam {
                    id: "79".to_string(),
                    name: "Cloud9".to_string(),
                    side: Some(side.to_string()),
                    won,
                    players: vec![seg_player("p1", 1, 0, fk)],
                },
            ],
        }
    }

    fn raw_game(seq: u32, map: Option<&str>, finished: bool, segments: Vec<RawSegment>) -> RawGame {
        RawGame {
            id: format!("g{}", seq),
            sequence_number: seq,
            finished,
            map: Some(RawMap {
                name: map.map(str::to_string),
            }),
            teams: vec![
                RawGameTeam {
                    id: "79".to_string(),
                    name: "Cloud9 (1)".to_string(),
                    side: None,
                    won: true,
                    score: 13,
                    players: vec![RawGamePlayer {
                        id: "p1".to_string(),
                        name: "player-p1".to_string(),
                        kills: 20,
                        deaths: 10,
                        character: Some(RawCharacter {
                            name: Some("Jett".to_string()),
                        }),
                    }],
                },
                RawGameTeam {
                    id: "opp".to_string(),
                    name: "Sentinels".to_string(),
                    side: None,
                    won: false,
                    score: 9,
                    players: vec![RawGamePlayer {
                        id: "o1".to_string(),
                        name: "player-o1".to_string(),
                        kills: 10,
                        deaths: 20,
                        character: None,
                    }],
                },
            ],
            segments,
        }
    }

    #[test]
    fn test_normalize_game_from_scouted_side() {
        let game = raw_game(
            1,
            Some("Ascent"),
            true,
            vec![
                segment(2, "attacker", false, Some(false)),
                segment(1, "attacker", true, Some(true)),
            ],
        );

        let (record, populated) = normalize_game(&game, &TeamMatcher::new("79")).unwrap();

        assert!(populated);
        assert_eq!(record.map, "Ascent");
        assert!(record.won);
        assert_eq!((record.score, record.opponent_score), (13, 9));
        assert_eq!(record.agents[0].agent, "Jett");
        assert_eq!(record.opponent_agents[0].agent, UNKNOWN_AGENT);

        let nums: Vec<u32> = record.rounds.iter().map(|r| r.round_num).collect();
        assert_eq!(nums, vec![1, 2]);
        assert_eq!(record.rounds[0].side, Side::Attacker);
        assert!(record.rounds[0].won);
        assert!(record.rounds[0].team_first_kill());
        assert_eq!(record.rounds[0].opp_players[0].id, "o1");
    }

    #[test]
    fn test_name_fallback_match() {
        let game = raw_game(1, Some("Bind"), true, vec![segment(1, "defender", true, None)]);
        let team = TeamMatcher::new("unknown-id").with_name("cloud9");

        let (record, populated) = normalize_game(&game, &team).unwrap();

        assert!(!populated);
        assert_eq!(record.rounds.len(), 1);
        assert_eq!(record.rounds[0].side, Side::Defender);
        assert!(!record.rounds[0].team_first_kill());
    }

    #[test]
    fn test_missing_team_and_map() {
        let game = raw_game(1, None, true, vec![]);

        assert!(normalize_game(&game, &TeamMatcher::new("nobody")).is_none());
        let (record, _) = normalize_game(&game, &TeamMatcher::new("79")).unwrap();
        assert_eq!(record.map, UNKNOWN_MAP);
        assert!(record.rounds.is_empty());
    }

    #[test]
    fn test_series_skips_unfinished_games() {
        let state = RawSeriesState {
            id: "s1".to_string(),
            finished: false,
            games: vec![
                raw_game(2, Some("Lotus"), false, vec![]),
                raw_game(1, Some("Split"), true, vec![]),
            ],
        };

        let series = normalize_series(&state, &TeamMatcher::new("79"));

        assert_eq!(series.games.len(), 1);
        assert_eq!(series.games[0].map, "Split");
        assert!(!series.first_kill_populated);
    }

    #[test]
    fn test_parse_offline_games() {
        let json = r#"[{"map": "Haven", "won": false, "rounds": []}]"#;
        let games = parse_offline(json, None).unwrap();

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].map, "Haven");
    }

    #[test]
    fn test_parse_offline_raw_series_needs_team() {
        let json = r#"{"id": "s1", "games": []}"#;

        assert!(matches!(parse_offline(json, None), Err(NormalizeError::MissingTeam)));
        assert!(parse_offline(json, Some(&TeamMatcher::new("79"))).unwrap().is_empty());
    }
}
