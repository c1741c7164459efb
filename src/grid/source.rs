//! [`DataSource`] backed by the GRID feeds.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::client::{GridClient, GridError};
use super::payload::{RawSeriesNode, SeriesListData};
use super::{DataSource, TeamGames};
use crate::config::GridConfig;
use crate::models::{
    clean_team_name, FieldSupport, SeriesRef, TeamDirectory, TeamRef, TournamentRef,
};
use crate::normalize::{normalize_series, TeamMatcher};

/// Discovers a team's series across the configured tournaments and
/// fetches them one at a time.
pub struct GridDataSource {
    client: GridClient,
    tournament_ids: Vec<String>,
    directory_tournament_ids: Vec<String>,
    page_size: u32,
    max_series: usize,
    request_delay: Duration,
}

impl GridDataSource {
    pub fn new(client: GridClient, config: &GridConfig) -> Self {
        Self {
            client,
            tournament_ids: config.tournament_ids.clone(),
            directory_tournament_ids: config.directory_tournament_ids.clone(),
            page_size: config.page_size,
            max_series: config.max_series,
            request_delay: config.request_delay(),
        }
    }

    /// Every series `team_id` played in the configured tournaments, most
    /// recent first. Tournaments that fail to load are skipped.
    pub async fn team_series(&self, team_id: &str) -> Vec<SeriesRef> {
        let mut series = Vec::new();
        for tournament_id in &self.tournament_ids {
            match self.client.tournament_series(tournament_id, self.page_size).await {
                Ok(data) => {
                    let found = series_for_team(&data, team_id);
                    debug!("Tournament {}: {} series for team {}", tournament_id, found.len(), team_id);
                    series.extend(found);
                }
                Err(e) => warn!("Failed to fetch series from tournament {}: {}", tournament_id, e),
            }
        }
        sort_and_dedup(series)
    }
}

#[async_trait]
impl DataSource for GridDataSource {
    fn name(&self) -> &'static str {
        "grid"
    }

    async fn list_teams(&self) -> Result<TeamDirectory, GridError> {
        for tournament_id in &self.directory_tournament_ids {
            match self.client.tournament_series(tournament_id, self.page_size).await {
                Ok(data) => {
                    let directory = directory_from(&data);
                    if !directory.teams.is_empty() {
                        info!("Found {} teams in tournament {}", directory.teams.len(), tournament_id);
                        return Ok(directory);
                    }
                }
                Err(e) => warn!("Failed to fetch teams from tournament {}: {}", tournament_id, e),
            }
        }

        Ok(TeamDirectory {
            tournament: None,
            teams: vec![],
        })
    }

    async fn team_games(&self, team_id: &str) -> Result<TeamGames, GridError> {
        let mut series = self.team_series(team_id).await;
        series.truncate(self.max_series);
        info!("Analyzing {} series for team {}", series.len(), team_id);

        let team = series
            .iter()
            .flat_map(|s| s.teams.iter())
            .find(|t| t.id == team_id)
            .cloned()
            .unwrap_or_else(|| TeamRef {
                id: team_id.to_string(),
                name: team_id.to_string(),
                logo_url: None,
            });
        let matcher = TeamMatcher::new(team_id).with_name(team.name.clone());

        let mut games = Vec::new();
        let mut populated = false;
        let mut analyzed = 0;
        for (i, entry) in series.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            match self.client.series_state(&entry.id).await {
                Ok(state) => {
                    let normalized = normalize_series(&state, &matcher);
                    debug!("Series {}: {} finished games", entry.id, normalized.games.len());
                    populated |= normalized.first_kill_populated;
                    games.extend(normalized.games);
                    analyzed += 1;
                }
                Err(e) => warn!("Skipping series {}: {}", entry.id, e),
            }
        }

        if analyzed == 0 && !series.is_empty() {
            return Err(GridError::SeriesUnavailable {
                team_id: team_id.to_string(),
                found: series.len(),
            });
        }

        // The query can succeed while every firstKill comes back null; leave
        // the verdict to the analyzers' own availability check then.
        let first_kill_support = match self.client.first_kill_support().await {
            FieldSupport::Supported if !populated => FieldSupport::Unknown,
            support => support,
        };

        Ok(TeamGames {
            team,
            games,
            first_kill_support,
            series_analyzed: analyzed,
        })
    }
}

fn node_teams(node: &RawSeriesNode) -> Vec<TeamRef> {
    node.teams
        .iter()
        .filter_map(|t| t.base_info.as_ref())
        .map(|info| TeamRef {
            id: info.id.clone(),
            name: clean_team_name(&info.name),
            logo_url: info.logo_url.clone(),
        })
        .collect()
}

/// Unique teams of one tournament, sorted by name.
fn directory_from(data: &SeriesListData) -> TeamDirectory {
    let mut seen = HashSet::new();
    let mut teams: Vec<TeamRef> = data
        .all_series
        .edges
        .iter()
        .flat_map(|edge| node_teams(&edge.node))
        .filter(|team| seen.insert(team.id.clone()))
        .collect();
    teams.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    TeamDirectory {
        tournament: data.tournament.as_ref().map(|t| TournamentRef {
            id: t.id.clone(),
            name: t.name.clone(),
        }),
        teams,
    }
}

fn series_for_team(data: &SeriesListData, team_id: &str) -> Vec<SeriesRef> {
    data.all_series
        .edges
        .iter()
        .map(|edge| SeriesRef {
            id: edge.node.id.clone(),
            start_time_scheduled: edge.node.start_time_scheduled,
            tournament: edge.node.tournament.as_ref().map(|t| TournamentRef {
                id: t.id.clone(),
                name: t.name.clone(),
            }),
            teams: node_teams(&edge.node),
        })
        .filter(|series| series.involves(team_id))
        .collect()
}

/// Most recent first; unscheduled series last; duplicate ids dropped.
fn sort_and_dedup(mut series: Vec<SeriesRef>) -> Vec<SeriesRef> {
    series.sort_by(|a, b| b.start_time_scheduled.cmp(&a.start_time_scheduled));
    let mut seen = HashSet::new();
    series.retain(|s| seen.insert(s.id.clone()));
    series
}
