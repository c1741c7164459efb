//! GRID data source.
//!
//! Supplies the analytics core with normalized games for a team, the team
//! directory, and the first-kill capability flag.

pub mod client;
pub mod payload;
pub mod queries;
pub mod source;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{FieldSupport, GameRecord, TeamDirectory, TeamRef};

pub use client::{Endpoint, GridClient, GridError};
pub use source::GridDataSource;

/// Finished games for one team plus what is known about the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGames {
    pub team: TeamRef,
    pub games: Vec<GameRecord>,
    pub first_kill_support: FieldSupport,
    pub series_analyzed: usize,
}

/// Where games come from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    /// Teams available for scouting.
    async fn list_teams(&self) -> Result<TeamDirectory, GridError>;

    /// Recent finished games for `team_id`.
    async fn team_games(&self, team_id: &str) -> Result<TeamGames, GridError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;

    use super::*;
    use crate::config::GridConfig;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// GRID settings pointing both feeds at a mock upstream, with
    /// millisecond backoff and no pacing delay.
    pub fn upstream_config(base: &str) -> GridConfig {
        GridConfig {
            central_data_url: format!("{}/central", base),
            series_state_url: format!("{}/series", base),
            max_retries: 2,
            retry_base_delay_ms: 1,
            request_delay_ms: 0,
            ..GridConfig::default()
        }
    }

    /// In-memory source serving fixed games.
    pub struct StaticSource {
        pub directory: TeamDirectory,
        pub games: TeamGames,
        pub game_requests: AtomicUsize,
        pub series_unavailable: bool,
    }

    impl StaticSource {
        pub fn new(team: TeamRef, games: Vec<GameRecord>) -> Self {
            Self {
                directory: TeamDirectory {
                    tournament: None,
                    teams: vec![team.clone()],
                },
                games: TeamGames {
                    team,
                    games,
                    first_kill_support: FieldSupport::Supported,
                    series_analyzed: 1,
                },
                game_requests: AtomicUsize::new(0),
                series_unavailable: false,
            }
        }

        /// Fail every game request as if no series could be fetched.
        pub fn with_unavailable_series(mut self) -> Self {
            self.series_unavailable = true;
            self
        }

        pub fn requests(&self) -> usize {
            self.game_requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn list_teams(&self) -> Result<TeamDirectory, GridError> {
            Ok(self.directory.clone())
        }

        async fn team_games(&self, team_id: &str) -> Result<TeamGames, GridError> {
            self.game_requests.fetch_add(1, Ordering::SeqCst);
            if self.series_unavailable {
                Err(GridError::SeriesUnavailable {
                    team_id: team_id.to_string(),
                    found: self.games.series_analyzed,
                })
            } else if team_id == self.games.team.id {
                Ok(self.games.clone())
            } else {
                Ok(TeamGames {
                    team: TeamRef {
                        id: team_id.to_string(),
                        name: team_id.to_string(),
                        logo_url: None,
                    },
                    games: vec![],
                    first_kill_support: FieldSupport::Unknown,
                    series_analyzed: 0,
                })
            }
        }
    }
}
