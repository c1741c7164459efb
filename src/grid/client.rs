//! GraphQL transport for the GRID feeds.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::payload::{GraphQlResponse, RawSeriesState, SeriesListData, SeriesStateData};
use super::queries::{SERIES_STATE_BASIC, SERIES_STATE_ENHANCED, TOURNAMENT_SERIES};
use crate::config::GridConfig;
use crate::models::FieldSupport;

/// Errors that can occur talking to GRID.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Rate limited, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GRID API key missing: set {0}")]
    MissingApiKey(String),

    #[error("Invalid API key header value")]
    InvalidApiKey,

    #[error("Series {0} not found")]
    SeriesNotFound(String),

    #[error("Found {found} series for team {team_id} but none could be fetched")]
    SeriesUnavailable { team_id: String, found: usize },
}

impl GridError {
    fn is_transient(&self) -> bool {
        match self {
            GridError::Http(e) => e.is_timeout() || e.is_connect(),
            GridError::HttpStatus { status, .. } if *status >= 500 => true,
            _ => self.is_rate_limit(),
        }
    }

    fn is_rate_limit(&self) -> bool {
        match self {
            GridError::HttpStatus { status, .. } => *status == 429,
            GridError::GraphQl(msg) => is_rate_limit_message(msg),
            _ => false,
        }
    }
}

fn is_rate_limit_message(msg: &str) -> bool {
    msg.to_lowercase().contains("rate limit")
}

/// Which GRID feed a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CentralData,
    SeriesState,
}

/// GRID client with retry/backoff and enhanced-field detection.
pub struct GridClient {
    client: Client,
    central_data_url: String,
    series_state_url: String,
    max_retries: u32,
    base_delay: Duration,
    first_kill_support: RwLock<FieldSupport>,
}

impl GridClient {
    /// Create a client with the API key read from the configured variable.
    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        let key = config
            .api_key()
            .ok_or_else(|| GridError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, &key)
    }

    pub fn new(config: &GridConfig, api_key: &str) -> Result<Self, GridError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|_| GridError::InvalidApiKey)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            central_data_url: config.central_data_url.clone(),
            series_state_url: config.series_state_url.clone(),
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay(),
            first_kill_support: RwLock::new(FieldSupport::Unknown),
        })
    }

    /// Current knowledge of whether the enhanced series fields exist.
    pub async fn first_kill_support(&self) -> FieldSupport {
        *self.first_kill_support.read().await
    }

    /// POST a GraphQL document, retrying on 429, 5xx, timeouts and
    /// rate-limit errors with exponential backoff.
    pub async fn query<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, GridError> {
        let url = match endpoint {
            Endpoint::CentralData => &self.central_data_url,
            Endpoint::SeriesState => &self.series_state_url,
        };
        let body = json!({ "query": query, "variables": variables });

        let mut attempt = 0;
        loop {
            match self.post_once(url, &body).await {
                Err(e) if attempt < self.max_retries && e.is_transient() => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "{}, retrying in {:?} (attempt {}/{})",
                        e,
                        delay,
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_rate_limit() => {
                    return Err(GridError::RateLimited {
                        attempts: attempt + 1,
                    });
                }
                other => return other,
            }
        }
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GridError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_str(&text)?;
        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GridError::GraphQl(message));
        }

        envelope
            .data
            .ok_or_else(|| GridError::GraphQl("response carried no data".to_string()))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Fetch one series state, preferring the enhanced query.
    ///
    /// The first enhanced request decides the capability flag. If it fails
    /// with a GraphQL error the request is repeated with the basic query and
    /// the enhanced shape is not tried again. Rate limiting surfaces as
    /// [`GridError::RateLimited`] and leaves the flag untouched.
    pub async fn series_state(&self, series_id: &str) -> Result<RawSeriesState, GridError> {
        let support = self.first_kill_support().await;

        if support.use_enhanced() {
            match self.fetch_series_state(series_id, SERIES_STATE_ENHANCED).await {
                Ok(state) => {
                    self.settle_support(true).await;
                    return Ok(state);
                }
                Err(GridError::GraphQl(msg)) if support.should_fall_back() => {
                    warn!("Enhanced series fields unavailable ({}), using basic query", msg);
                    self.settle_support(false).await;
                }
                Err(e) => return Err(e),
            }
        }

        self.fetch_series_state(series_id, SERIES_STATE_BASIC).await
    }

    async fn settle_support(&self, success: bool) {
        let mut support = self.first_kill_support.write().await;
        let next = if success {
            support.on_success()
        } else {
            support.on_failure()
        };
        if next != *support {
            info!("First-kill field support: {}", next);
        }
        *support = next;
    }

    async fn fetch_series_state(
        &self,
        series_id: &str,
        query: &str,
    ) -> Result<RawSeriesState, GridError> {
        debug!("Fetching series state {}", series_id);
        let data: SeriesStateData = self
            .query(Endpoint::SeriesState, query, json!({ "id": series_id }))
            .await?;
        data.series_state
            .ok_or_else(|| GridError::SeriesNotFound(series_id.to_string()))
    }

    /// Series of one tournament from the central data feed.
    pub async fn tournament_series(
        &self,
        tournament_id: &str,
        first: u32,
    ) -> Result<SeriesListData, GridError> {
        self.query(
            Endpoint::CentralData,
            TOURNAMENT_SERIES,
            json!({ "tournamentId": tournament_id, "first": first }),
        )
        .await
    }
}
