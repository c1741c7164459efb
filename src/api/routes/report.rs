use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::report::{fetch_report, ScoutingReport};

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Bypass the cache
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub from_cache: bool,
    #[serde(flatten)]
    pub report: ScoutingReport,
}

/// Scouting report for one team.
pub async fn team_report(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let team_id = team_id.trim();
    if team_id.is_empty() {
        return Err(ApiError::BadRequest("team id is required".to_string()));
    }

    let cached = fetch_report(state.source.as_ref(), &state.cache, team_id, query.refresh).await?;
    if cached.report.games_analyzed == 0 && cached.report.series_analyzed == 0 {
        return Err(ApiError::NotFound(format!("no series found for team {}", team_id)));
    }

    Ok(Json(ReportResponse {
        from_cache: cached.from_cache,
        report: cached.report,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tempfile::TempDir;

    use crate::api::routes::test_support::{get_json, test_state};
    use crate::calculate::fixtures::{game, rounds_from};
    use crate::grid::fixtures::StaticSource;
    use crate::models::TeamRef;

    fn source() -> Arc<StaticSource> {
        Arc::new(static_source())
    }

    fn static_source() -> StaticSource {
        StaticSource::new(
            TeamRef {
                id: "79".to_string(),
                name: "Cloud9".to_string(),
                logo_url: None,
            },
            vec![
                game("Ascent", true, rounds_from("WWWWWWWWWWLL WWWLLLLL")),
                game("Bind", false, rounds_from("WWWWWLLLLLLL WWLLLLLL")),
            ],
        )
    }

    #[tokio::test]
    async fn test_report_then_cached() {
        let dir = TempDir::new().unwrap();
        let source = source();
        let state = test_state(source.clone(), dir.path());

        let (status, json) = get_json(state.clone(), "/api/teams/79/report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fromCache"], false);
        assert_eq!(json["team"]["name"], "Cloud9");
        assert_eq!(json["gamesAnalyzed"], 2);
        assert!(json["insights"].as_array().is_some_and(|i| !i.is_empty()));

        let (_, json) = get_json(state.clone(), "/api/teams/79/report").await;
        assert_eq!(json["fromCache"], true);

        let (_, json) = get_json(state, "/api/teams/79/report?refresh=true").await;
        assert_eq!(json["fromCache"], false);
        assert_eq!(source.requests(), 2);
    }

    #[tokio::test]
    async fn test_unknown_team_is_not_found() {
        let dir = TempDir::new().unwrap();

        let (status, json) = get_json(test_state(source(), dir.path()), "/api/teams/404/report").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bad_refresh_flag_rejected() {
        let dir = TempDir::new().unwrap();

        let (status, _) =
            get_json(test_state(source(), dir.path()), "/api/teams/79/report?refresh=maybe").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unfetchable_series_is_bad_gateway() {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(static_source().with_unavailable_series());

        let (status, json) = get_json(test_state(source, dir.path()), "/api/teams/79/report").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    }
}
