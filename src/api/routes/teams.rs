use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::TeamDirectory;

/// Teams available for scouting.
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<TeamDirectory>, ApiError> {
    let directory = state.source.list_teams().await?;
    Ok(Json(directory))
}
