use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::StandingsEntry;

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingsEntry>,
}

pub async fn get_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let tournament = state.tournament.lock().await;
    let standings = tournament.standings()?;
    Ok(Json(StandingsResponse { standings }))
}
