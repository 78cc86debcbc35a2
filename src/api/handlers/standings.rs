use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};

use crate::api::models::{OverviewResponse, StandingsEntry, TrackQuery};

use super::{engine_error_response, parse_track, AppState};

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrackQuery>,
) -> impl IntoResponse {
    let track = match parse_track(params.track.as_deref()) {
        Ok(track) => track,
        Err(response) => return response,
    };

    match state.standings.standings(track) {
        Ok(rows) => {
            let entries: Vec<StandingsEntry> = rows.into_iter().map(Into::into).collect();
            Json(entries).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_overview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.standings.overview() {
        Ok(overview) => Json(OverviewResponse::from(overview)).into_response(),
        Err(err) => engine_error_response(err),
    }
}
