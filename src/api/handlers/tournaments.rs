use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use crate::api::models::{
    CreateTournamentRequest, FinalizeRequest, FinalizeResponse, TournamentDetailResponse,
    TournamentResponse,
};
use crate::domain::models::{Placement, TournamentFormat};
use crate::services::tournaments::CreateTournament;

use super::{actor_id, engine_error_response, AppState};

const DEFAULT_POINTS: [i32; 4] = [100, 60, 35, 20];

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateTournamentRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let format = match payload.format.as_deref() {
        None => TournamentFormat::SingleElimination,
        Some(raw) => match TournamentFormat::parse(raw) {
            Some(format) => format,
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown tournament format: {raw}"),
                )
                    .into_response();
            }
        },
    };

    let input = CreateTournament {
        name: payload.name,
        description: payload.description,
        location: payload.location,
        start_date: payload.start_date,
        end_date: payload.end_date,
        registration_deadline: payload.registration_deadline,
        max_participants: payload.max_participants,
        entry_fee: payload.entry_fee.unwrap_or(0.0),
        prize_pool: payload.prize_pool.unwrap_or(0.0),
        format,
        points_winner: payload.points_winner.unwrap_or(DEFAULT_POINTS[0]),
        points_finalist: payload.points_finalist.unwrap_or(DEFAULT_POINTS[1]),
        points_semifinalist: payload.points_semifinalist.unwrap_or(DEFAULT_POINTS[2]),
        points_quarterfinalist: payload.points_quarterfinalist.unwrap_or(DEFAULT_POINTS[3]),
    };
    match state.tournaments.create(actor, &input) {
        Ok(tournament) => {
            (StatusCode::CREATED, Json(TournamentResponse::from(tournament))).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn list_tournaments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.tournaments.list() {
        Ok(rows) => {
            let rows: Vec<TournamentResponse> = rows.into_iter().map(Into::into).collect();
            Json(rows).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
) -> impl IntoResponse {
    match state.tournaments.detail(tournament_id) {
        Ok(detail) => Json(TournamentDetailResponse::from(detail)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.tournaments.register(tournament_id, actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.tournaments.advance(tournament_id, actor) {
        Ok(tournament) => Json(TournamentResponse::from(tournament)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn finalize(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<FinalizeRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut placements = HashMap::new();
    for (player_id, raw) in &payload.placements {
        let Some(placement) = Placement::parse(raw) else {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown placement: {raw}"),
            )
                .into_response();
        };
        placements.insert(*player_id, placement);
    }

    match state.tournaments.finalize(tournament_id, actor, &placements) {
        Ok(outcome) => Json(FinalizeResponse::from(outcome)).into_response(),
        Err(err) => engine_error_response(err),
    }
}
