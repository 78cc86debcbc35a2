use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use crate::api::models::{
    CreatePlayerRequest, HistoryQuery, NotificationQuery, NotificationResponse, PlayerResponse,
    ProfileResponse, RatingEntryResponse, SetActiveRequest,
};
use crate::domain::models::Role;
use crate::services::players::CreatePlayer;

use super::{actor_id, engine_error_response, parse_track, AppState};

const DEFAULT_HISTORY_LIMIT: usize = 50;
const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreatePlayerRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let role = match payload.role.as_deref() {
        None => Role::Player,
        Some(raw) => match Role::parse(raw) {
            Some(role) => role,
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown role: {raw}"),
                )
                    .into_response();
            }
        },
    };

    let input = CreatePlayer {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role,
    };
    match state.players.create(actor, &input) {
        Ok(player) => (StatusCode::CREATED, Json(PlayerResponse::from(player))).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn set_player_active(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<SetActiveRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.players.set_active(actor, player_id, payload.is_active) {
        Ok(player) => Json(PlayerResponse::from(player)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_player_profile(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> impl IntoResponse {
    match state.players.profile(player_id) {
        Ok(profile) => Json(ProfileResponse::from(profile)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_player_history(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let track = match parse_track(params.track.as_deref()) {
        Ok(track) => track,
        Err(response) => return response,
    };
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);

    match state.players.history(player_id, track, limit) {
        Ok(entries) => {
            let entries: Vec<RatingEntryResponse> = entries.into_iter().map(Into::into).collect();
            Json(entries).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotificationQuery>,
) -> impl IntoResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
        .clamp(1, 200);

    match state.players.notifications(params.player, limit) {
        Ok(rows) => {
            let rows: Vec<NotificationResponse> = rows.into_iter().map(Into::into).collect();
            Json(rows).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.players.mark_notification_read(actor, notification_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => engine_error_response(err),
    }
}
