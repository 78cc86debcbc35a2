use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use crate::api::models::{
    CompletionResponse, CreateMatchRequest, MatchDetailResponse, MatchListQuery, MatchResponse,
    ReportScoreRequest, ReportScoreResponse, TransitionRequest,
};
use crate::domain::models::{MatchAction, MatchType};
use crate::services::matches::{CreateChallenge, MatchBucket};
use crate::services::moderation::TransitionOutcome;

use super::{actor_id, engine_error_response, AppState};

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateMatchRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let match_type = match payload.match_type.as_deref() {
        None => MatchType::Ranked,
        Some(raw) => match MatchType::parse(raw) {
            Some(match_type) => match_type,
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown match type: {raw}"),
                )
                    .into_response();
            }
        },
    };

    let input = CreateChallenge {
        opponent_id: payload.opponent_id,
        match_type,
        best_of: payload.best_of,
        scheduled_at: payload.scheduled_at,
        location: payload.location,
        notes: payload.notes,
    };
    match state.matches.create_challenge(actor, &input) {
        Ok(match_row) => {
            (StatusCode::CREATED, Json(MatchResponse::from(match_row))).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchListQuery>,
) -> impl IntoResponse {
    let bucket = match params.bucket.as_deref() {
        None => None,
        Some(raw) => match MatchBucket::parse(raw) {
            Some(bucket) => Some(bucket),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown match bucket: {raw}"),
                )
                    .into_response();
            }
        },
    };

    match state.matches.list_for_player(params.player, bucket) {
        Ok(rows) => {
            let rows: Vec<MatchResponse> = rows.into_iter().map(Into::into).collect();
            Json(rows).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn get_match_detail(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
) -> impl IntoResponse {
    match state.matches.detail(match_id) {
        Ok(detail) => Json(MatchDetailResponse {
            match_info: detail.match_row.into(),
            reports: detail.reports.into_iter().map(Into::into).collect(),
            events: detail.events.into_iter().map(Into::into).collect(),
        })
        .into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn transition_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<TransitionRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Some(action) = MatchAction::parse(&payload.action) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown action: {}", payload.action),
        )
            .into_response();
    };

    match state.moderation.transition(match_id, actor, action) {
        Ok(TransitionOutcome::Moved(match_row)) => {
            Json(MatchResponse::from(match_row)).into_response()
        }
        Ok(TransitionOutcome::Validated(completion)) => {
            Json(CompletionResponse::from(completion)).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub async fn report_score(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ReportScoreRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.results.report_score(match_id, actor, &payload.set_scores) {
        Ok(outcome) => Json(ReportScoreResponse::from(outcome)).into_response(),
        Err(err) => engine_error_response(err),
    }
}
