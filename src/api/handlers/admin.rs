use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use crate::api::models::{
    CreateUserReportRequest, DashboardResponse, HandleReportRequest, SnapshotRequest,
    SnapshotResponse, UserReportResponse,
};
use crate::domain::models::RatingTrack;

use super::{actor_id, engine_error_response, AppState};

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.moderation.summary(actor) {
        Ok(summary) => Json(DashboardResponse::from(summary)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn capture_snapshot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SnapshotRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Some(track) = RatingTrack::parse(&payload.track) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown rating track: {}", payload.track),
        )
            .into_response();
    };

    match state.standings.capture_snapshot_by(actor, track) {
        Ok(players) => Json(SnapshotResponse { track, players }).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserReportRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.moderation.submit_report(
        actor,
        payload.reported_id,
        &payload.reason,
        payload.description.as_deref(),
    ) {
        Ok(report) => (StatusCode::CREATED, Json(UserReportResponse::from(report))).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn handle_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<HandleReportRequest>,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let approve = match payload.action.as_str() {
        "approve" => true,
        "reject" => false,
        other => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown report action: {other}"),
            )
                .into_response();
        }
    };

    match state.moderation.handle_report(report_id, actor, approve) {
        Ok(report) => Json(UserReportResponse::from(report)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub async fn list_open_reports(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let actor = match actor_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.moderation.open_reports(actor) {
        Ok(reports) => {
            let reports: Vec<UserReportResponse> = reports.into_iter().map(Into::into).collect();
            Json(reports).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}
