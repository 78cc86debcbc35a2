use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use log::error;

use crate::config::AppConfig;
use crate::database::DbPool;
use crate::domain::models::RatingTrack;
use crate::errors::EngineError;
use crate::services::matches::MatchService;
use crate::services::moderation::ModerationService;
use crate::services::players::PlayerService;
use crate::services::results::ResultsService;
use crate::services::standings::{StandingsCache, StandingsService};
use crate::services::tournaments::TournamentService;

pub mod admin;
pub mod matches;
pub mod players;
pub mod standings;
pub mod tournaments;

pub struct AppState {
    pub players: PlayerService,
    pub matches: MatchService,
    pub results: ResultsService,
    pub moderation: ModerationService,
    pub tournaments: TournamentService,
    pub standings: StandingsService,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let cache = Arc::new(StandingsCache::default());
        AppState {
            players: PlayerService::new(pool.clone(), config.clone(), Arc::clone(&cache)),
            matches: MatchService::new(pool.clone()),
            results: ResultsService::new(pool.clone(), config.clone(), Arc::clone(&cache)),
            moderation: ModerationService::new(pool.clone(), config.clone(), Arc::clone(&cache)),
            tournaments: TournamentService::new(pool.clone(), config.clone(), Arc::clone(&cache)),
            standings: StandingsService::new(pool, cache),
        }
    }
}

/// The acting player, taken from the `X-Player-Id` header. Authentication
/// itself lives upstream; the engine only needs to know who is asking.
pub fn actor_id(headers: &HeaderMap) -> Result<i64, Response> {
    headers
        .get("X-Player-Id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Missing or malformed X-Player-Id header",
            )
                .into_response()
        })
}

pub(crate) fn parse_track(raw: Option<&str>) -> Result<RatingTrack, Response> {
    match raw {
        None => Ok(RatingTrack::Elo),
        Some(raw) => RatingTrack::parse(raw).ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown rating track: {raw}"),
            )
                .into_response()
        }),
    }
}

/// Maps engine failures onto HTTP statuses. Retryable failures hide their
/// internals behind a generic message.
pub fn engine_error_response(err: EngineError) -> Response {
    let status = match err {
        EngineError::Validation(_)
        | EngineError::InvalidScore(_)
        | EngineError::IncompletePlacement(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Authorization(_) => StatusCode::FORBIDDEN,
        EngineError::InvalidTransition { .. }
        | EngineError::AlreadyProcessed(_)
        | EngineError::AlreadyFinalized(_)
        | EngineError::Capacity(_) => StatusCode::CONFLICT,
        EngineError::Consistency(_) | EngineError::Transient(_) => {
            error!("Request failed: {err}");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "Temporarily unavailable, try again".to_string(),
            )
                .into_response();
        }
    };

    (status, err.to_string()).into_response()
}
