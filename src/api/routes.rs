use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{admin, matches, players, standings, tournaments, AppState};

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/standings", get(standings::get_standings))
        .route("/api/standings/overview", get(standings::get_overview))
        .route("/api/players", post(players::create_player))
        .route("/api/players/:id", get(players::get_player_profile))
        .route("/api/players/:id/active", post(players::set_player_active))
        .route("/api/players/:id/history", get(players::get_player_history))
        .route("/api/matches", post(matches::create_match).get(matches::list_matches))
        .route("/api/matches/:id", get(matches::get_match_detail))
        .route("/api/matches/:id/transition", post(matches::transition_match))
        .route("/api/matches/:id/report", post(matches::report_score))
        .route(
            "/api/tournaments",
            post(tournaments::create_tournament).get(tournaments::list_tournaments),
        )
        .route("/api/tournaments/:id", get(tournaments::get_tournament))
        .route("/api/tournaments/:id/register", post(tournaments::register))
        .route("/api/tournaments/:id/advance", post(tournaments::advance))
        .route("/api/tournaments/:id/finalize", post(tournaments::finalize))
        .route("/api/reports", post(admin::submit_report))
        .route("/api/reports/:id/handle", post(admin::handle_report))
        .route("/api/admin/reports", get(admin::list_open_reports))
        .route("/api/admin/dashboard", get(admin::get_dashboard))
        .route("/api/admin/snapshot", post(admin::capture_snapshot))
        .route("/api/notifications", get(players::get_notifications))
        .route(
            "/api/notifications/:id/read",
            post(players::mark_notification_read),
        )
        .with_state(state)
}
