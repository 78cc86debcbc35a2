//! Shared fixtures for the integration suite: an in-memory database with
//! the schema applied, seeded players and ready-made service instances.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};

use jdd_platform::config::AppConfig;
use jdd_platform::database::{self, DbPool};
use jdd_platform::domain::models::{MatchAction, MatchType, Role, SetScore, TournamentFormat};
use jdd_platform::services::matches::{CreateChallenge, MatchService};
use jdd_platform::services::moderation::ModerationService;
use jdd_platform::services::players::PlayerService;
use jdd_platform::services::results::ResultsService;
use jdd_platform::services::standings::{StandingsCache, StandingsService};
use jdd_platform::services::tournaments::{CreateTournament, TournamentService};

pub struct Fixture {
    pub pool: DbPool,
    pub config: AppConfig,
    pub cache: Arc<StandingsCache>,
}

/// Fresh in-memory database with the schema applied. The pool is capped
/// at one connection, so every helper releases its connection before a
/// service runs.
pub fn fixture() -> Fixture {
    let pool = database::create_memory_pool().expect("in-memory pool");
    {
        let conn = database::get_connection(&pool).expect("connection");
        database::setup::reset_database(&conn).expect("schema");
    }
    Fixture {
        pool,
        config: AppConfig::new(),
        cache: Arc::new(StandingsCache::default()),
    }
}

impl Fixture {
    pub fn add_player(&self, username: &str) -> i64 {
        self.add_with_role(username, Role::Player)
    }

    pub fn add_staff(&self, username: &str) -> i64 {
        self.add_with_role(username, Role::Staff)
    }

    pub fn add_with_role(&self, username: &str, role: Role) -> i64 {
        let conn = database::get_connection(&self.pool).expect("connection");
        database::players::create_player(
            &conn,
            username,
            username,
            "Tester",
            role,
            self.config.elo.default_rating,
        )
        .expect("player row")
        .id
    }

    pub fn players(&self) -> PlayerService {
        PlayerService::new(
            self.pool.clone(),
            self.config.clone(),
            Arc::clone(&self.cache),
        )
    }

    pub fn matches(&self) -> MatchService {
        MatchService::new(self.pool.clone())
    }

    pub fn results(&self) -> ResultsService {
        ResultsService::new(
            self.pool.clone(),
            self.config.clone(),
            Arc::clone(&self.cache),
        )
    }

    pub fn moderation(&self) -> ModerationService {
        ModerationService::new(
            self.pool.clone(),
            self.config.clone(),
            Arc::clone(&self.cache),
        )
    }

    pub fn tournaments(&self) -> TournamentService {
        TournamentService::new(
            self.pool.clone(),
            self.config.clone(),
            Arc::clone(&self.cache),
        )
    }

    pub fn standings(&self) -> StandingsService {
        StandingsService::new(self.pool.clone(), Arc::clone(&self.cache))
    }
}

/// Best-of-3 ranked challenge against the given opponent.
pub fn challenge(opponent_id: i64) -> CreateChallenge {
    CreateChallenge {
        opponent_id,
        match_type: MatchType::Ranked,
        best_of: 3,
        scheduled_at: None,
        location: None,
        notes: None,
    }
}

/// Score sheet from (player1 games, player2 games) pairs.
pub fn sheet(sets: &[(u32, u32)]) -> Vec<SetScore> {
    sets.iter().map(|&(p1, p2)| SetScore::new(p1, p2)).collect()
}

/// Drives a fresh challenge to `in_progress`: created by `creator`,
/// accepted by the opponent, started by the creator.
pub fn start_match(fx: &Fixture, creator: i64, opponent: i64) -> i64 {
    let match_row = fx
        .matches()
        .create_challenge(creator, &challenge(opponent))
        .expect("challenge created");
    fx.moderation()
        .transition(match_row.id, opponent, MatchAction::Accept)
        .expect("challenge accepted");
    fx.moderation()
        .transition(match_row.id, creator, MatchAction::Start)
        .expect("match started");
    match_row.id
}

/// Tournament input a week out with the standard point table.
pub fn tournament_input(name: &str, max_participants: i32) -> CreateTournament {
    let start = Utc::now().naive_utc() + Duration::days(7);
    CreateTournament {
        name: name.to_string(),
        description: None,
        location: None,
        start_date: start,
        end_date: None,
        registration_deadline: start - Duration::days(1),
        max_participants,
        entry_fee: 0.0,
        prize_pool: 0.0,
        format: TournamentFormat::SingleElimination,
        points_winner: 100,
        points_finalist: 60,
        points_semifinalist: 35,
        points_quarterfinalist: 20,
    }
}
