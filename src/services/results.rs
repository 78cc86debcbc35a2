use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::database::models::{Match, NewRatingEntry};
use crate::database::{self, DbConn, DbPool};
use crate::domain::models::{MatchStatus, RatingResult, RatingTrack, SetScore};
use crate::elo::{self, Side};
use crate::errors::{EngineError, EngineResult};

use super::require_active_player;
use super::standings::StandingsCache;

/// What became of a submitted score sheet.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Stored; waiting for the other participant to confirm.
    AwaitingOpponent,
    /// Stored, but it contradicts the opponent's sheet; staff must resolve.
    MismatchHeld,
    /// Both sheets agreed and the match was completed.
    Completed(CompletionOutcome),
}

#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub match_id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub winner_delta: i32,
    pub loser_delta: i32,
    pub winner_rating: i32,
    pub loser_rating: i32,
}

pub struct ResultsService {
    pool: DbPool,
    config: AppConfig,
    cache: Arc<StandingsCache>,
}

impl ResultsService {
    pub fn new(pool: DbPool, config: AppConfig, cache: Arc<StandingsCache>) -> Self {
        Self {
            pool,
            config,
            cache,
        }
    }

    /// Files a participant's score sheet. The first sheet moves the match
    /// to `pending_validation`; an identical counter-report completes it,
    /// a contradicting one leaves it held for staff.
    pub fn report_score(
        &self,
        match_id: i64,
        actor_id: i64,
        sets: &[SetScore],
    ) -> EngineResult<ReportOutcome> {
        let mut conn = database::get_connection(&self.pool)?;
        let actor = require_active_player(&conn, actor_id)?;
        let match_row = database::matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;

        if !match_row.involves(actor.id) {
            return Err(EngineError::Authorization(
                "only a participant may report a score".to_string(),
            ));
        }

        // Malformed sheets are rejected before anything is stored.
        elo::summarize(match_row.best_of, sets)?;

        match match_row.status {
            MatchStatus::InProgress => self.file_first_report(&mut conn, &match_row, actor.id, sets),
            MatchStatus::PendingValidation => {
                self.file_counter_report(&mut conn, &match_row, actor.id, sets)
            }
            MatchStatus::Completed => Err(EngineError::AlreadyProcessed(match_id)),
            other => Err(EngineError::invalid_transition(
                other.as_str(),
                "report a score for",
            )),
        }
    }

    fn file_first_report(
        &self,
        conn: &mut DbConn,
        match_row: &Match,
        actor_id: i64,
        sets: &[SetScore],
    ) -> EngineResult<ReportOutcome> {
        let tx = conn.transaction()?;

        database::matches::upsert_report(&tx, match_row.id, actor_id, sets)?;
        let changed = database::matches::update_status(
            &tx,
            match_row.id,
            MatchStatus::InProgress,
            MatchStatus::PendingValidation,
        )?;
        if changed == 0 {
            return Err(stale_status(&tx, match_row.id, "report a score for"));
        }
        database::matches::insert_event(
            &tx,
            match_row.id,
            actor_id,
            MatchStatus::InProgress,
            MatchStatus::PendingValidation,
        )?;
        database::notifications::insert(
            &tx,
            match_row.opponent_of(actor_id),
            "Score reported",
            "Your opponent reported a score. Confirm it to finalize the match.",
            "match",
        )?;

        tx.commit()?;
        info!(
            "Match {}: first score report filed by player {}",
            match_row.id, actor_id
        );
        Ok(ReportOutcome::AwaitingOpponent)
    }

    fn file_counter_report(
        &self,
        conn: &mut DbConn,
        match_row: &Match,
        actor_id: i64,
        sets: &[SetScore],
    ) -> EngineResult<ReportOutcome> {
        let reports = database::matches::list_reports(conn, match_row.id)?;
        let other_report = reports.iter().find(|r| r.reporter_id != actor_id);

        match other_report {
            None => {
                // Re-filing before the opponent has answered replaces the
                // previous sheet.
                database::matches::upsert_report(conn, match_row.id, actor_id, sets)?;
                Ok(ReportOutcome::AwaitingOpponent)
            }
            Some(other) if other.set_scores.as_slice() == sets => {
                let outcome = run_completion(conn, match_row, sets, actor_id, &self.config)?;
                self.cache.bump();
                info!(
                    "Match {}: reports agreed, completed with winner {}",
                    match_row.id, outcome.winner_id
                );
                Ok(ReportOutcome::Completed(outcome))
            }
            Some(_) => {
                database::matches::upsert_report(conn, match_row.id, actor_id, sets)?;
                warn!(
                    "Match {}: conflicting score reports, held for staff",
                    match_row.id
                );
                Ok(ReportOutcome::MismatchHeld)
            }
        }
    }
}

/// Completes a `pending_validation` match: conditional status flip, Elo
/// deltas, two ledger appends, counter updates, audit event. Runs the
/// whole write set in one transaction, retrying a bounded number of times
/// when the ledger reports a consistency mismatch.
pub(crate) fn run_completion(
    conn: &mut DbConn,
    match_row: &Match,
    sets: &[SetScore],
    actor_id: i64,
    config: &AppConfig,
) -> EngineResult<CompletionOutcome> {
    let max_attempts = config.retry.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let tx = conn.transaction()?;

        match apply_completion(&tx, match_row, sets, actor_id, config) {
            Ok(outcome) => {
                database::matches::clear_reports(&tx, match_row.id)?;
                let body = format!(
                    "Final result recorded. Elo change: {:+} / {:+}.",
                    outcome.winner_delta, outcome.loser_delta
                );
                database::notifications::insert(&tx, outcome.winner_id, "Match completed", &body, "match")?;
                database::notifications::insert(&tx, outcome.loser_id, "Match completed", &body, "match")?;
                tx.commit()?;
                return Ok(outcome);
            }
            Err(err) if matches!(err, EngineError::Consistency(_)) && attempt < max_attempts => {
                warn!(
                    "Match {}: retrying completion after consistency failure (attempt {attempt}): {err}",
                    match_row.id
                );
                continue;
            }
            Err(err) => return Err(err),
        }
    }
}

fn apply_completion(
    tx: &Connection,
    match_row: &Match,
    sets: &[SetScore],
    actor_id: i64,
    config: &AppConfig,
) -> EngineResult<CompletionOutcome> {
    let summary = elo::summarize(match_row.best_of, sets)?;
    let (winner_id, loser_id) = match summary.winner {
        Side::Player1 => (match_row.player1_id, match_row.player2_id),
        Side::Player2 => (match_row.player2_id, match_row.player1_id),
    };

    let changed = database::matches::complete_match(
        tx,
        match_row.id,
        winner_id,
        summary.player1_sets,
        summary.player2_sets,
        sets,
        Utc::now().naive_utc(),
    )?;
    if changed == 0 {
        let current = database::matches::find_by_id(tx, match_row.id)?
            .ok_or_else(|| EngineError::not_found("match", match_row.id))?;
        if current.status == MatchStatus::Completed {
            return Err(EngineError::AlreadyProcessed(match_row.id));
        }
        return Err(EngineError::invalid_transition(
            current.status.as_str(),
            "complete",
        ));
    }

    let elo_default = config.elo.track_default(RatingTrack::Elo);
    let winner_before = database::ledger::current_rating(tx, winner_id, RatingTrack::Elo, elo_default)?;
    let loser_before = database::ledger::current_rating(tx, loser_id, RatingTrack::Elo, elo_default)?;
    let (winner_delta, loser_delta) = elo::match_deltas(winner_before, loser_before, &config.elo);

    database::ledger::append(
        tx,
        &NewRatingEntry {
            player_id: winner_id,
            track: RatingTrack::Elo,
            match_id: Some(match_row.id),
            tournament_id: None,
            rating_before: winner_before,
            delta: winner_delta,
            result: RatingResult::Win,
        },
        elo_default,
    )?;
    database::ledger::append(
        tx,
        &NewRatingEntry {
            player_id: loser_id,
            track: RatingTrack::Elo,
            match_id: Some(match_row.id),
            tournament_id: None,
            rating_before: loser_before,
            delta: loser_delta,
            result: RatingResult::Loss,
        },
        elo_default,
    )?;

    database::players::set_elo(tx, winner_id, winner_before + winner_delta)?;
    database::players::set_elo(tx, loser_id, loser_before + loser_delta)?;
    database::players::apply_match_outcome(
        tx,
        winner_id,
        loser_id,
        &summary,
        winner_id == match_row.player1_id,
    )?;
    database::matches::insert_event(
        tx,
        match_row.id,
        actor_id,
        MatchStatus::PendingValidation,
        MatchStatus::Completed,
    )?;

    Ok(CompletionOutcome {
        match_id: match_row.id,
        winner_id,
        loser_id,
        winner_delta,
        loser_delta,
        winner_rating: winner_before + winner_delta,
        loser_rating: loser_before + loser_delta,
    })
}

/// Re-reads the match after a lost conditional update and reports the
/// status it actually holds.
pub(crate) fn stale_status(conn: &Connection, match_id: i64, action: &str) -> EngineError {
    match database::matches::find_by_id(conn, match_id) {
        Ok(Some(current)) if current.status == MatchStatus::Completed => {
            EngineError::AlreadyProcessed(match_id)
        }
        Ok(Some(current)) => EngineError::invalid_transition(current.status.as_str(), action),
        Ok(None) => EngineError::not_found("match", match_id),
        Err(err) => err.into(),
    }
}
