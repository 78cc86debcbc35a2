use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::config::AppConfig;
use crate::database::models::{Match, UserReport};
use crate::database::{self, DbConn, DbPool};
use crate::domain::models::{MatchAction, MatchStatus, ReportStatus};
use crate::domain::transitions::{self, Actor};
use crate::errors::{EngineError, EngineResult};

use super::require_active_player;
use super::require_staff;
use super::results::{run_completion, stale_status, CompletionOutcome};
use super::standings::StandingsCache;

/// Counters for the staff dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ModerationSummary {
    pub pending_validation: i64,
    pub disputed: i64,
    pub open_reports: i64,
}

#[derive(Debug)]
pub enum TransitionOutcome {
    Moved(Match),
    Validated(CompletionOutcome),
}

pub struct ModerationService {
    pool: DbPool,
    config: AppConfig,
    cache: Arc<StandingsCache>,
}

impl ModerationService {
    pub fn new(pool: DbPool, config: AppConfig, cache: Arc<StandingsCache>) -> Self {
        Self {
            pool,
            config,
            cache,
        }
    }

    /// Applies a lifecycle action to a match on behalf of `actor_id`.
    ///
    /// The pure state machine decides whether the move is legal and who may
    /// make it; this method performs the corresponding writes. A rejected
    /// action leaves the match untouched.
    pub fn transition(
        &self,
        match_id: i64,
        actor_id: i64,
        action: MatchAction,
    ) -> EngineResult<TransitionOutcome> {
        let mut conn = database::get_connection(&self.pool)?;
        let player = require_active_player(&conn, actor_id)?;
        let match_row = database::matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;

        let actor = Actor::new(player.id, player.role);
        let target = transitions::apply(match_row.status, action, &actor, &match_row.participants())?;

        if action == MatchAction::Validate {
            let outcome = self.validate(&mut conn, &match_row, actor.id)?;
            return Ok(TransitionOutcome::Validated(outcome));
        }

        let tx = conn.transaction()?;
        let changed = match action {
            MatchAction::Start => {
                database::matches::mark_started(&tx, match_id, Utc::now().naive_utc())?
            }
            _ => database::matches::update_status(&tx, match_id, match_row.status, target)?,
        };
        if changed == 0 {
            return Err(stale_status(&tx, match_id, action.as_str()));
        }
        database::matches::insert_event(&tx, match_id, actor.id, match_row.status, target)?;

        match action {
            MatchAction::Accept => {
                database::notifications::insert(
                    &tx,
                    match_row.opponent_of(actor.id),
                    "Challenge accepted",
                    "Your challenge was accepted. Start the match when you are both ready.",
                    "match",
                )?;
            }
            MatchAction::Decline => {
                database::notifications::insert(
                    &tx,
                    match_row.opponent_of(actor.id),
                    "Challenge declined",
                    "Your challenge was declined.",
                    "match",
                )?;
            }
            MatchAction::Dispute => {
                for player_id in [match_row.player1_id, match_row.player2_id] {
                    database::notifications::insert(
                        &tx,
                        player_id,
                        "Match disputed",
                        "A staff member disputed the reported result. The match is frozen until it is reopened.",
                        "match",
                    )?;
                }
            }
            MatchAction::Reopen => {
                database::matches::clear_reports(&tx, match_id)?;
                for player_id in [match_row.player1_id, match_row.player2_id] {
                    database::notifications::insert(
                        &tx,
                        player_id,
                        "Match reopened",
                        "The dispute was resolved. Report the score again.",
                        "match",
                    )?;
                }
            }
            _ => {}
        }

        tx.commit()?;
        info!(
            "Match {match_id}: {} applied by player {} ({} -> {})",
            action.as_str(),
            actor.id,
            match_row.status.as_str(),
            target.as_str()
        );

        let updated = database::matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;
        Ok(TransitionOutcome::Moved(updated))
    }

    /// Staff validation: completes a held match using the filed sheet.
    /// With both reports on file the first reporter's sheet wins; on
    /// agreement the two are identical anyway.
    fn validate(
        &self,
        conn: &mut DbConn,
        match_row: &Match,
        actor_id: i64,
    ) -> EngineResult<CompletionOutcome> {
        let reports = database::matches::list_reports(conn, match_row.id)?;
        let Some(report) = reports.first() else {
            return Err(EngineError::Validation(
                "no score report has been filed for this match".to_string(),
            ));
        };

        let sets = report.set_scores.clone();
        let outcome = run_completion(conn, match_row, &sets, actor_id, &self.config)?;
        self.cache.bump();
        info!(
            "Match {}: validated by staff {}, winner {}",
            match_row.id, actor_id, outcome.winner_id
        );
        Ok(outcome)
    }

    /// Files a user-conduct report against another player.
    pub fn submit_report(
        &self,
        reporter_id: i64,
        reported_id: i64,
        reason: &str,
        description: Option<&str>,
    ) -> EngineResult<UserReport> {
        if reporter_id == reported_id {
            return Err(EngineError::validation("you cannot report yourself"));
        }
        if reason.trim().is_empty() {
            return Err(EngineError::validation("a report needs a reason"));
        }

        let conn = database::get_connection(&self.pool)?;
        require_active_player(&conn, reporter_id)?;
        database::players::find_by_id(&conn, reported_id)?
            .ok_or_else(|| EngineError::not_found("player", reported_id))?;

        let report =
            database::reports::insert_report(&conn, reporter_id, reported_id, reason, description)?;
        info!(
            "Player {reporter_id} reported player {reported_id} (report {})",
            report.id
        );
        Ok(report)
    }

    /// Staff resolution of a pending report. A report is handled at most
    /// once; a second resolution attempt is rejected.
    pub fn handle_report(
        &self,
        report_id: i64,
        actor_id: i64,
        approve: bool,
    ) -> EngineResult<UserReport> {
        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        let report = database::reports::find_by_id(&conn, report_id)?
            .ok_or_else(|| EngineError::not_found("user report", report_id))?;
        let status = if approve {
            ReportStatus::Approved
        } else {
            ReportStatus::Rejected
        };

        let changed =
            database::reports::resolve(&conn, report_id, status, actor_id, Utc::now().naive_utc())?;
        if changed == 0 {
            return Err(EngineError::invalid_transition(
                report.status.as_str(),
                "resolve",
            ));
        }

        database::reports::find_by_id(&conn, report_id)?
            .ok_or_else(|| EngineError::not_found("user report", report_id))
    }

    pub fn open_reports(&self, actor_id: i64) -> EngineResult<Vec<UserReport>> {
        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;
        Ok(database::reports::list_by_status(&conn, ReportStatus::Pending)?)
    }

    pub fn summary(&self, actor_id: i64) -> EngineResult<ModerationSummary> {
        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        Ok(ModerationSummary {
            pending_validation: database::matches::count_by_status(
                &conn,
                MatchStatus::PendingValidation,
            )?,
            disputed: database::matches::count_by_status(&conn, MatchStatus::Disputed)?,
            open_reports: database::reports::count_by_status(&conn, ReportStatus::Pending)?,
        })
    }
}
