use chrono::NaiveDateTime;
use log::info;

use crate::database::matches::NewMatch;
use crate::database::models::{Match, MatchEvent, MatchReport};
use crate::database::{self, DbPool};
use crate::domain::models::{MatchStatus, MatchType};
use crate::elo::VALID_BEST_OF;
use crate::errors::{EngineError, EngineResult};

use super::require_active_player;

/// Player-facing grouping of the match lifecycle, for list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBucket {
    Pending,
    Accepted,
    InProgress,
    PendingValidation,
    Finished,
}

impl MatchBucket {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatchBucket::Pending),
            "accepted" => Some(MatchBucket::Accepted),
            "in_progress" => Some(MatchBucket::InProgress),
            "pending_validation" => Some(MatchBucket::PendingValidation),
            "finished" => Some(MatchBucket::Finished),
            _ => None,
        }
    }

    /// Disputed matches stay in the validation bucket: they are waiting
    /// on staff, not finished.
    pub fn statuses(&self) -> &'static [MatchStatus] {
        match self {
            MatchBucket::Pending => &[MatchStatus::Pending],
            MatchBucket::Accepted => &[MatchStatus::Accepted],
            MatchBucket::InProgress => &[MatchStatus::InProgress],
            MatchBucket::PendingValidation => {
                &[MatchStatus::PendingValidation, MatchStatus::Disputed]
            }
            MatchBucket::Finished => &[MatchStatus::Completed, MatchStatus::Declined],
        }
    }
}

pub struct CreateChallenge {
    pub opponent_id: i64,
    pub match_type: MatchType,
    pub best_of: u8,
    pub scheduled_at: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct MatchDetail {
    pub match_row: Match,
    pub reports: Vec<MatchReport>,
    pub events: Vec<MatchEvent>,
}

pub struct MatchService {
    pool: DbPool,
}

impl MatchService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Issues a challenge. The creator is always `player1`; the invited
    /// opponent gets the accept/decline call.
    pub fn create_challenge(
        &self,
        creator_id: i64,
        input: &CreateChallenge,
    ) -> EngineResult<Match> {
        if creator_id == input.opponent_id {
            return Err(EngineError::validation("you cannot challenge yourself"));
        }
        if !VALID_BEST_OF.contains(&input.best_of) {
            return Err(EngineError::Validation(format!(
                "best_of must be one of {VALID_BEST_OF:?}, got {}",
                input.best_of
            )));
        }

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let creator = require_active_player(&tx, creator_id)?;
        let opponent = require_active_player(&tx, input.opponent_id)?;

        let match_row = database::matches::insert_match(
            &tx,
            &NewMatch {
                player1_id: creator.id,
                player2_id: opponent.id,
                created_by: creator.id,
                match_type: input.match_type,
                best_of: input.best_of,
                scheduled_at: input.scheduled_at,
                location: input.location.as_deref(),
                notes: input.notes.as_deref(),
            },
        )?;
        database::notifications::insert(
            &tx,
            opponent.id,
            "New challenge",
            &format!(
                "{} challenged you to a best-of-{} match.",
                creator.display_name(),
                input.best_of
            ),
            "match",
        )?;
        tx.commit()?;

        info!(
            "Match {} created: {} vs {} (best of {})",
            match_row.id, creator.id, opponent.id, input.best_of
        );
        Ok(match_row)
    }

    pub fn list_for_player(
        &self,
        player_id: i64,
        bucket: Option<MatchBucket>,
    ) -> EngineResult<Vec<Match>> {
        let conn = database::get_connection(&self.pool)?;
        database::players::find_by_id(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))?;

        let statuses: &[MatchStatus] = match bucket {
            Some(ref bucket) => bucket.statuses(),
            None => MatchStatus::ALL,
        };
        Ok(database::matches::list_for_player_with_statuses(
            &conn, player_id, statuses,
        )?)
    }

    pub fn detail(&self, match_id: i64) -> EngineResult<MatchDetail> {
        let conn = database::get_connection(&self.pool)?;
        let match_row = database::matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;
        let reports = database::matches::list_reports(&conn, match_id)?;
        let events = database::matches::list_events(&conn, match_id)?;

        Ok(MatchDetail {
            match_row,
            reports,
            events,
        })
    }
}
