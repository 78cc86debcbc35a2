use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use log::{info, warn};

use crate::config::AppConfig;
use crate::database::models::{NewRatingEntry, Tournament, TournamentParticipant};
use crate::database::tournaments::NewTournament;
use crate::database::{self, DbPool};
use crate::domain::models::{Placement, RatingResult, RatingTrack, TournamentFormat, TournamentStatus};
use crate::errors::{EngineError, EngineResult};

use super::standings::StandingsCache;
use super::{require_active_player, require_staff};

pub struct CreateTournament {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub registration_deadline: NaiveDateTime,
    pub max_participants: i32,
    pub entry_fee: f64,
    pub prize_pool: f64,
    pub format: TournamentFormat,
    pub points_winner: i32,
    pub points_finalist: i32,
    pub points_semifinalist: i32,
    pub points_quarterfinalist: i32,
}

#[derive(Debug, Clone)]
pub struct PointAward {
    pub player_id: i64,
    pub placement: Placement,
    pub points: i32,
    pub atp_after: i32,
}

#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub tournament_id: i64,
    pub awards: Vec<PointAward>,
}

#[derive(Debug)]
pub struct TournamentDetail {
    pub tournament: Tournament,
    pub participants: Vec<TournamentParticipant>,
}

#[derive(Debug)]
pub struct TournamentSummary {
    pub tournament: Tournament,
    pub participant_count: i64,
}

pub struct TournamentService {
    pool: DbPool,
    config: AppConfig,
    cache: Arc<StandingsCache>,
}

impl TournamentService {
    pub fn new(pool: DbPool, config: AppConfig, cache: Arc<StandingsCache>) -> Self {
        Self {
            pool,
            config,
            cache,
        }
    }

    pub fn create(&self, actor_id: i64, input: &CreateTournament) -> EngineResult<Tournament> {
        if input.name.trim().is_empty() {
            return Err(EngineError::validation("a tournament needs a name"));
        }
        if input.max_participants < 2 {
            return Err(EngineError::validation(
                "a tournament needs room for at least 2 participants",
            ));
        }
        if input.registration_deadline > input.start_date {
            return Err(EngineError::validation(
                "registration must close before the tournament starts",
            ));
        }
        let points = [
            input.points_winner,
            input.points_finalist,
            input.points_semifinalist,
            input.points_quarterfinalist,
        ];
        if points.iter().any(|p| *p < 0) {
            return Err(EngineError::validation("point values cannot be negative"));
        }

        let conn = database::get_connection(&self.pool)?;
        let creator = require_active_player(&conn, actor_id)?;

        let tournament = database::tournaments::insert_tournament(
            &conn,
            &NewTournament {
                name: input.name.trim(),
                description: input.description.as_deref(),
                location: input.location.as_deref(),
                start_date: input.start_date,
                end_date: input.end_date,
                registration_deadline: input.registration_deadline,
                max_participants: input.max_participants,
                entry_fee: input.entry_fee,
                prize_pool: input.prize_pool,
                format: input.format,
                points_winner: input.points_winner,
                points_finalist: input.points_finalist,
                points_semifinalist: input.points_semifinalist,
                points_quarterfinalist: input.points_quarterfinalist,
                created_by: creator.id,
            },
        )?;
        info!(
            "Tournament {} ({}) created by player {}",
            tournament.id, tournament.name, creator.id
        );
        Ok(tournament)
    }

    pub fn list(&self) -> EngineResult<Vec<TournamentSummary>> {
        let conn = database::get_connection(&self.pool)?;
        let mut summaries = Vec::new();
        for tournament in database::tournaments::list_all(&conn)? {
            let participant_count =
                database::tournaments::count_participants(&conn, tournament.id)?;
            summaries.push(TournamentSummary {
                tournament,
                participant_count,
            });
        }
        Ok(summaries)
    }

    pub fn detail(&self, tournament_id: i64) -> EngineResult<TournamentDetail> {
        let conn = database::get_connection(&self.pool)?;
        let tournament = database::tournaments::find_by_id(&conn, tournament_id)?
            .ok_or_else(|| EngineError::not_found("tournament", tournament_id))?;
        let participants = database::tournaments::list_participants(&conn, tournament_id)?;
        Ok(TournamentDetail {
            tournament,
            participants,
        })
    }

    /// Signs a player up. The capacity check and the insert share one
    /// transaction so two racing registrations cannot both squeeze into
    /// the last slot.
    pub fn register(&self, tournament_id: i64, player_id: i64) -> EngineResult<()> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        require_active_player(&tx, player_id)?;
        let tournament = database::tournaments::find_by_id(&tx, tournament_id)?
            .ok_or_else(|| EngineError::not_found("tournament", tournament_id))?;

        if tournament.status != TournamentStatus::RegistrationOpen {
            return Err(EngineError::invalid_transition(
                tournament.status.as_str(),
                "register for",
            ));
        }
        if Utc::now().naive_utc() > tournament.registration_deadline {
            return Err(EngineError::validation(
                "the registration deadline has passed",
            ));
        }
        if database::tournaments::find_participant(&tx, tournament_id, player_id)?.is_some() {
            return Err(EngineError::validation(
                "you are already registered for this tournament",
            ));
        }
        let registered = database::tournaments::count_participants(&tx, tournament_id)?;
        if registered >= i64::from(tournament.max_participants) {
            return Err(EngineError::Capacity(tournament_id));
        }

        database::tournaments::insert_participant(
            &tx,
            tournament_id,
            player_id,
            Utc::now().naive_utc(),
        )?;
        database::notifications::insert(
            &tx,
            player_id,
            "Registration confirmed",
            &format!("You are registered for {}.", tournament.name),
            "tournament",
        )?;
        tx.commit()?;

        info!("Player {player_id} registered for tournament {tournament_id}");
        Ok(())
    }

    /// Moves a tournament one step forward: `upcoming` to
    /// `registration_open` to `in_progress`. Completion is reserved for
    /// `finalize`.
    pub fn advance(&self, tournament_id: i64, actor_id: i64) -> EngineResult<Tournament> {
        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        let tournament = database::tournaments::find_by_id(&conn, tournament_id)?
            .ok_or_else(|| EngineError::not_found("tournament", tournament_id))?;
        let next = tournament
            .status
            .next()
            .ok_or_else(|| EngineError::invalid_transition(tournament.status.as_str(), "advance"))?;

        let changed =
            database::tournaments::update_status(&conn, tournament_id, tournament.status, next)?;
        if changed == 0 {
            let current = database::tournaments::find_by_id(&conn, tournament_id)?
                .ok_or_else(|| EngineError::not_found("tournament", tournament_id))?;
            return Err(EngineError::invalid_transition(
                current.status.as_str(),
                "advance",
            ));
        }

        info!(
            "Tournament {tournament_id}: {} -> {} by staff {actor_id}",
            tournament.status.as_str(),
            next.as_str()
        );
        database::tournaments::find_by_id(&conn, tournament_id)?
            .ok_or_else(|| EngineError::not_found("tournament", tournament_id))
    }

    /// Closes the tournament and pays out ATP points per placement. The
    /// whole award set is one transaction guarded by the `finalized` flag,
    /// so a tournament pays out exactly once no matter how many staff
    /// members press the button.
    pub fn finalize(
        &self,
        tournament_id: i64,
        actor_id: i64,
        placements: &HashMap<i64, Placement>,
    ) -> EngineResult<FinalizeOutcome> {
        let mut conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let tx = conn.transaction()?;

            match apply_finalize(&tx, tournament_id, placements, &self.config) {
                Ok(outcome) => {
                    tx.commit()?;
                    self.cache.bump();
                    info!(
                        "Tournament {tournament_id} finalized by staff {actor_id} ({} awards)",
                        outcome.awards.len()
                    );
                    return Ok(outcome);
                }
                Err(err) if matches!(err, EngineError::Consistency(_)) && attempt < max_attempts => {
                    warn!(
                        "Tournament {tournament_id}: retrying finalize after consistency failure \
                         (attempt {attempt}): {err}"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn apply_finalize(
    tx: &rusqlite::Connection,
    tournament_id: i64,
    placements: &HashMap<i64, Placement>,
    config: &AppConfig,
) -> EngineResult<FinalizeOutcome> {
    let tournament = database::tournaments::find_by_id(tx, tournament_id)?
        .ok_or_else(|| EngineError::not_found("tournament", tournament_id))?;
    if tournament.finalized {
        return Err(EngineError::AlreadyFinalized(tournament_id));
    }
    if tournament.status != TournamentStatus::InProgress {
        return Err(EngineError::invalid_transition(
            tournament.status.as_str(),
            "finalize",
        ));
    }

    let participants = database::tournaments::list_participants(tx, tournament_id)?;
    check_placements(&participants, placements)?;

    let changed = database::tournaments::mark_finalized(tx, tournament_id)?;
    if changed == 0 {
        return Err(EngineError::AlreadyFinalized(tournament_id));
    }

    let atp_default = config.elo.track_default(RatingTrack::Atp);
    let mut awards = Vec::with_capacity(participants.len());

    for participant in &participants {
        let placement = placements[&participant.player_id];
        let points = tournament.points_for(placement);

        let atp_after = if points > 0 {
            let before =
                database::ledger::current_rating(tx, participant.player_id, RatingTrack::Atp, atp_default)?;
            database::ledger::append(
                tx,
                &NewRatingEntry {
                    player_id: participant.player_id,
                    track: RatingTrack::Atp,
                    match_id: None,
                    tournament_id: Some(tournament_id),
                    rating_before: before,
                    delta: points,
                    result: RatingResult::Award,
                },
                atp_default,
            )?;
            database::players::set_atp_points(tx, participant.player_id, before + points)?;
            before + points
        } else {
            database::ledger::current_rating(tx, participant.player_id, RatingTrack::Atp, atp_default)?
        };

        database::tournaments::set_participant_result(
            tx,
            tournament_id,
            participant.player_id,
            placement,
            points,
        )?;

        if placement == Placement::Winner {
            database::players::increment_tournaments_won(tx, participant.player_id)?;
        }
        database::notifications::insert(
            tx,
            participant.player_id,
            "Tournament finalized",
            &format!(
                "{} is finished. Your placement: {} ({:+} points).",
                tournament.name,
                placement.as_str(),
                points
            ),
            "tournament",
        )?;

        awards.push(PointAward {
            player_id: participant.player_id,
            placement,
            points,
            atp_after,
        });
    }

    Ok(FinalizeOutcome {
        tournament_id,
        awards,
    })
}

/// Every participant must be placed, nobody else may be, and the bracket
/// produces exactly one winner.
fn check_placements(
    participants: &[TournamentParticipant],
    placements: &HashMap<i64, Placement>,
) -> EngineResult<()> {
    let missing: Vec<String> = participants
        .iter()
        .filter(|p| !placements.contains_key(&p.player_id))
        .map(|p| p.player_id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::IncompletePlacement(format!(
            "no placement for participant(s) {}",
            missing.join(", ")
        )));
    }

    for player_id in placements.keys() {
        if !participants.iter().any(|p| p.player_id == *player_id) {
            return Err(EngineError::Validation(format!(
                "player {player_id} is not a participant of this tournament"
            )));
        }
    }

    let winners = placements
        .values()
        .filter(|p| **p == Placement::Winner)
        .count();
    if winners != 1 {
        return Err(EngineError::Validation(format!(
            "a bracket produces exactly one winner, got {winners}"
        )));
    }

    Ok(())
}
