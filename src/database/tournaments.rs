use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::models::{Placement, TournamentFormat, TournamentStatus};

use super::models::{Tournament, TournamentParticipant};
use super::text_column;

const TOURNAMENT_COLUMNS: &str = "id, name, description, location, start_date, end_date, \
     registration_deadline, max_participants, entry_fee, prize_pool, format, status, \
     points_winner, points_finalist, points_semifinalist, points_quarterfinalist, \
     finalized, created_by, created_at";

pub struct NewTournament<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
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
    pub created_by: i64,
}

pub fn insert_tournament(conn: &Connection, new: &NewTournament) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (name, description, location, start_date, end_date, \
         registration_deadline, max_participants, entry_fee, prize_pool, format, \
         points_winner, points_finalist, points_semifinalist, points_quarterfinalist, \
         created_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15) \
         RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            new.name,
            new.description,
            new.location,
            new.start_date,
            new.end_date,
            new.registration_deadline,
            new.max_participants,
            new.entry_fee,
            new.prize_pool,
            new.format.as_str(),
            new.points_winner,
            new.points_finalist,
            new.points_semifinalist,
            new.points_quarterfinalist,
            new.created_by,
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY start_date DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_status(
    conn: &Connection,
    id: i64,
    from: TournamentStatus,
    to: TournamentStatus,
) -> Result<usize> {
    conn.execute(
        "UPDATE tournaments SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![to.as_str(), id, from.as_str()],
    )
    .context("Failed to update tournament status")
}

/// The exactly-once guard: flips `finalized` and closes the tournament in
/// one conditional update. Zero rows means someone already finalized it.
pub fn mark_finalized(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute(
        "UPDATE tournaments SET finalized = 1, status = ?1 \
         WHERE id = ?2 AND finalized = 0",
        params![TournamentStatus::Completed.as_str(), id],
    )
    .context("Failed to mark tournament finalized")
}

pub fn count_all(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM tournaments", [], |row| row.get(0))
        .context("Failed to count tournaments")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        registration_deadline: row.get(6)?,
        max_participants: row.get(7)?,
        entry_fee: row.get(8)?,
        prize_pool: row.get(9)?,
        format: text_column(10, row.get(10)?, TournamentFormat::parse)?,
        status: text_column(11, row.get(11)?, TournamentStatus::parse)?,
        points_winner: row.get(12)?,
        points_finalist: row.get(13)?,
        points_semifinalist: row.get(14)?,
        points_quarterfinalist: row.get(15)?,
        finalized: row.get(16)?,
        created_by: row.get(17)?,
        created_at: row.get(18)?,
    })
}

// --- Participants ---

pub fn insert_participant(
    conn: &Connection,
    tournament_id: i64,
    player_id: i64,
    registered_at: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        "INSERT INTO tournament_participants (tournament_id, player_id, registered_at) \
         VALUES (?1, ?2, ?3)",
        params![tournament_id, player_id, registered_at],
    )
    .context("Failed to register participant")
    .map(|_| ())
}

pub fn find_participant(
    conn: &Connection,
    tournament_id: i64,
    player_id: i64,
) -> Result<Option<TournamentParticipant>> {
    let sql = participant_select("tp.tournament_id = ?1 AND tp.player_id = ?2");

    conn.query_row(&sql, params![tournament_id, player_id], parse_participant_row)
        .optional()
        .context("Failed to query participant")
}

pub fn list_participants(
    conn: &Connection,
    tournament_id: i64,
) -> Result<Vec<TournamentParticipant>> {
    let sql = format!(
        "{} ORDER BY tp.registered_at, tp.player_id",
        participant_select("tp.tournament_id = ?1")
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_participants(conn: &Connection, tournament_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tournament_participants WHERE tournament_id = ?1",
        params![tournament_id],
        |row| row.get(0),
    )
    .context("Failed to count participants")
}

pub fn set_participant_result(
    conn: &Connection,
    tournament_id: i64,
    player_id: i64,
    placement: Placement,
    points_awarded: i32,
) -> Result<()> {
    conn.execute(
        "UPDATE tournament_participants SET placement = ?1, points_awarded = ?2 \
         WHERE tournament_id = ?3 AND player_id = ?4",
        params![placement.as_str(), points_awarded, tournament_id, player_id],
    )
    .context("Failed to record participant result")
    .map(|_| ())
}

fn participant_select(where_clause: &str) -> String {
    format!(
        "SELECT tp.tournament_id, tp.player_id, p.username, p.first_name, p.last_name, \
         tp.registered_at, tp.placement, tp.points_awarded \
         FROM tournament_participants tp \
         JOIN players p ON p.id = tp.player_id \
         WHERE {where_clause}"
    )
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentParticipant> {
    let placement: Option<String> = row.get(6)?;
    let placement = match placement {
        Some(raw) => Some(text_column(6, raw, Placement::parse)?),
        None => None,
    };

    Ok(TournamentParticipant {
        tournament_id: row.get(0)?,
        player_id: row.get(1)?,
        username: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        registered_at: row.get(5)?,
        placement,
        points_awarded: row.get(7)?,
    })
}
