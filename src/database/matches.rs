use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::models::{MatchStatus, MatchType, SetScore};

use super::models::{Match, MatchEvent, MatchReport};
use super::text_column;

const MATCH_COLUMNS: &str = "id, player1_id, player2_id, created_by, match_type, best_of, \
     status, player1_sets, player2_sets, set_scores, winner_id, \
     scheduled_at, location, notes, created_at, started_at, completed_at";

pub struct NewMatch<'a> {
    pub player1_id: i64,
    pub player2_id: i64,
    pub created_by: i64,
    pub match_type: MatchType,
    pub best_of: u8,
    pub scheduled_at: Option<NaiveDateTime>,
    pub location: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub fn insert_match(conn: &Connection, new_match: &NewMatch) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (player1_id, player2_id, created_by, match_type, best_of, \
         scheduled_at, location, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            new_match.player1_id,
            new_match.player2_id,
            new_match.created_by,
            new_match.match_type.as_str(),
            new_match.best_of,
            new_match.scheduled_at,
            new_match.location,
            new_match.notes,
        ],
        parse_match_row,
    )
    .context("Failed to insert new match")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

/// Status-conditioned update. Returns the number of rows changed, zero
/// meaning the match was no longer in `from` when the update ran.
pub fn update_status(
    conn: &Connection,
    id: i64,
    from: MatchStatus,
    to: MatchStatus,
) -> Result<usize> {
    conn.execute(
        "UPDATE matches SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![to.as_str(), id, from.as_str()],
    )
    .context("Failed to update match status")
}

pub fn mark_started(conn: &Connection, id: i64, started_at: NaiveDateTime) -> Result<usize> {
    conn.execute(
        "UPDATE matches SET status = ?1, started_at = ?2 WHERE id = ?3 AND status = ?4",
        params![
            MatchStatus::InProgress.as_str(),
            started_at,
            id,
            MatchStatus::Accepted.as_str(),
        ],
    )
    .context("Failed to mark match started")
}

/// Final write of a validated result, guarded on `pending_validation`.
#[allow(clippy::too_many_arguments)]
pub fn complete_match(
    conn: &Connection,
    id: i64,
    winner_id: i64,
    player1_sets: u32,
    player2_sets: u32,
    set_scores: &[SetScore],
    completed_at: NaiveDateTime,
) -> Result<usize> {
    let scores_json =
        serde_json::to_string(set_scores).context("Failed to serialize set scores")?;

    conn.execute(
        "UPDATE matches SET status = ?1, winner_id = ?2, player1_sets = ?3, \
         player2_sets = ?4, set_scores = ?5, completed_at = ?6 \
         WHERE id = ?7 AND status = ?8",
        params![
            MatchStatus::Completed.as_str(),
            winner_id,
            player1_sets,
            player2_sets,
            scores_json,
            completed_at,
            id,
            MatchStatus::PendingValidation.as_str(),
        ],
    )
    .context("Failed to complete match")
}

pub fn list_for_player_with_statuses(
    conn: &Connection,
    player_id: i64,
    statuses: &[MatchStatus],
) -> Result<Vec<Match>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    let status_list = statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches \
         WHERE (player1_id = ?1 OR player2_id = ?1) AND status IN ({status_list}) \
         ORDER BY created_at DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_recent_completed(conn: &Connection, player_id: i64, limit: usize) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches \
         WHERE (player1_id = ?1 OR player2_id = ?1) AND status = 'completed' \
         ORDER BY completed_at DESC LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id, limit as i64], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_by_status(conn: &Connection, status: MatchStatus) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM matches WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )
    .context("Failed to count matches by status")
}

pub fn count_all(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
        .context("Failed to count matches")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        player1_id: row.get(1)?,
        player2_id: row.get(2)?,
        created_by: row.get(3)?,
        match_type: text_column(4, row.get(4)?, MatchType::parse)?,
        best_of: row.get(5)?,
        status: text_column(6, row.get(6)?, MatchStatus::parse)?,
        player1_sets: row.get(7)?,
        player2_sets: row.get(8)?,
        set_scores: parse_set_scores(9, row.get(9)?)?,
        winner_id: row.get(10)?,
        scheduled_at: row.get(11)?,
        location: row.get(12)?,
        notes: row.get(13)?,
        created_at: row.get(14)?,
        started_at: row.get(15)?,
        completed_at: row.get(16)?,
    })
}

fn parse_set_scores(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<Vec<SetScore>>> {
    match raw {
        Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
        None => Ok(None),
    }
}

// --- Score reports ---

pub fn upsert_report(
    conn: &Connection,
    match_id: i64,
    reporter_id: i64,
    set_scores: &[SetScore],
) -> Result<MatchReport> {
    let scores_json =
        serde_json::to_string(set_scores).context("Failed to serialize set scores")?;
    let sql = "INSERT INTO match_reports (match_id, reporter_id, set_scores) \
               VALUES (?1, ?2, ?3) \
               ON CONFLICT (match_id, reporter_id) DO UPDATE SET set_scores = ?3 \
               RETURNING id, match_id, reporter_id, set_scores, created_at";

    conn.query_row(sql, params![match_id, reporter_id, scores_json], parse_report_row)
        .context("Failed to store score report")
}

pub fn list_reports(conn: &Connection, match_id: i64) -> Result<Vec<MatchReport>> {
    let sql = "SELECT id, match_id, reporter_id, set_scores, created_at \
               FROM match_reports WHERE match_id = ?1 ORDER BY created_at, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_report_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn clear_reports(conn: &Connection, match_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM match_reports WHERE match_id = ?1",
        params![match_id],
    )
    .context("Failed to clear score reports")
}

fn parse_report_row(row: &rusqlite::Row) -> rusqlite::Result<MatchReport> {
    let raw: String = row.get(3)?;
    let set_scores = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(MatchReport {
        id: row.get(0)?,
        match_id: row.get(1)?,
        reporter_id: row.get(2)?,
        set_scores,
        created_at: row.get(4)?,
    })
}

// --- Transition audit trail ---

pub fn insert_event(
    conn: &Connection,
    match_id: i64,
    actor_id: i64,
    from: MatchStatus,
    to: MatchStatus,
) -> Result<()> {
    conn.execute(
        "INSERT INTO match_events (match_id, actor_id, from_status, to_status) \
         VALUES (?1, ?2, ?3, ?4)",
        params![match_id, actor_id, from.as_str(), to.as_str()],
    )
    .context("Failed to record match event")
    .map(|_| ())
}

pub fn list_events(conn: &Connection, match_id: i64) -> Result<Vec<MatchEvent>> {
    let sql = "SELECT id, match_id, actor_id, from_status, to_status, created_at \
               FROM match_events WHERE match_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], |row| {
            Ok(MatchEvent {
                id: row.get(0)?,
                match_id: row.get(1)?,
                actor_id: row.get(2)?,
                from_status: text_column(3, row.get(3)?, MatchStatus::parse)?,
                to_status: text_column(4, row.get(4)?, MatchStatus::parse)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
