use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::models::{RatingResult, RatingTrack};
use crate::errors::{EngineError, EngineResult};

use super::models::{NewRatingEntry, RatingEntry};
use super::text_column;

const ENTRY_COLUMNS: &str = "id, player_id, track, match_id, tournament_id, \
     rating_before, rating_after, delta, result, created_at";

/// Last `rating_after` on the track, or the track default when the player
/// has no entries yet.
pub fn current_rating(
    conn: &Connection,
    player_id: i64,
    track: RatingTrack,
    track_default: i32,
) -> Result<i32> {
    let sql = "SELECT rating_after FROM rating_entries \
               WHERE player_id = ?1 AND track = ?2 ORDER BY id DESC LIMIT 1";

    let latest: Option<i32> = conn
        .query_row(sql, params![player_id, track.as_str()], |row| row.get(0))
        .optional()
        .context("Failed to read current rating")?;

    Ok(latest.unwrap_or(track_default))
}

/// Appends one entry, enforcing the chain invariant: `rating_before` must
/// equal the last `rating_after` on this track (or the track default for a
/// first entry). Run inside the caller's transaction so the check and the
/// insert are atomic.
pub fn append(
    conn: &Connection,
    entry: &NewRatingEntry,
    track_default: i32,
) -> EngineResult<RatingEntry> {
    let expected = current_rating(conn, entry.player_id, entry.track, track_default)?;
    if entry.rating_before != expected {
        return Err(EngineError::Consistency(format!(
            "player {} {} entry starts at {} but the ledger ends at {}",
            entry.player_id,
            entry.track.as_str(),
            entry.rating_before,
            expected
        )));
    }

    let sql = format!(
        "INSERT INTO rating_entries (player_id, track, match_id, tournament_id, \
         rating_before, rating_after, delta, result) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {ENTRY_COLUMNS}"
    );

    let inserted = conn
        .query_row(
            &sql,
            params![
                entry.player_id,
                entry.track.as_str(),
                entry.match_id,
                entry.tournament_id,
                entry.rating_before,
                entry.rating_after(),
                entry.delta,
                entry.result.as_str(),
            ],
            parse_entry_row,
        )
        .context("Failed to append rating entry")?;

    Ok(inserted)
}

/// Entry history for a player on one track, newest first.
pub fn history(
    conn: &Connection,
    player_id: i64,
    track: RatingTrack,
    limit: usize,
) -> Result<Vec<RatingEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM rating_entries \
         WHERE player_id = ?1 AND track = ?2 ORDER BY id DESC LIMIT ?3"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![player_id, track.as_str(), limit as i64],
            parse_entry_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn entries_for_match(conn: &Connection, match_id: i64) -> Result<Vec<RatingEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM rating_entries WHERE match_id = ?1 ORDER BY id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_for_player(conn: &Connection, player_id: i64, track: RatingTrack) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM rating_entries WHERE player_id = ?1 AND track = ?2",
        params![player_id, track.as_str()],
        |row| row.get(0),
    )
    .context("Failed to count rating entries")
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<RatingEntry> {
    Ok(RatingEntry {
        id: row.get(0)?,
        player_id: row.get(1)?,
        track: text_column(2, row.get(2)?, RatingTrack::parse)?,
        match_id: row.get(3)?,
        tournament_id: row.get(4)?,
        rating_before: row.get(5)?,
        rating_after: row.get(6)?,
        delta: row.get(7)?,
        result: text_column(8, row.get(8)?, RatingResult::parse)?,
        created_at: row.get(9)?,
    })
}
