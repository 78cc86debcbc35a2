use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::domain::models::RatingTrack;

/// Replaces a track's snapshot wholesale with the given (player, rank)
/// pairs. Run inside a transaction so readers never see a half capture.
pub fn replace_track(
    conn: &Connection,
    track: RatingTrack,
    ranks: &[(i64, i64)],
    captured_at: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        "DELETE FROM rank_snapshots WHERE track = ?1",
        params![track.as_str()],
    )
    .context("Failed to clear previous snapshot")?;

    let mut stmt = conn
        .prepare(
            "INSERT INTO rank_snapshots (track, player_id, rank, captured_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .context("Failed to prepare snapshot insert")?;

    for (player_id, rank) in ranks {
        stmt.execute(params![track.as_str(), player_id, rank, captured_at])
            .context("Failed to insert snapshot row")?;
    }

    Ok(())
}

/// Previous ranks by player for a track. Empty when no snapshot was taken.
pub fn load_track(conn: &Connection, track: RatingTrack) -> Result<HashMap<i64, i64>> {
    let sql = "SELECT player_id, rank FROM rank_snapshots WHERE track = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![track.as_str()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows.into_iter().collect())
}
