use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::info;
use rusqlite::Connection;

use crate::database::models::PlayerWithStats;
use crate::database::{self, DbPool};
use crate::domain::models::{RankMovement, RatingTrack};
use crate::errors::EngineResult;
use crate::standings;

/// Memoized standings, invalidated by a generation counter that every
/// rating write bumps. A lookup only hits when the cached table was
/// computed at the current generation.
#[derive(Default)]
pub struct StandingsCache {
    generation: AtomicU64,
    cached: Mutex<HashMap<RatingTrack, CachedTrack>>,
}

#[derive(Clone)]
struct CachedTrack {
    generation: u64,
    rows: Vec<RankedStanding>,
}

impl StandingsCache {
    pub fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn lookup(&self, track: RatingTrack, generation: u64) -> Option<Vec<RankedStanding>> {
        let Ok(guard) = self.cached.lock() else {
            return None;
        };
        guard
            .get(&track)
            .filter(|entry| entry.generation == generation)
            .map(|entry| entry.rows.clone())
    }

    fn store(&self, track: RatingTrack, generation: u64, rows: Vec<RankedStanding>) {
        let Ok(mut guard) = self.cached.lock() else {
            return;
        };
        guard.insert(track, CachedTrack { generation, rows });
    }
}

/// One row of a standings table, fully resolved for presentation.
#[derive(Debug, Clone)]
pub struct RankedStanding {
    pub rank: i64,
    pub points: i32,
    pub win_rate: f64,
    pub movement: RankMovement,
    pub player: PlayerWithStats,
}

#[derive(Debug, Clone)]
pub struct PlatformOverview {
    pub total_players: i64,
    pub active_players: i64,
    pub average_elo: f64,
    pub highest_elo: i32,
    pub total_matches: i64,
    pub completed_matches: i64,
    pub total_tournaments: i64,
}

pub struct StandingsService {
    pool: DbPool,
    cache: Arc<StandingsCache>,
}

impl StandingsService {
    pub fn new(pool: DbPool, cache: Arc<StandingsCache>) -> Self {
        Self { pool, cache }
    }

    pub fn standings(&self, track: RatingTrack) -> EngineResult<Vec<RankedStanding>> {
        let generation = self.cache.generation();
        if let Some(rows) = self.cache.lookup(track, generation) {
            return Ok(rows);
        }

        let conn = database::get_connection(&self.pool)?;
        let rows = compute_standings(&conn, track)?;
        self.cache.store(track, generation, rows.clone());
        Ok(rows)
    }

    pub fn overview(&self) -> EngineResult<PlatformOverview> {
        let conn = database::get_connection(&self.pool)?;
        let players = database::players::overview(&conn)?;
        let total_matches = database::matches::count_all(&conn)?;
        let completed_matches =
            database::matches::count_by_status(&conn, crate::domain::models::MatchStatus::Completed)?;
        let total_tournaments = database::tournaments::count_all(&conn)?;

        Ok(PlatformOverview {
            total_players: players.total_players,
            active_players: players.active_players,
            average_elo: players.average_elo.unwrap_or(0.0),
            highest_elo: players.highest_elo.unwrap_or(0),
            total_matches,
            completed_matches,
            total_tournaments,
        })
    }

    /// Snapshot capture on behalf of an acting player; the CLI path calls
    /// `capture_snapshot` directly.
    pub fn capture_snapshot_by(&self, actor_id: i64, track: RatingTrack) -> EngineResult<usize> {
        {
            let conn = database::get_connection(&self.pool)?;
            super::require_staff(&conn, actor_id)?;
        }
        self.capture_snapshot(track)
    }

    /// Replaces the track's rank snapshot with the current table. Movement
    /// indicators are computed against the last capture.
    pub fn capture_snapshot(&self, track: RatingTrack) -> EngineResult<usize> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let rows = compute_standings(&tx, track)?;
        let ranks: Vec<(i64, i64)> = rows
            .iter()
            .map(|row| (row.player.player_id, row.rank))
            .collect();
        database::snapshots::replace_track(&tx, track, &ranks, Utc::now().naive_utc())?;
        tx.commit()?;

        self.cache.bump();
        info!(
            "Captured {} snapshot for {} players",
            track.as_str(),
            ranks.len()
        );
        Ok(ranks.len())
    }
}

fn compute_standings(conn: &Connection, track: RatingTrack) -> EngineResult<Vec<RankedStanding>> {
    let mut rows = database::players::list_active_with_stats(conn)?;
    standings::order_standings(&mut rows, track);
    let previous = database::snapshots::load_track(conn, track)?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let rank = (idx + 1) as i64;
            RankedStanding {
                rank,
                points: standings::track_points(&row, track),
                win_rate: standings::win_rate(row.matches_won, row.matches_played),
                movement: standings::movement(rank, &previous, row.player_id),
                player: row,
            }
        })
        .collect())
}
