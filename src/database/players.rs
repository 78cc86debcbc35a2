use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::models::Role;
use crate::elo::ScoreSummary;

use super::models::{Player, PlayerOverview, PlayerWithStats};
use super::text_column;

const PLAYER_COLUMNS: &str = "id, username, first_name, last_name, role, is_active, created_at";

pub fn create_player(
    conn: &Connection,
    username: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
    starting_elo: i32,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (username, first_name, last_name, role) \
         VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );
    let player = conn
        .query_row(
            &sql,
            params![username, first_name, last_name, role.as_str()],
            parse_player_row,
        )
        .context("Failed to insert new player")?;

    conn.execute(
        "INSERT INTO player_stats (player_id, elo_rating) VALUES (?1, ?2)",
        params![player.id, starting_elo],
    )
    .context("Failed to insert player stats row")?;

    Ok(player)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE username = ?1");

    conn.query_row(&sql, params![username], parse_player_row)
        .optional()
        .context("Failed to query player by username")
}

pub fn set_active(conn: &Connection, id: i64, is_active: bool) -> Result<usize> {
    conn.execute(
        "UPDATE players SET is_active = ?1 WHERE id = ?2",
        params![is_active, id],
    )
    .context("Failed to update player activation")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: text_column(4, row.get(4)?, Role::parse)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const STATS_COLUMNS: &str = "p.id, p.username, p.first_name, p.last_name, p.is_active, \
     s.elo_rating, s.atp_points, s.matches_played, s.matches_won, s.matches_lost, \
     s.sets_won, s.sets_lost, s.games_won, s.games_lost, \
     s.win_streak, s.best_win_streak, s.tournaments_won";

pub fn get_with_stats(conn: &Connection, player_id: i64) -> Result<Option<PlayerWithStats>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS} FROM players p \
         JOIN player_stats s ON s.player_id = p.id WHERE p.id = ?1"
    );

    conn.query_row(&sql, params![player_id], parse_stats_row)
        .optional()
        .context("Failed to query player stats")
}

pub fn list_active_with_stats(conn: &Connection) -> Result<Vec<PlayerWithStats>> {
    let sql = format!(
        "SELECT {STATS_COLUMNS} FROM players p \
         JOIN player_stats s ON s.player_id = p.id WHERE p.is_active = 1"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_stats_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerWithStats> {
    Ok(PlayerWithStats {
        player_id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        is_active: row.get(4)?,
        elo_rating: row.get(5)?,
        atp_points: row.get(6)?,
        matches_played: row.get(7)?,
        matches_won: row.get(8)?,
        matches_lost: row.get(9)?,
        sets_won: row.get(10)?,
        sets_lost: row.get(11)?,
        games_won: row.get(12)?,
        games_lost: row.get(13)?,
        win_streak: row.get(14)?,
        best_win_streak: row.get(15)?,
        tournaments_won: row.get(16)?,
    })
}

pub fn set_elo(conn: &Connection, player_id: i64, rating: i32) -> Result<()> {
    conn.execute(
        "UPDATE player_stats SET elo_rating = ?1 WHERE player_id = ?2",
        params![rating, player_id],
    )
    .context("Failed to update elo rating")
    .map(|_| ())
}

pub fn set_atp_points(conn: &Connection, player_id: i64, points: i32) -> Result<()> {
    conn.execute(
        "UPDATE player_stats SET atp_points = ?1 WHERE player_id = ?2",
        params![points, player_id],
    )
    .context("Failed to update atp points")
    .map(|_| ())
}

pub fn increment_tournaments_won(conn: &Connection, player_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE player_stats SET tournaments_won = tournaments_won + 1 WHERE player_id = ?1",
        params![player_id],
    )
    .context("Failed to increment tournaments won")
    .map(|_| ())
}

/// Rolls a validated result into both players' aggregate counters.
pub fn apply_match_outcome(
    conn: &Connection,
    winner_id: i64,
    loser_id: i64,
    summary: &ScoreSummary,
    winner_is_player1: bool,
) -> Result<()> {
    let (winner_sets, loser_sets, winner_games, loser_games) = if winner_is_player1 {
        (
            summary.player1_sets,
            summary.player2_sets,
            summary.player1_games,
            summary.player2_games,
        )
    } else {
        (
            summary.player2_sets,
            summary.player1_sets,
            summary.player2_games,
            summary.player1_games,
        )
    };

    conn.execute(
        "UPDATE player_stats SET \
             matches_played = matches_played + 1, \
             matches_won = matches_won + 1, \
             sets_won = sets_won + ?1, \
             sets_lost = sets_lost + ?2, \
             games_won = games_won + ?3, \
             games_lost = games_lost + ?4, \
             best_win_streak = MAX(best_win_streak, win_streak + 1), \
             win_streak = win_streak + 1 \
         WHERE player_id = ?5",
        params![winner_sets, loser_sets, winner_games, loser_games, winner_id],
    )
    .context("Failed to update winner stats")?;

    conn.execute(
        "UPDATE player_stats SET \
             matches_played = matches_played + 1, \
             matches_lost = matches_lost + 1, \
             sets_won = sets_won + ?1, \
             sets_lost = sets_lost + ?2, \
             games_won = games_won + ?3, \
             games_lost = games_lost + ?4, \
             win_streak = 0 \
         WHERE player_id = ?5",
        params![loser_sets, winner_sets, loser_games, winner_games, loser_id],
    )
    .context("Failed to update loser stats")?;

    Ok(())
}

pub fn overview(conn: &Connection) -> Result<PlayerOverview> {
    let sql = "SELECT COUNT(*), \
               COALESCE(SUM(p.is_active), 0), \
               AVG(CASE WHEN p.is_active = 1 THEN s.elo_rating END), \
               MAX(CASE WHEN p.is_active = 1 THEN s.elo_rating END) \
               FROM players p JOIN player_stats s ON s.player_id = p.id";

    conn.query_row(sql, [], |row| {
        Ok(PlayerOverview {
            total_players: row.get(0)?,
            active_players: row.get(1)?,
            average_elo: row.get(2)?,
            highest_elo: row.get(3)?,
        })
    })
    .context("Failed to compute player overview")
}
