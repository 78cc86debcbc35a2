pub mod matches;
pub mod moderation;
pub mod players;
pub mod results;
pub mod server;
pub mod standings;
pub mod tournaments;

use rusqlite::Connection;

use crate::database;
use crate::database::models::Player;
use crate::errors::{EngineError, EngineResult};

/// Loads the acting player, rejecting unknown or deactivated accounts.
pub(crate) fn require_active_player(conn: &Connection, player_id: i64) -> EngineResult<Player> {
    let player = database::players::find_by_id(conn, player_id)?
        .ok_or_else(|| EngineError::not_found("player", player_id))?;
    if !player.is_active {
        return Err(EngineError::Authorization(format!(
            "player {player_id} is deactivated"
        )));
    }
    Ok(player)
}

pub(crate) fn require_staff(conn: &Connection, actor_id: i64) -> EngineResult<Player> {
    let player = require_active_player(conn, actor_id)?;
    if !player.role.is_staff() {
        return Err(EngineError::Authorization(format!(
            "player {actor_id} does not have a staff role"
        )));
    }
    Ok(player)
}
