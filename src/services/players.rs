use std::sync::Arc;

use log::info;

use crate::config::AppConfig;
use crate::database::models::{Match, Notification, Player, PlayerWithStats, RatingEntry};
use crate::database::{self, DbPool};
use crate::domain::models::{RatingTrack, Role};
use crate::errors::{EngineError, EngineResult};

use super::require_staff;
use super::standings::StandingsCache;

const RECENT_FORM_LIMIT: usize = 10;

pub struct CreatePlayer {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// A completed match annotated with the Elo swing it produced for the
/// profiled player.
#[derive(Debug)]
pub struct RecentMatch {
    pub match_row: Match,
    pub elo_delta: Option<i32>,
}

#[derive(Debug)]
pub struct PlayerProfile {
    pub player: Player,
    pub stats: PlayerWithStats,
    pub recent: Vec<RecentMatch>,
}

pub struct PlayerService {
    pool: DbPool,
    config: AppConfig,
    cache: Arc<StandingsCache>,
}

impl PlayerService {
    pub fn new(pool: DbPool, config: AppConfig, cache: Arc<StandingsCache>) -> Self {
        Self {
            pool,
            config,
            cache,
        }
    }

    /// Creates a player profile with a fresh stats row at the default
    /// rating. Staff only; usernames are unique.
    pub fn create(&self, actor_id: i64, input: &CreatePlayer) -> EngineResult<Player> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(EngineError::validation("a player needs a username"));
        }
        if username.contains(char::is_whitespace) {
            return Err(EngineError::validation("usernames cannot contain spaces"));
        }

        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        if database::players::find_by_username(&conn, username)?.is_some() {
            return Err(EngineError::Validation(format!(
                "username {username} is already taken"
            )));
        }

        let player = database::players::create_player(
            &conn,
            username,
            input.first_name.trim(),
            input.last_name.trim(),
            input.role,
            self.config.elo.default_rating,
        )?;
        self.cache.bump();

        info!("Player {} ({username}) created by staff {actor_id}", player.id);
        Ok(player)
    }

    pub fn set_active(&self, actor_id: i64, player_id: i64, is_active: bool) -> EngineResult<Player> {
        let conn = database::get_connection(&self.pool)?;
        require_staff(&conn, actor_id)?;

        let changed = database::players::set_active(&conn, player_id, is_active)?;
        if changed == 0 {
            return Err(EngineError::not_found("player", player_id));
        }
        self.cache.bump();

        info!(
            "Player {player_id} {} by staff {actor_id}",
            if is_active { "activated" } else { "deactivated" }
        );
        database::players::find_by_id(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))
    }

    /// Profile page payload: identity, counters and the latest completed
    /// matches with the Elo delta each one produced.
    pub fn profile(&self, player_id: i64) -> EngineResult<PlayerProfile> {
        let conn = database::get_connection(&self.pool)?;
        let player = database::players::find_by_id(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))?;
        let stats = database::players::get_with_stats(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))?;

        let mut recent = Vec::new();
        for match_row in
            database::matches::list_recent_completed(&conn, player_id, RECENT_FORM_LIMIT)?
        {
            let elo_delta = database::ledger::entries_for_match(&conn, match_row.id)?
                .into_iter()
                .find(|e| e.player_id == player_id && e.track == RatingTrack::Elo)
                .map(|e| e.delta);
            recent.push(RecentMatch {
                match_row,
                elo_delta,
            });
        }

        Ok(PlayerProfile {
            player,
            stats,
            recent,
        })
    }

    pub fn history(
        &self,
        player_id: i64,
        track: RatingTrack,
        limit: usize,
    ) -> EngineResult<Vec<RatingEntry>> {
        let conn = database::get_connection(&self.pool)?;
        database::players::find_by_id(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))?;
        Ok(database::ledger::history(&conn, player_id, track, limit)?)
    }

    pub fn notifications(&self, player_id: i64, limit: usize) -> EngineResult<Vec<Notification>> {
        let conn = database::get_connection(&self.pool)?;
        database::players::find_by_id(&conn, player_id)?
            .ok_or_else(|| EngineError::not_found("player", player_id))?;
        Ok(database::notifications::list_for_user(&conn, player_id, limit)?)
    }

    pub fn mark_notification_read(&self, player_id: i64, notification_id: i64) -> EngineResult<()> {
        let conn = database::get_connection(&self.pool)?;
        let changed = database::notifications::mark_read(&conn, notification_id, player_id)?;
        if changed == 0 {
            // Acknowledging twice is a no-op, anything else is a miss.
            let existing =
                database::notifications::find_for_user(&conn, notification_id, player_id)?;
            return match existing {
                Some(note) if note.read_at.is_some() => Ok(()),
                _ => Err(EngineError::not_found("notification", notification_id)),
            };
        }
        Ok(())
    }
}
