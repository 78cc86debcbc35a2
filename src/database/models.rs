use chrono::NaiveDateTime;

use crate::domain::models::{
    MatchStatus, MatchType, Placement, RatingResult, RatingTrack, ReportStatus, Role, SetScore,
    TournamentFormat, TournamentStatus,
};
use crate::domain::transitions::Participants;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Player {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Player row joined with its aggregate counters.
#[derive(Debug, Clone)]
pub struct PlayerWithStats {
    pub player_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub elo_rating: i32,
    pub atp_points: i32,
    pub matches_played: i32,
    pub matches_won: i32,
    pub matches_lost: i32,
    pub sets_won: i32,
    pub sets_lost: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub win_streak: i32,
    pub best_win_streak: i32,
    pub tournaments_won: i32,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub created_by: i64,
    pub match_type: MatchType,
    pub best_of: u8,
    pub status: MatchStatus,
    pub player1_sets: Option<i32>,
    pub player2_sets: Option<i32>,
    pub set_scores: Option<Vec<SetScore>>,
    pub winner_id: Option<i64>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl Match {
    pub fn participants(&self) -> Participants {
        Participants {
            player1_id: self.player1_id,
            player2_id: self.player2_id,
            created_by: self.created_by,
        }
    }

    pub fn involves(&self, player_id: i64) -> bool {
        player_id == self.player1_id || player_id == self.player2_id
    }

    pub fn opponent_of(&self, player_id: i64) -> i64 {
        if player_id == self.player1_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchReport {
    pub id: i64,
    pub match_id: i64,
    pub reporter_id: i64,
    pub set_scores: Vec<SetScore>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct MatchEvent {
    pub id: i64,
    pub match_id: i64,
    pub actor_id: i64,
    pub from_status: MatchStatus,
    pub to_status: MatchStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct RatingEntry {
    pub id: i64,
    pub player_id: i64,
    pub track: RatingTrack,
    pub match_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub rating_before: i32,
    pub rating_after: i32,
    pub delta: i32,
    pub result: RatingResult,
    pub created_at: NaiveDateTime,
}

/// Insert payload for the ledger; `rating_after` is derived.
#[derive(Debug, Clone)]
pub struct NewRatingEntry {
    pub player_id: i64,
    pub track: RatingTrack,
    pub match_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub rating_before: i32,
    pub delta: i32,
    pub result: RatingResult,
}

impl NewRatingEntry {
    pub fn rating_after(&self) -> i32 {
        self.rating_before + self.delta
    }
}

#[derive(Debug, Clone)]
pub struct Tournament {
    pub id: i64,
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
    pub status: TournamentStatus,
    pub points_winner: i32,
    pub points_finalist: i32,
    pub points_semifinalist: i32,
    pub points_quarterfinalist: i32,
    pub finalized: bool,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
}

impl Tournament {
    /// ATP points this tournament pays for a placement.
    pub fn points_for(&self, placement: Placement) -> i32 {
        match placement {
            Placement::Winner => self.points_winner,
            Placement::Finalist => self.points_finalist,
            Placement::Semifinalist => self.points_semifinalist,
            Placement::Quarterfinalist => self.points_quarterfinalist,
            Placement::Other => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TournamentParticipant {
    pub tournament_id: i64,
    pub player_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: NaiveDateTime,
    pub placement: Option<Placement>,
    pub points_awarded: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct UserReport {
    pub id: i64,
    pub reporter_id: i64,
    pub reported_id: i64,
    pub reason: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub handled_by: Option<i64>,
    pub handled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct RankSnapshotRow {
    pub track: RatingTrack,
    pub player_id: i64,
    pub rank: i64,
    pub captured_at: NaiveDateTime,
}

/// Aggregates for the rankings overview panel.
#[derive(Debug, Clone)]
pub struct PlayerOverview {
    pub total_players: i64,
    pub active_players: i64,
    pub average_elo: Option<f64>,
    pub highest_elo: Option<i32>,
}
