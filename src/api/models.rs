use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::models::{
    Match, MatchEvent, MatchReport, Notification, Player, RatingEntry, Tournament,
    TournamentParticipant, UserReport,
};
use crate::domain::models::{
    MatchStatus, MatchType, RankMovement, RatingResult, RatingTrack, ReportStatus, Role, SetScore,
    TournamentFormat, TournamentStatus,
};
use crate::services::moderation::ModerationSummary;
use crate::services::players::{PlayerProfile, RecentMatch};
use crate::services::results::{CompletionOutcome, ReportOutcome};
use crate::services::standings::{PlatformOverview, RankedStanding};
use crate::services::tournaments::{FinalizeOutcome, TournamentDetail, TournamentSummary};

// --- Responses ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    pub rank: i64,
    pub player_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub points: i32,
    pub elo_rating: i32,
    pub atp_points: i32,
    pub matches_played: i32,
    pub matches_won: i32,
    pub win_rate: f64,
    pub win_streak: i32,
    pub movement: RankMovement,
}

impl From<RankedStanding> for StandingsEntry {
    fn from(row: RankedStanding) -> Self {
        StandingsEntry {
            rank: row.rank,
            player_id: row.player.player_id,
            username: row.player.username,
            first_name: row.player.first_name,
            last_name: row.player.last_name,
            points: row.points,
            elo_rating: row.player.elo_rating,
            atp_points: row.player.atp_points,
            matches_played: row.player.matches_played,
            matches_won: row.player.matches_won,
            win_rate: row.win_rate,
            win_streak: row.player.win_streak,
            movement: row.movement,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_players: i64,
    pub active_players: i64,
    pub average_elo: f64,
    pub highest_elo: i32,
    pub total_matches: i64,
    pub completed_matches: i64,
    pub total_tournaments: i64,
}

impl From<PlatformOverview> for OverviewResponse {
    fn from(o: PlatformOverview) -> Self {
        OverviewResponse {
            total_players: o.total_players,
            active_players: o.active_players,
            average_elo: o.average_elo,
            highest_elo: o.highest_elo,
            total_matches: o.total_matches,
            completed_matches: o.completed_matches,
            total_tournaments: o.total_tournaments,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<Player> for PlayerResponse {
    fn from(p: Player) -> Self {
        PlayerResponse {
            id: p.id,
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            role: p.role,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsResponse {
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMatchResponse {
    pub match_id: i64,
    pub opponent_id: i64,
    pub won: bool,
    pub player1_sets: Option<i32>,
    pub player2_sets: Option<i32>,
    pub elo_delta: Option<i32>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub player: PlayerResponse,
    pub stats: PlayerStatsResponse,
    pub recent_matches: Vec<RecentMatchResponse>,
}

impl From<PlayerProfile> for ProfileResponse {
    fn from(profile: PlayerProfile) -> Self {
        let player_id = profile.player.id;
        let recent_matches = profile
            .recent
            .into_iter()
            .map(|r: RecentMatch| RecentMatchResponse {
                match_id: r.match_row.id,
                opponent_id: r.match_row.opponent_of(player_id),
                won: r.match_row.winner_id == Some(player_id),
                player1_sets: r.match_row.player1_sets,
                player2_sets: r.match_row.player2_sets,
                elo_delta: r.elo_delta,
                completed_at: r.match_row.completed_at,
            })
            .collect();

        ProfileResponse {
            player: profile.player.into(),
            stats: PlayerStatsResponse {
                elo_rating: profile.stats.elo_rating,
                atp_points: profile.stats.atp_points,
                matches_played: profile.stats.matches_played,
                matches_won: profile.stats.matches_won,
                matches_lost: profile.stats.matches_lost,
                sets_won: profile.stats.sets_won,
                sets_lost: profile.stats.sets_lost,
                games_won: profile.stats.games_won,
                games_lost: profile.stats.games_lost,
                win_streak: profile.stats.win_streak,
                best_win_streak: profile.stats.best_win_streak,
                tournaments_won: profile.stats.tournaments_won,
            },
            recent_matches,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntryResponse {
    pub id: i64,
    pub track: RatingTrack,
    pub match_id: Option<i64>,
    pub tournament_id: Option<i64>,
    pub rating_before: i32,
    pub rating_after: i32,
    pub delta: i32,
    pub result: RatingResult,
    pub created_at: NaiveDateTime,
}

impl From<RatingEntry> for RatingEntryResponse {
    fn from(e: RatingEntry) -> Self {
        RatingEntryResponse {
            id: e.id,
            track: e.track,
            match_id: e.match_id,
            tournament_id: e.tournament_id,
            rating_before: e.rating_before,
            rating_after: e.rating_after,
            delta: e.delta,
            result: e.result,
            created_at: e.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
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

impl From<Match> for MatchResponse {
    fn from(m: Match) -> Self {
        MatchResponse {
            id: m.id,
            player1_id: m.player1_id,
            player2_id: m.player2_id,
            created_by: m.created_by,
            match_type: m.match_type,
            best_of: m.best_of,
            status: m.status,
            player1_sets: m.player1_sets,
            player2_sets: m.player2_sets,
            set_scores: m.set_scores,
            winner_id: m.winner_id,
            scheduled_at: m.scheduled_at,
            location: m.location,
            notes: m.notes,
            created_at: m.created_at,
            started_at: m.started_at,
            completed_at: m.completed_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReportResponse {
    pub reporter_id: i64,
    pub set_scores: Vec<SetScore>,
    pub created_at: NaiveDateTime,
}

impl From<MatchReport> for MatchReportResponse {
    fn from(r: MatchReport) -> Self {
        MatchReportResponse {
            reporter_id: r.reporter_id,
            set_scores: r.set_scores,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEventResponse {
    pub actor_id: i64,
    pub from_status: MatchStatus,
    pub to_status: MatchStatus,
    pub created_at: NaiveDateTime,
}

impl From<MatchEvent> for MatchEventResponse {
    fn from(e: MatchEvent) -> Self {
        MatchEventResponse {
            actor_id: e.actor_id,
            from_status: e.from_status,
            to_status: e.to_status,
            created_at: e.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailResponse {
    #[serde(rename = "match")]
    pub match_info: MatchResponse,
    pub reports: Vec<MatchReportResponse>,
    pub events: Vec<MatchEventResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub match_id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub winner_delta: i32,
    pub loser_delta: i32,
    pub winner_rating: i32,
    pub loser_rating: i32,
}

impl From<CompletionOutcome> for CompletionResponse {
    fn from(o: CompletionOutcome) -> Self {
        CompletionResponse {
            match_id: o.match_id,
            winner_id: o.winner_id,
            loser_id: o.loser_id,
            winner_delta: o.winner_delta,
            loser_delta: o.loser_delta,
            winner_rating: o.winner_rating,
            loser_rating: o.loser_rating,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportScoreResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionResponse>,
}

impl From<ReportOutcome> for ReportScoreResponse {
    fn from(outcome: ReportOutcome) -> Self {
        match outcome {
            ReportOutcome::AwaitingOpponent => ReportScoreResponse {
                status: "awaiting_opponent",
                completion: None,
            },
            ReportOutcome::MismatchHeld => ReportScoreResponse {
                status: "mismatch_held",
                completion: None,
            },
            ReportOutcome::Completed(c) => ReportScoreResponse {
                status: "completed",
                completion: Some(c.into()),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentResponse {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<i64>,
}

impl From<Tournament> for TournamentResponse {
    fn from(t: Tournament) -> Self {
        TournamentResponse {
            id: t.id,
            name: t.name,
            description: t.description,
            location: t.location,
            start_date: t.start_date,
            end_date: t.end_date,
            registration_deadline: t.registration_deadline,
            max_participants: t.max_participants,
            entry_fee: t.entry_fee,
            prize_pool: t.prize_pool,
            format: t.format,
            status: t.status,
            points_winner: t.points_winner,
            points_finalist: t.points_finalist,
            points_semifinalist: t.points_semifinalist,
            points_quarterfinalist: t.points_quarterfinalist,
            finalized: t.finalized,
            created_by: t.created_by,
            participant_count: None,
        }
    }
}

impl From<TournamentSummary> for TournamentResponse {
    fn from(s: TournamentSummary) -> Self {
        let mut response = TournamentResponse::from(s.tournament);
        response.participant_count = Some(s.participant_count);
        response
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub player_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub registered_at: NaiveDateTime,
    pub placement: Option<String>,
    pub points_awarded: Option<i32>,
}

impl From<TournamentParticipant> for ParticipantResponse {
    fn from(p: TournamentParticipant) -> Self {
        ParticipantResponse {
            player_id: p.player_id,
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            registered_at: p.registered_at,
            placement: p.placement.map(|pl| pl.as_str().to_string()),
            points_awarded: p.points_awarded,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetailResponse {
    pub tournament: TournamentResponse,
    pub participants: Vec<ParticipantResponse>,
}

impl From<TournamentDetail> for TournamentDetailResponse {
    fn from(d: TournamentDetail) -> Self {
        TournamentDetailResponse {
            tournament: d.tournament.into(),
            participants: d.participants.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardResponse {
    pub player_id: i64,
    pub placement: String,
    pub points: i32,
    pub atp_after: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub tournament_id: i64,
    pub awards: Vec<AwardResponse>,
}

impl From<FinalizeOutcome> for FinalizeResponse {
    fn from(o: FinalizeOutcome) -> Self {
        FinalizeResponse {
            tournament_id: o.tournament_id,
            awards: o
                .awards
                .into_iter()
                .map(|a| AwardResponse {
                    player_id: a.player_id,
                    placement: a.placement.as_str().to_string(),
                    points: a.points,
                    atp_after: a.atp_after,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReportResponse {
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

impl From<UserReport> for UserReportResponse {
    fn from(r: UserReport) -> Self {
        UserReportResponse {
            id: r.id,
            reporter_id: r.reporter_id,
            reported_id: r.reported_id,
            reason: r.reason,
            description: r.description,
            status: r.status,
            handled_by: r.handled_by,
            handled_at: r.handled_at,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        NotificationResponse {
            id: n.id,
            title: n.title,
            body: n.body,
            kind: n.kind,
            read_at: n.read_at,
            created_at: n.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub pending_validation: i64,
    pub disputed: i64,
    pub open_reports: i64,
}

impl From<ModerationSummary> for DashboardResponse {
    fn from(s: ModerationSummary) -> Self {
        DashboardResponse {
            pending_validation: s.pending_validation,
            disputed: s.disputed,
            open_reports: s.open_reports,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub track: RatingTrack,
    pub players: usize,
}

// --- Requests ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub opponent_id: i64,
    pub match_type: Option<String>,
    pub best_of: u8,
    pub scheduled_at: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub action: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportScoreRequest {
    pub set_scores: Vec<SetScore>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub registration_deadline: NaiveDateTime,
    pub max_participants: i32,
    pub entry_fee: Option<f64>,
    pub prize_pool: Option<f64>,
    pub format: Option<String>,
    pub points_winner: Option<i32>,
    pub points_finalist: Option<i32>,
    pub points_semifinalist: Option<i32>,
    pub points_quarterfinalist: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub placements: HashMap<i64, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReportRequest {
    pub reported_id: i64,
    pub reason: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleReportRequest {
    pub action: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub track: String,
}

// --- Query parameters ---

#[derive(Deserialize)]
pub struct TrackQuery {
    pub track: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub track: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct MatchListQuery {
    pub player: i64,
    pub bucket: Option<String>,
}

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub player: i64,
    pub limit: Option<usize>,
}
