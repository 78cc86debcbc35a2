use serde::{Deserialize, Serialize};

/// Account role, also the moderation permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "player" => Some(Role::Player),
            "staff" => Some(Role::Staff),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

/// Lifecycle of a match, from challenge to validated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Declined,
    InProgress,
    PendingValidation,
    Completed,
    Disputed,
}

impl MatchStatus {
    pub const ALL: &'static [MatchStatus] = &[
        MatchStatus::Pending,
        MatchStatus::Accepted,
        MatchStatus::Declined,
        MatchStatus::InProgress,
        MatchStatus::PendingValidation,
        MatchStatus::Completed,
        MatchStatus::Disputed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Declined => "declined",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::PendingValidation => "pending_validation",
            MatchStatus::Completed => "completed",
            MatchStatus::Disputed => "disputed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatchStatus::Pending),
            "accepted" => Some(MatchStatus::Accepted),
            "declined" => Some(MatchStatus::Declined),
            "in_progress" => Some(MatchStatus::InProgress),
            "pending_validation" => Some(MatchStatus::PendingValidation),
            "completed" => Some(MatchStatus::Completed),
            "disputed" => Some(MatchStatus::Disputed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Declined | MatchStatus::Completed)
    }
}

/// Moderation actions applied to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
    Accept,
    Decline,
    Start,
    Validate,
    Dispute,
    Reopen,
}

impl MatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchAction::Accept => "accept",
            MatchAction::Decline => "decline",
            MatchAction::Start => "start",
            MatchAction::Validate => "validate",
            MatchAction::Dispute => "dispute",
            MatchAction::Reopen => "reopen",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(MatchAction::Accept),
            "decline" => Some(MatchAction::Decline),
            "start" => Some(MatchAction::Start),
            "validate" => Some(MatchAction::Validate),
            "dispute" => Some(MatchAction::Dispute),
            "reopen" => Some(MatchAction::Reopen),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Casual,
    Ranked,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Casual => "casual",
            MatchType::Ranked => "ranked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "casual" => Some(MatchType::Casual),
            "ranked" => Some(MatchType::Ranked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    RegistrationOpen,
    InProgress,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::RegistrationOpen => "registration_open",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(TournamentStatus::Upcoming),
            "registration_open" => Some(TournamentStatus::RegistrationOpen),
            "in_progress" => Some(TournamentStatus::InProgress),
            "completed" => Some(TournamentStatus::Completed),
            _ => None,
        }
    }

    /// Next stage reachable through a staff advance. `completed` is only
    /// reached through finalization.
    pub fn next(&self) -> Option<Self> {
        match self {
            TournamentStatus::Upcoming => Some(TournamentStatus::RegistrationOpen),
            TournamentStatus::RegistrationOpen => Some(TournamentStatus::InProgress),
            TournamentStatus::InProgress | TournamentStatus::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
}

impl TournamentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentFormat::SingleElimination => "single_elimination",
            TournamentFormat::DoubleElimination => "double_elimination",
            TournamentFormat::RoundRobin => "round_robin",
            TournamentFormat::Swiss => "swiss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single_elimination" => Some(TournamentFormat::SingleElimination),
            "double_elimination" => Some(TournamentFormat::DoubleElimination),
            "round_robin" => Some(TournamentFormat::RoundRobin),
            "swiss" => Some(TournamentFormat::Swiss),
            _ => None,
        }
    }
}

/// Final placement of a tournament participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Winner,
    Finalist,
    Semifinalist,
    Quarterfinalist,
    Other,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Winner => "winner",
            Placement::Finalist => "finalist",
            Placement::Semifinalist => "semifinalist",
            Placement::Quarterfinalist => "quarterfinalist",
            Placement::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "winner" => Some(Placement::Winner),
            "finalist" => Some(Placement::Finalist),
            "semifinalist" => Some(Placement::Semifinalist),
            "quarterfinalist" => Some(Placement::Quarterfinalist),
            "other" => Some(Placement::Other),
            _ => None,
        }
    }
}

/// Which rating a ledger entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTrack {
    Elo,
    Atp,
}

impl RatingTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTrack::Elo => "elo",
            RatingTrack::Atp => "atp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "elo" => Some(RatingTrack::Elo),
            "atp" => Some(RatingTrack::Atp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingResult {
    Win,
    Loss,
    Award,
}

impl RatingResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingResult::Win => "win",
            RatingResult::Loss => "loss",
            RatingResult::Award => "award",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "win" => Some(RatingResult::Win),
            "loss" => Some(RatingResult::Loss),
            "award" => Some(RatingResult::Award),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "approved" => Some(ReportStatus::Approved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

/// Rank movement relative to the last snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMovement {
    Up,
    Down,
    Same,
}

/// One set of a reported score sheet, games won per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    pub player1: u32,
    pub player2: u32,
}

impl SetScore {
    pub fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }
}
