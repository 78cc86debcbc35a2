use crate::errors::{EngineError, EngineResult};

use super::models::{MatchAction, MatchStatus, Role};

/// The acting player, as resolved from storage.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// The fixed cast of a match, needed to authorize transitions.
#[derive(Debug, Clone, Copy)]
pub struct Participants {
    pub player1_id: i64,
    pub player2_id: i64,
    pub created_by: i64,
}

impl Participants {
    pub fn contains(&self, player_id: i64) -> bool {
        player_id == self.player1_id || player_id == self.player2_id
    }

    /// The participant who was challenged, i.e. did not create the match.
    pub fn invited_player(&self) -> i64 {
        if self.created_by == self.player1_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }
}

/// Resolves a moderation action against the current status.
///
/// Returns the status the match moves to. Rejections never mutate
/// anything: an action from the wrong status is `InvalidTransition`, a
/// permitted action by the wrong actor is `Authorization`.
pub fn apply(
    current: MatchStatus,
    action: MatchAction,
    actor: &Actor,
    participants: &Participants,
) -> EngineResult<MatchStatus> {
    let target = target_status(current, action)?;
    authorize(action, actor, participants)?;
    Ok(target)
}

fn target_status(current: MatchStatus, action: MatchAction) -> EngineResult<MatchStatus> {
    let target = match (current, action) {
        (MatchStatus::Pending, MatchAction::Accept) => MatchStatus::Accepted,
        (MatchStatus::Pending, MatchAction::Decline) => MatchStatus::Declined,
        (MatchStatus::Accepted, MatchAction::Start) => MatchStatus::InProgress,
        (MatchStatus::PendingValidation, MatchAction::Validate) => MatchStatus::Completed,
        (MatchStatus::PendingValidation, MatchAction::Dispute) => MatchStatus::Disputed,
        (MatchStatus::Disputed, MatchAction::Reopen) => MatchStatus::PendingValidation,
        (from, action) => {
            return Err(EngineError::invalid_transition(from.as_str(), action.as_str()));
        }
    };
    Ok(target)
}

fn authorize(action: MatchAction, actor: &Actor, participants: &Participants) -> EngineResult<()> {
    match action {
        MatchAction::Accept | MatchAction::Decline => {
            if actor.id != participants.invited_player() {
                return Err(EngineError::Authorization(format!(
                    "only the invited player may {} the challenge",
                    action.as_str()
                )));
            }
        }
        MatchAction::Start => {
            if !participants.contains(actor.id) {
                return Err(EngineError::Authorization(
                    "only a participant may start the match".to_string(),
                ));
            }
        }
        MatchAction::Validate | MatchAction::Dispute | MatchAction::Reopen => {
            if !actor.role.is_staff() {
                return Err(EngineError::Authorization(format!(
                    "{} requires a staff role",
                    action.as_str()
                )));
            }
        }
    }
    Ok(())
}
