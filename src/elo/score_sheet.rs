use crate::domain::models::SetScore;
use crate::errors::{EngineError, EngineResult};

pub const VALID_BEST_OF: [u8; 3] = [1, 3, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

/// The validated outcome of a score sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub winner: Side,
    pub player1_sets: u32,
    pub player2_sets: u32,
    pub player1_games: u32,
    pub player2_games: u32,
}

pub fn sets_to_win(best_of: u8) -> u32 {
    u32::from(best_of) / 2 + 1
}

/// Validates a reported sheet against the match format.
///
/// A sheet is well-formed when it has between 1 and `best_of` sets, no set
/// is tied, exactly one player reaches the required set count, and no sets
/// follow the deciding one.
pub fn summarize(best_of: u8, sets: &[SetScore]) -> EngineResult<ScoreSummary> {
    if !VALID_BEST_OF.contains(&best_of) {
        return Err(EngineError::InvalidScore(format!(
            "best_of must be 1, 3 or 5, got {best_of}"
        )));
    }
    if sets.is_empty() {
        return Err(EngineError::InvalidScore(
            "score sheet has no sets".to_string(),
        ));
    }
    if sets.len() > usize::from(best_of) {
        return Err(EngineError::InvalidScore(format!(
            "{} sets reported for a best-of-{best_of} match",
            sets.len()
        )));
    }

    let needed = sets_to_win(best_of);
    let mut summary = ScoreSummary {
        winner: Side::Player1,
        player1_sets: 0,
        player2_sets: 0,
        player1_games: 0,
        player2_games: 0,
    };

    for (idx, set) in sets.iter().enumerate() {
        if summary.player1_sets == needed || summary.player2_sets == needed {
            return Err(EngineError::InvalidScore(format!(
                "set {} was played after the match was already decided",
                idx + 1
            )));
        }
        if set.player1 == set.player2 {
            return Err(EngineError::InvalidScore(format!(
                "set {} is tied at {}-{}",
                idx + 1,
                set.player1,
                set.player2
            )));
        }
        if set.player1 > set.player2 {
            summary.player1_sets += 1;
        } else {
            summary.player2_sets += 1;
        }
        summary.player1_games += set.player1;
        summary.player2_games += set.player2;
    }

    summary.winner = if summary.player1_sets == needed {
        Side::Player1
    } else if summary.player2_sets == needed {
        Side::Player2
    } else {
        return Err(EngineError::InvalidScore(format!(
            "no player reached {needed} set wins"
        )));
    };

    Ok(summary)
}
