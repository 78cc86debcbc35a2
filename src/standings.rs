use std::collections::HashMap;

use crate::database::models::PlayerWithStats;
use crate::domain::models::{RankMovement, RatingTrack};

/// The value a track ranks by.
pub fn track_points(row: &PlayerWithStats, track: RatingTrack) -> i32 {
    match track {
        RatingTrack::Elo => row.elo_rating,
        RatingTrack::Atp => row.atp_points,
    }
}

/// Total order for a standings table: points descending, then fewer
/// matches played, then player id. Deterministic for any input.
pub fn order_standings(rows: &mut [PlayerWithStats], track: RatingTrack) {
    rows.sort_by(|a, b| {
        track_points(b, track)
            .cmp(&track_points(a, track))
            .then_with(|| a.matches_played.cmp(&b.matches_played))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
}

pub fn win_rate(matches_won: i32, matches_played: i32) -> f64 {
    if matches_played == 0 {
        0.0
    } else {
        f64::from(matches_won) / f64::from(matches_played)
    }
}

/// Movement of a player against the previous snapshot. Lower rank number
/// is better; a player absent from the snapshot reads as unchanged.
pub fn movement(current_rank: i64, previous: &HashMap<i64, i64>, player_id: i64) -> RankMovement {
    match previous.get(&player_id) {
        Some(prev) if current_rank < *prev => RankMovement::Up,
        Some(prev) if current_rank > *prev => RankMovement::Down,
        _ => RankMovement::Same,
    }
}
