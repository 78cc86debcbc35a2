use crate::config::settings::EloSettings;

/// Probability of the first rating beating the second, logistic curve
/// with a 400-point scale.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) as f64 / 400.0))
}

/// Rating change for one player, rounded to the nearest integer.
pub fn rating_delta(rating: i32, opponent: i32, won: bool, k: f64) -> i32 {
    let actual = if won { 1.0 } else { 0.0 };
    (k * (actual - expected_score(rating, opponent))).round() as i32
}

/// Deltas for (winner, loser). Each side uses the K-factor tier of its own
/// pre-match rating, so the magnitudes differ once one player crosses a
/// tier boundary.
pub fn match_deltas(winner_rating: i32, loser_rating: i32, settings: &EloSettings) -> (i32, i32) {
    let winner_delta = rating_delta(
        winner_rating,
        loser_rating,
        true,
        settings.k_for(winner_rating),
    );
    let loser_delta = rating_delta(
        loser_rating,
        winner_rating,
        false,
        settings.k_for(loser_rating),
    );
    (winner_delta, loser_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_score_is_half_for_equal_ratings() {
        let e = expected_score(1200, 1200);
        assert!((e - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expected_scores_sum_to_one() {
        let e1 = expected_score(1450, 1210);
        let e2 = expected_score(1210, 1450);
        assert!((e1 + e2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn equal_ratings_swing_sixteen_points_at_k32() {
        let settings = EloSettings::default();
        let (dw, dl) = match_deltas(1200, 1200, &settings);
        assert_eq!(dw, 16);
        assert_eq!(dl, -16);
    }

    #[test]
    fn deltas_are_zero_sum_below_the_tier_boundary() {
        let settings = EloSettings::default();
        for (a, b) in [(1200, 1350), (1500, 1100), (1800, 1799)] {
            let (dw, dl) = match_deltas(a, b, &settings);
            assert_eq!(dw + dl, 0, "ratings {a} vs {b}");
        }
    }

    #[test]
    fn upset_win_gains_more_than_expected_win() {
        let settings = EloSettings::default();
        let (upset, _) = match_deltas(1100, 1500, &settings);
        let (expected, _) = match_deltas(1500, 1100, &settings);
        assert!(upset > expected);
        assert!(upset > 16);
        assert!(expected < 16);
    }

    #[test]
    fn winner_never_loses_points() {
        let settings = EloSettings::default();
        for (w, l) in [(1200, 1200), (900, 2100), (2300, 800)] {
            let (dw, dl) = match_deltas(w, l, &settings);
            assert!(dw >= 0, "winner delta for {w} vs {l}");
            assert!(dl <= 0, "loser delta for {w} vs {l}");
        }
    }

    #[test]
    fn high_rated_player_uses_reduced_k() {
        let settings = EloSettings::default();
        // Winner above 2000 moves on the K=16 scale, loser below on K=32.
        let (dw, dl) = match_deltas(2050, 1950, &settings);
        assert!(dw <= 8);
        assert!(dl <= -8);
        assert!(dw < -dl);
    }
}
