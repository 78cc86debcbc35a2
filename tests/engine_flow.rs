//! End-to-end rating flow: a challenge is created, accepted, played and
//! reported by both participants, settling ratings, counters, the ledger
//! and the standings table.

mod common;

use common::{challenge, fixture, sheet, start_match};
use jdd_platform::database::{self, NewRatingEntry};
use jdd_platform::domain::models::{MatchStatus, RankMovement, RatingResult, RatingTrack};
use jdd_platform::errors::EngineError;
use jdd_platform::services::results::ReportOutcome;

#[test]
fn agreed_reports_complete_the_match_and_settle_ratings() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");

    let match_id = start_match(&fx, alice, bob);
    let sets = sheet(&[(11, 7), (9, 11), (11, 9)]);

    let first = fx
        .results()
        .report_score(match_id, alice, &sets)
        .expect("first report");
    assert!(matches!(first, ReportOutcome::AwaitingOpponent));

    let second = fx
        .results()
        .report_score(match_id, bob, &sets)
        .expect("counter report");
    let outcome = match second {
        ReportOutcome::Completed(outcome) => outcome,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(outcome.winner_id, alice);
    assert_eq!(outcome.loser_id, bob);
    assert_eq!(outcome.winner_delta, 16, "equal 1200s swing 16 at K=32");
    assert_eq!(outcome.loser_delta, -16);
    assert_eq!(outcome.winner_rating, 1216);
    assert_eq!(outcome.loser_rating, 1184);

    let conn = database::get_connection(&fx.pool).expect("connection");
    let row = database::matches::find_by_id(&conn, match_id)
        .expect("query")
        .expect("match");
    assert_eq!(row.status, MatchStatus::Completed);
    assert_eq!(row.winner_id, Some(alice));
    assert_eq!(row.player1_sets, Some(2));
    assert_eq!(row.player2_sets, Some(1));
    assert!(row.completed_at.is_some());

    let alice_stats = database::players::get_with_stats(&conn, alice)
        .expect("query")
        .expect("stats");
    assert_eq!(alice_stats.elo_rating, 1216);
    assert_eq!(alice_stats.matches_played, 1);
    assert_eq!(alice_stats.matches_won, 1);
    assert_eq!(alice_stats.sets_won, 2);
    assert_eq!(alice_stats.sets_lost, 1);
    assert_eq!(alice_stats.games_won, 31);
    assert_eq!(alice_stats.games_lost, 27);
    assert_eq!(alice_stats.win_streak, 1);
    assert_eq!(alice_stats.best_win_streak, 1);

    let bob_stats = database::players::get_with_stats(&conn, bob)
        .expect("query")
        .expect("stats");
    assert_eq!(bob_stats.elo_rating, 1184);
    assert_eq!(bob_stats.matches_lost, 1);
    assert_eq!(bob_stats.win_streak, 0);

    let notes = database::notifications::list_for_user(&conn, bob, 20).expect("notifications");
    assert!(
        notes.iter().any(|n| n.body.contains("Elo change")),
        "loser is told about the rating change"
    );
}

#[test]
fn completion_appends_matching_ledger_entries() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let match_id = start_match(&fx, alice, bob);

    let sets = sheet(&[(11, 4), (11, 6)]);
    fx.results()
        .report_score(match_id, alice, &sets)
        .expect("first report");
    fx.results()
        .report_score(match_id, bob, &sets)
        .expect("counter report");

    let conn = database::get_connection(&fx.pool).expect("connection");
    let entries = database::ledger::entries_for_match(&conn, match_id).expect("entries");
    assert_eq!(entries.len(), 2, "one entry per participant");

    let winner = entries
        .iter()
        .find(|e| e.player_id == alice)
        .expect("winner entry");
    assert_eq!(winner.track, RatingTrack::Elo);
    assert_eq!(winner.rating_before, 1200);
    assert_eq!(winner.delta, 16);
    assert_eq!(winner.rating_after, 1216);
    assert_eq!(winner.result, RatingResult::Win);
    assert_eq!(winner.match_id, Some(match_id));
    assert_eq!(winner.tournament_id, None);

    let loser = entries
        .iter()
        .find(|e| e.player_id == bob)
        .expect("loser entry");
    assert_eq!(loser.rating_before, 1200);
    assert_eq!(loser.delta, -16);
    assert_eq!(loser.result, RatingResult::Loss);
}

#[test]
fn every_step_lands_in_match_events() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let match_id = start_match(&fx, alice, bob);

    let sets = sheet(&[(11, 2), (11, 3)]);
    fx.results()
        .report_score(match_id, alice, &sets)
        .expect("first report");
    fx.results()
        .report_score(match_id, bob, &sets)
        .expect("counter report");

    let conn = database::get_connection(&fx.pool).expect("connection");
    let events = database::matches::list_events(&conn, match_id).expect("events");
    let steps: Vec<(i64, MatchStatus, MatchStatus)> = events
        .iter()
        .map(|e| (e.actor_id, e.from_status, e.to_status))
        .collect();
    assert_eq!(
        steps,
        vec![
            (bob, MatchStatus::Pending, MatchStatus::Accepted),
            (alice, MatchStatus::Accepted, MatchStatus::InProgress),
            (alice, MatchStatus::InProgress, MatchStatus::PendingValidation),
            (bob, MatchStatus::PendingValidation, MatchStatus::Completed),
        ]
    );
}

#[test]
fn replaying_a_completed_match_changes_nothing() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let match_id = start_match(&fx, alice, bob);

    let sets = sheet(&[(11, 7), (11, 5)]);
    fx.results()
        .report_score(match_id, alice, &sets)
        .expect("first report");
    fx.results()
        .report_score(match_id, bob, &sets)
        .expect("counter report");

    let err = fx
        .results()
        .report_score(match_id, alice, &sets)
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyProcessed(id) if id == match_id));

    let conn = database::get_connection(&fx.pool).expect("connection");
    let entries = database::ledger::entries_for_match(&conn, match_id).expect("entries");
    assert_eq!(entries.len(), 2, "replay must not append to the ledger");
    let stats = database::players::get_with_stats(&conn, alice)
        .expect("query")
        .expect("stats");
    assert_eq!(stats.matches_played, 1);
    assert_eq!(stats.elo_rating, 1216);
}

#[test]
fn malformed_sheets_are_rejected_before_storage() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let match_id = start_match(&fx, alice, bob);

    // Four sets can never belong to a best-of-3.
    let err = fx
        .results()
        .report_score(match_id, alice, &sheet(&[(11, 1), (1, 11), (11, 2), (2, 11)]))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidScore(_)));

    let conn = database::get_connection(&fx.pool).expect("connection");
    assert!(
        database::matches::list_reports(&conn, match_id)
            .expect("reports")
            .is_empty(),
        "rejected sheet must not be stored"
    );
    let row = database::matches::find_by_id(&conn, match_id)
        .expect("query")
        .expect("match");
    assert_eq!(row.status, MatchStatus::InProgress);
}

#[test]
fn challenges_validate_opponent_and_best_of() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");

    let err = fx
        .matches()
        .create_challenge(alice, &challenge(alice))
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "self-challenge");

    let mut input = challenge(bob);
    input.best_of = 4;
    let err = fx.matches().create_challenge(alice, &input).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "even best-of");

    let err = fx
        .matches()
        .create_challenge(alice, &challenge(9999))
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn standings_order_by_rating_and_movement_tracks_the_snapshot() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let carol = fx.add_player("carol");

    let m1 = start_match(&fx, alice, bob);
    let sets = sheet(&[(11, 5), (11, 7)]);
    fx.results().report_score(m1, alice, &sets).expect("report");
    fx.results().report_score(m1, bob, &sets).expect("counter");

    let standings = fx
        .standings()
        .standings(RatingTrack::Elo)
        .expect("standings");
    let names: Vec<&str> = standings
        .iter()
        .map(|r| r.player.username.as_str())
        .collect();
    assert_eq!(names, vec!["alice", "carol", "bob"]);
    assert_eq!(standings[0].rank, 1);
    assert!(
        standings.iter().all(|r| r.movement == RankMovement::Same),
        "no snapshot yet, movement degrades to Same"
    );
    assert_eq!(standings[1].win_rate, 0.0, "no matches means 0.0, not NaN");
    assert_eq!(standings[0].win_rate, 1.0);

    let captured = fx
        .standings()
        .capture_snapshot(RatingTrack::Elo)
        .expect("snapshot");
    assert_eq!(captured, 3);

    // Rematch: bob beats alice and climbs past carol.
    let m2 = start_match(&fx, bob, alice);
    let rematch = sheet(&[(11, 9), (11, 8)]);
    fx.results().report_score(m2, bob, &rematch).expect("report");
    fx.results()
        .report_score(m2, alice, &rematch)
        .expect("counter");

    let standings = fx
        .standings()
        .standings(RatingTrack::Elo)
        .expect("standings");
    let view: Vec<(&str, i32, RankMovement)> = standings
        .iter()
        .map(|r| (r.player.username.as_str(), r.points, r.movement))
        .collect();
    assert_eq!(
        view,
        vec![
            ("bob", 1201, RankMovement::Up),
            ("carol", 1200, RankMovement::Same),
            ("alice", 1199, RankMovement::Down),
        ]
    );
}

#[test]
fn zero_point_atp_ties_order_by_fewer_matches_then_id() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let carol = fx.add_player("carol");

    let m = start_match(&fx, alice, bob);
    let sets = sheet(&[(11, 3), (11, 4)]);
    fx.results().report_score(m, alice, &sets).expect("report");
    fx.results().report_score(m, bob, &sets).expect("counter");

    let standings = fx
        .standings()
        .standings(RatingTrack::Atp)
        .expect("standings");
    let ids: Vec<i64> = standings.iter().map(|r| r.player.player_id).collect();
    assert_eq!(
        ids,
        vec![carol, alice, bob],
        "all-zero tie orders by fewer matches, then lower id"
    );
    assert!(standings.iter().all(|r| r.points == 0));
}

#[test]
fn k_factor_tier_applies_per_player_end_to_end() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");

    // Seed the ledger so alice sits above the 2000 boundary and bob below.
    {
        let conn = database::get_connection(&fx.pool).expect("connection");
        for (player, delta) in [(alice, 850), (bob, 750)] {
            database::ledger::append(
                &conn,
                &NewRatingEntry {
                    player_id: player,
                    track: RatingTrack::Elo,
                    match_id: None,
                    tournament_id: None,
                    rating_before: 1200,
                    delta,
                    result: RatingResult::Award,
                },
                fx.config.elo.default_rating,
            )
            .expect("seed entry");
        }
    }

    let match_id = start_match(&fx, alice, bob);
    let sets = sheet(&[(11, 8), (11, 6)]);
    fx.results()
        .report_score(match_id, alice, &sets)
        .expect("report");
    let outcome = match fx
        .results()
        .report_score(match_id, bob, &sets)
        .expect("counter")
    {
        ReportOutcome::Completed(outcome) => outcome,
        other => panic!("expected completion, got {other:?}"),
    };

    // 2050 over 1950: winner moves on K=16, loser still on K=32.
    assert_eq!(outcome.winner_delta, 6);
    assert_eq!(outcome.loser_delta, -12);
    assert_eq!(outcome.winner_rating, 2056);
    assert_eq!(outcome.loser_rating, 1938);
}

#[test]
fn profile_lists_recent_form_with_deltas() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let match_id = start_match(&fx, alice, bob);

    let sets = sheet(&[(11, 9), (7, 11), (11, 6)]);
    fx.results()
        .report_score(match_id, bob, &sets)
        .expect("report");
    fx.results()
        .report_score(match_id, alice, &sets)
        .expect("counter");

    let profile = fx.players().profile(alice).expect("profile");
    assert_eq!(profile.stats.elo_rating, 1216);
    assert_eq!(profile.recent.len(), 1);
    assert_eq!(profile.recent[0].match_row.id, match_id);
    assert_eq!(profile.recent[0].elo_delta, Some(16));

    let history = fx
        .players()
        .history(alice, RatingTrack::Elo, 10)
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].rating_after, 1216);
}
