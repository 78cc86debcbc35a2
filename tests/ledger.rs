//! Rating ledger: track defaults, the append-only chain and the
//! consistency guard that keeps it contiguous.

mod common;

use common::fixture;
use jdd_platform::database::{self, NewRatingEntry};
use jdd_platform::domain::models::{RatingResult, RatingTrack};
use jdd_platform::errors::EngineError;

fn elo_entry(player_id: i64, rating_before: i32, delta: i32) -> NewRatingEntry {
    NewRatingEntry {
        player_id,
        track: RatingTrack::Elo,
        match_id: None,
        tournament_id: None,
        rating_before,
        delta,
        result: if delta >= 0 {
            RatingResult::Win
        } else {
            RatingResult::Loss
        },
    }
}

#[test]
fn tracks_start_at_their_defaults() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let conn = database::get_connection(&fx.pool).expect("connection");

    let elo = database::ledger::current_rating(
        &conn,
        alice,
        RatingTrack::Elo,
        fx.config.elo.track_default(RatingTrack::Elo),
    )
    .expect("elo");
    assert_eq!(elo, 1200);

    let atp = database::ledger::current_rating(
        &conn,
        alice,
        RatingTrack::Atp,
        fx.config.elo.track_default(RatingTrack::Atp),
    )
    .expect("atp");
    assert_eq!(atp, 0);
}

#[test]
fn append_links_each_entry_to_the_last() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let conn = database::get_connection(&fx.pool).expect("connection");

    let first = database::ledger::append(&conn, &elo_entry(alice, 1200, 16), 1200).expect("first");
    assert_eq!(first.rating_after, 1216);

    let second =
        database::ledger::append(&conn, &elo_entry(alice, 1216, -9), 1200).expect("second");
    assert_eq!(second.rating_after, 1207);

    let current =
        database::ledger::current_rating(&conn, alice, RatingTrack::Elo, 1200).expect("current");
    assert_eq!(current, 1207);

    let history = database::ledger::history(&conn, alice, RatingTrack::Elo, 10).expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id, "history reads newest first");
    assert_eq!(history[1].id, first.id);
}

#[test]
fn append_rejects_a_broken_chain() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let conn = database::get_connection(&fx.pool).expect("connection");

    database::ledger::append(&conn, &elo_entry(alice, 1200, 16), 1200).expect("first");

    let err = database::ledger::append(&conn, &elo_entry(alice, 1300, 10), 1200).unwrap_err();
    assert!(matches!(err, EngineError::Consistency(_)));
    assert!(err.is_retryable(), "chain breaks are retryable");

    // The default only applies to an empty track.
    let err = database::ledger::append(&conn, &elo_entry(alice, 1200, 10), 1200).unwrap_err();
    assert!(matches!(err, EngineError::Consistency(_)));

    let count =
        database::ledger::count_for_player(&conn, alice, RatingTrack::Elo).expect("count");
    assert_eq!(count, 1, "rejected entries must not be stored");
}

#[test]
fn tracks_are_independent_chains() {
    let fx = fixture();
    let alice = fx.add_player("alice");
    let conn = database::get_connection(&fx.pool).expect("connection");

    database::ledger::append(&conn, &elo_entry(alice, 1200, 16), 1200).expect("elo entry");

    let award = NewRatingEntry {
        player_id: alice,
        track: RatingTrack::Atp,
        match_id: None,
        tournament_id: None,
        rating_before: 0,
        delta: 100,
        result: RatingResult::Award,
    };
    let appended = database::ledger::append(&conn, &award, 0).expect("atp entry");
    assert_eq!(appended.rating_after, 100);

    let elo =
        database::ledger::current_rating(&conn, alice, RatingTrack::Elo, 1200).expect("elo");
    let atp = database::ledger::current_rating(&conn, alice, RatingTrack::Atp, 0).expect("atp");
    assert_eq!(elo, 1216);
    assert_eq!(atp, 100);
}

#[test]
fn retryable_errors_are_consistency_and_transient_only() {
    let retryable = [
        EngineError::Consistency("chain".to_string()),
        EngineError::Transient("pool".to_string()),
    ];
    for err in retryable {
        assert!(err.is_retryable(), "{err}");
    }

    let terminal = [
        EngineError::validation("bad input"),
        EngineError::InvalidScore("bad sheet".to_string()),
        EngineError::IncompletePlacement("no placement for 7".to_string()),
        EngineError::not_found("match", 7),
        EngineError::AlreadyProcessed(7),
        EngineError::AlreadyFinalized(7),
        EngineError::Capacity(7),
        EngineError::Authorization("no".to_string()),
        EngineError::invalid_transition("pending", "validate"),
    ];
    for err in terminal {
        assert!(!err.is_retryable(), "{err}");
    }
}
