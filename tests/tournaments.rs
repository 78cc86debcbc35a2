//! Tournament lifecycle: creation guards, the registration window,
//! stage advances and the exactly-once points payout.

mod common;

use std::collections::HashMap;

use chrono::{Duration, Utc};
use common::{fixture, tournament_input};
use jdd_platform::database;
use jdd_platform::domain::models::{Placement, RatingResult, RatingTrack, TournamentStatus};
use jdd_platform::errors::EngineError;

#[test]
fn tournament_creation_validates_its_inputs() {
    let fx = fixture();
    let alice = fx.add_player("alice");

    let mut input = tournament_input("Spring Open", 8);
    input.name = "   ".to_string();
    let err = fx.tournaments().create(alice, &input).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "blank name");

    let input = tournament_input("Spring Open", 1);
    let err = fx.tournaments().create(alice, &input).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "needs two players");

    let mut input = tournament_input("Spring Open", 8);
    input.registration_deadline = input.start_date + Duration::days(1);
    let err = fx.tournaments().create(alice, &input).unwrap_err();
    assert!(
        matches!(err, EngineError::Validation(_)),
        "registration must close before the start"
    );

    let mut input = tournament_input("Spring Open", 8);
    input.points_semifinalist = -5;
    let err = fx.tournaments().create(alice, &input).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "negative points");

    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Spring Open", 8))
        .expect("created");
    assert_eq!(tournament.status, TournamentStatus::Upcoming);
    assert!(!tournament.finalized);
    assert_eq!(tournament.created_by, alice);
}

#[test]
fn registration_needs_an_open_window_with_room() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Autumn Cup", 2))
        .expect("created");

    let err = fx.tournaments().register(tournament.id, bob).unwrap_err();
    assert!(
        matches!(err, EngineError::InvalidTransition { .. }),
        "registration is closed while upcoming"
    );

    fx.tournaments()
        .advance(tournament.id, staff)
        .expect("open registration");
    fx.tournaments()
        .register(tournament.id, bob)
        .expect("registered");

    let err = fx.tournaments().register(tournament.id, bob).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "double entry");

    fx.tournaments()
        .register(tournament.id, alice)
        .expect("registered");

    let carol = fx.add_player("carol");
    let err = fx.tournaments().register(tournament.id, carol).unwrap_err();
    assert!(matches!(err, EngineError::Capacity(id) if id == tournament.id));

    let detail = fx.tournaments().detail(tournament.id).expect("detail");
    assert_eq!(detail.participants.len(), 2);
}

#[test]
fn registration_closes_at_the_deadline() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");

    let mut input = tournament_input("Late Cup", 4);
    input.registration_deadline = Utc::now().naive_utc() - Duration::hours(1);
    let tournament = fx.tournaments().create(alice, &input).expect("created");
    fx.tournaments().advance(tournament.id, staff).expect("open");

    let err = fx.tournaments().register(tournament.id, bob).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn deactivated_players_cannot_register() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Closed Door", 4))
        .expect("created");
    fx.tournaments().advance(tournament.id, staff).expect("open");

    fx.players()
        .set_active(staff, bob, false)
        .expect("deactivate");
    let err = fx.tournaments().register(tournament.id, bob).unwrap_err();
    assert!(matches!(err, EngineError::Authorization(_)));
}

#[test]
fn only_staff_advance_and_stages_move_in_order() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Ladder", 4))
        .expect("created");

    let err = fx.tournaments().advance(tournament.id, alice).unwrap_err();
    assert!(matches!(err, EngineError::Authorization(_)));

    let opened = fx.tournaments().advance(tournament.id, staff).expect("advance");
    assert_eq!(opened.status, TournamentStatus::RegistrationOpen);

    let underway = fx.tournaments().advance(tournament.id, staff).expect("advance");
    assert_eq!(underway.status, TournamentStatus::InProgress);

    let err = fx.tournaments().advance(tournament.id, staff).unwrap_err();
    assert!(
        matches!(err, EngineError::InvalidTransition { .. }),
        "in_progress only ends through finalization"
    );
}

#[test]
fn finalize_awards_points_exactly_once() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");

    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Winter Cup", 4))
        .expect("created");
    fx.tournaments().advance(tournament.id, staff).expect("open");
    fx.tournaments().register(tournament.id, alice).expect("alice in");
    fx.tournaments().register(tournament.id, bob).expect("bob in");
    fx.tournaments().advance(tournament.id, staff).expect("underway");

    let mut placements = HashMap::new();
    placements.insert(alice, Placement::Winner);
    placements.insert(bob, Placement::Finalist);

    let outcome = fx
        .tournaments()
        .finalize(tournament.id, staff, &placements)
        .expect("finalized");
    assert_eq!(outcome.awards.len(), 2);
    let alice_award = outcome
        .awards
        .iter()
        .find(|a| a.player_id == alice)
        .expect("winner award");
    assert_eq!(alice_award.points, 100);
    assert_eq!(alice_award.atp_after, 100);
    let bob_award = outcome
        .awards
        .iter()
        .find(|a| a.player_id == bob)
        .expect("finalist award");
    assert_eq!(bob_award.points, 60);
    assert_eq!(bob_award.atp_after, 60);

    {
        let conn = database::get_connection(&fx.pool).expect("connection");
        let row = database::tournaments::find_by_id(&conn, tournament.id)
            .expect("query")
            .expect("tournament");
        assert!(row.finalized);
        assert_eq!(row.status, TournamentStatus::Completed);

        let alice_stats = database::players::get_with_stats(&conn, alice)
            .expect("query")
            .expect("stats");
        assert_eq!(alice_stats.atp_points, 100);
        assert_eq!(alice_stats.tournaments_won, 1);
        let bob_stats = database::players::get_with_stats(&conn, bob)
            .expect("query")
            .expect("stats");
        assert_eq!(bob_stats.atp_points, 60);
        assert_eq!(bob_stats.tournaments_won, 0);

        let entries =
            database::ledger::history(&conn, alice, RatingTrack::Atp, 10).expect("history");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tournament_id, Some(tournament.id));
        assert_eq!(entries[0].match_id, None);
        assert_eq!(entries[0].rating_before, 0);
        assert_eq!(entries[0].rating_after, 100);
        assert_eq!(entries[0].result, RatingResult::Award);

        let participants =
            database::tournaments::list_participants(&conn, tournament.id).expect("participants");
        assert!(participants
            .iter()
            .all(|p| p.placement.is_some() && p.points_awarded.is_some()));
    }

    let err = fx
        .tournaments()
        .finalize(tournament.id, staff, &placements)
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyFinalized(id) if id == tournament.id));

    let conn = database::get_connection(&fx.pool).expect("connection");
    assert_eq!(
        database::ledger::count_for_player(&conn, alice, RatingTrack::Atp).expect("count"),
        1,
        "no second payout"
    );
}

#[test]
fn finalize_demands_a_complete_consistent_placement_map() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let carol = fx.add_player("carol");

    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Strict Cup", 4))
        .expect("created");
    fx.tournaments().advance(tournament.id, staff).expect("open");
    fx.tournaments().register(tournament.id, alice).expect("alice in");
    fx.tournaments().register(tournament.id, bob).expect("bob in");

    let mut full = HashMap::new();
    full.insert(alice, Placement::Winner);
    full.insert(bob, Placement::Finalist);

    // Still open for registration.
    let err = fx
        .tournaments()
        .finalize(tournament.id, staff, &full)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));

    fx.tournaments().advance(tournament.id, staff).expect("underway");

    let mut missing = HashMap::new();
    missing.insert(alice, Placement::Winner);
    let err = fx
        .tournaments()
        .finalize(tournament.id, staff, &missing)
        .unwrap_err();
    assert!(matches!(err, EngineError::IncompletePlacement(_)));

    let mut extra = full.clone();
    extra.insert(carol, Placement::Other);
    let err = fx
        .tournaments()
        .finalize(tournament.id, staff, &extra)
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "outsider placed");

    let mut two_winners = HashMap::new();
    two_winners.insert(alice, Placement::Winner);
    two_winners.insert(bob, Placement::Winner);
    let err = fx
        .tournaments()
        .finalize(tournament.id, staff, &two_winners)
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "two winners");

    let err = fx
        .tournaments()
        .finalize(tournament.id, alice, &full)
        .unwrap_err();
    assert!(matches!(err, EngineError::Authorization(_)));

    // None of the rejected attempts paid anything out.
    let conn = database::get_connection(&fx.pool).expect("connection");
    let row = database::tournaments::find_by_id(&conn, tournament.id)
        .expect("query")
        .expect("tournament");
    assert!(!row.finalized);
    assert_eq!(
        database::ledger::count_for_player(&conn, alice, RatingTrack::Atp).expect("count"),
        0
    );
}

#[test]
fn zero_point_placements_skip_the_ledger() {
    let fx = fixture();
    let staff = fx.add_staff("desk");
    let alice = fx.add_player("alice");
    let bob = fx.add_player("bob");
    let carol = fx.add_player("carol");
    let dave = fx.add_player("dave");

    let tournament = fx
        .tournaments()
        .create(alice, &tournament_input("Open Draw", 8))
        .expect("created");
    fx.tournaments().advance(tournament.id, staff).expect("open");
    for player in [alice, bob, carol, dave] {
        fx.tournaments().register(tournament.id, player).expect("registered");
    }
    fx.tournaments().advance(tournament.id, staff).expect("underway");

    let mut placements = HashMap::new();
    placements.insert(alice, Placement::Winner);
    placements.insert(bob, Placement::Finalist);
    placements.insert(carol, Placement::Other);
    placements.insert(dave, Placement::Other);

    let outcome = fx
        .tournaments()
        .finalize(tournament.id, staff, &placements)
        .expect("finalized");
    assert_eq!(outcome.awards.len(), 4);
    let carol_award = outcome
        .awards
        .iter()
        .find(|a| a.player_id == carol)
        .expect("award");
    assert_eq!(carol_award.points, 0);
    assert_eq!(carol_award.atp_after, 0);

    let conn = database::get_connection(&fx.pool).expect("connection");
    assert_eq!(
        database::ledger::count_for_player(&conn, carol, RatingTrack::Atp).expect("count"),
        0,
        "zero-point placements leave no ledger trace"
    );
    let participants =
        database::tournaments::list_participants(&conn, tournament.id).expect("participants");
    let carol_row = participants
        .iter()
        .find(|p| p.player_id == carol)
        .expect("participant");
    assert_eq!(carol_row.placement, Some(Placement::Other));
    assert_eq!(carol_row.points_awarded, Some(0));
}
