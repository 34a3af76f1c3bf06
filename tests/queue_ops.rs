//! Integration tests for queue membership and manual reordering.

use court_queue_web::{
    join_queue, join_queue_as_group, reorder_queue_item, rest_all_queue, unbind_from_group,
    withdraw_from_queue, EntrantId, EntrantStatus, ReorderMove, Session, SessionError,
    SkillLevel,
};

fn session_with(names: &[&str]) -> (Session, Vec<EntrantId>) {
    let mut s = Session::new(2);
    let ids = names
        .iter()
        .map(|n| s.check_in(n, SkillLevel::Beginner, 0).unwrap())
        .collect();
    (s, ids)
}

fn queue_names(s: &Session) -> Vec<String> {
    s.queue().iter().map(|e| e.name.clone()).collect()
}

#[test]
fn join_queue_sets_status_and_time() {
    let (mut s, ids) = session_with(&["A"]);
    join_queue(&mut s, ids[0], 100).unwrap();
    let a = s.entrant(ids[0]).unwrap();
    assert_eq!(a.status, EntrantStatus::Queued);
    assert_eq!(a.joined_at, 100);
    assert_eq!(a.group_id, None);

    assert_eq!(join_queue(&mut s, ids[0], 200), Err(SessionError::NotIdle(ids[0])));
}

#[test]
fn group_join_shares_id_and_time() {
    let (mut s, ids) = session_with(&["A", "B", "C"]);
    let g = join_queue_as_group(&mut s, &ids, 50).unwrap();
    assert!(g.is_some());
    for id in &ids {
        let e = s.entrant(*id).unwrap();
        assert_eq!(e.group_id, g);
        assert_eq!(e.joined_at, 50);
        assert!(e.is_queued());
    }
}

#[test]
fn single_member_group_join_is_solo() {
    let (mut s, ids) = session_with(&["A"]);
    assert_eq!(join_queue_as_group(&mut s, &[ids[0], ids[0]], 1).unwrap(), None);
    assert_eq!(s.entrant(ids[0]).unwrap().group_id, None);
}

#[test]
fn group_join_rejects_oversized_and_busy_without_changes() {
    let (mut s, ids) = session_with(&["A", "B", "C", "D", "E"]);
    let before = s.clone();
    assert_eq!(
        join_queue_as_group(&mut s, &ids, 1),
        Err(SessionError::CapacityExceeded {
            requested: 5,
            capacity: 4
        })
    );
    assert_eq!(s, before);

    join_queue(&mut s, ids[1], 1).unwrap();
    let before = s.clone();
    assert_eq!(
        join_queue_as_group(&mut s, &ids[0..3], 2),
        Err(SessionError::NotIdle(ids[1]))
    );
    assert_eq!(s, before);
    assert_eq!(join_queue_as_group(&mut s, &[], 2), Err(SessionError::EmptySelection));
}

#[test]
fn withdraw_leaves_rest_of_group_intact() {
    let (mut s, ids) = session_with(&["A", "B", "C"]);
    let g = join_queue_as_group(&mut s, &ids, 1).unwrap();
    withdraw_from_queue(&mut s, ids[0]).unwrap();
    let a = s.entrant(ids[0]).unwrap();
    assert!(a.is_idle());
    assert_eq!(a.group_id, None);
    assert_eq!(s.entrant(ids[1]).unwrap().group_id, g);
    assert_eq!(withdraw_from_queue(&mut s, ids[0]), Err(SessionError::NotQueued(ids[0])));
}

#[test]
fn unbind_moves_member_just_ahead_of_group() {
    let (mut s, ids) = session_with(&["Early", "X", "Y"]);
    join_queue(&mut s, ids[0], 1).unwrap();
    join_queue_as_group(&mut s, &ids[1..], 5).unwrap();
    // Swap collection order so Y would sort first among equals without the decrement.
    s.entrants.swap(1, 2);

    unbind_from_group(&mut s, ids[1]).unwrap();
    let x = s.entrant(ids[1]).unwrap();
    assert_eq!(x.group_id, None);
    assert_eq!(x.joined_at, 4);
    assert_eq!(queue_names(&s), ["Early", "X", "Y"]);

    assert_eq!(unbind_from_group(&mut s, ids[1]), Err(SessionError::NotGrouped(ids[1])));
}

#[test]
fn move_up_then_down_restores_order() {
    let (mut s, ids) = session_with(&["A", "B", "C", "D"]);
    for (i, id) in ids.iter().enumerate() {
        join_queue(&mut s, *id, 10 * (i as i64 + 1)).unwrap();
    }
    let original = queue_names(&s);

    reorder_queue_item(&mut s, ids[2], ReorderMove::Up).unwrap();
    assert_eq!(queue_names(&s), ["A", "C", "B", "D"]);
    reorder_queue_item(&mut s, ids[2], ReorderMove::Down).unwrap();
    assert_eq!(queue_names(&s), original);
}

#[test]
fn moving_past_the_ends_does_nothing() {
    let (mut s, ids) = session_with(&["A", "B"]);
    join_queue(&mut s, ids[0], 1).unwrap();
    join_queue(&mut s, ids[1], 2).unwrap();
    let before = s.clone();
    reorder_queue_item(&mut s, ids[0], ReorderMove::Up).unwrap();
    reorder_queue_item(&mut s, ids[1], ReorderMove::Down).unwrap();
    assert_eq!(s, before);
}

#[test]
fn group_moves_as_a_unit() {
    let (mut s, ids) = session_with(&["A", "G1", "G2", "B"]);
    join_queue(&mut s, ids[0], 1).unwrap();
    join_queue_as_group(&mut s, &ids[1..3], 2).unwrap();
    join_queue(&mut s, ids[3], 3).unwrap();

    reorder_queue_item(&mut s, ids[2], ReorderMove::Up).unwrap();
    assert_eq!(queue_names(&s), ["G1", "G2", "A", "B"]);
    assert_eq!(s.entrant(ids[1]).unwrap().joined_at, 1);
    assert_eq!(s.entrant(ids[2]).unwrap().joined_at, 1);

    reorder_queue_item(&mut s, ids[1], ReorderMove::Down).unwrap();
    assert_eq!(queue_names(&s), ["A", "G1", "G2", "B"]);
}

#[test]
fn drop_onto_target_swaps_places() {
    let (mut s, ids) = session_with(&["A", "B", "C", "D"]);
    for (i, id) in ids.iter().enumerate() {
        join_queue(&mut s, *id, i as i64).unwrap();
    }
    reorder_queue_item(&mut s, ids[3], ReorderMove::Onto(ids[0])).unwrap();
    assert_eq!(queue_names(&s), ["D", "B", "C", "A"]);

    withdraw_from_queue(&mut s, ids[1]).unwrap();
    assert_eq!(
        reorder_queue_item(&mut s, ids[3], ReorderMove::Onto(ids[1])),
        Err(SessionError::NotQueued(ids[1]))
    );
}

#[test]
fn equal_timestamps_still_move() {
    let (mut s, ids) = session_with(&["A", "B"]);
    join_queue(&mut s, ids[0], 7).unwrap();
    join_queue(&mut s, ids[1], 7).unwrap();
    assert_eq!(queue_names(&s), ["A", "B"]);
    reorder_queue_item(&mut s, ids[1], ReorderMove::Up).unwrap();
    assert_eq!(queue_names(&s), ["B", "A"]);
    reorder_queue_item(&mut s, ids[1], ReorderMove::Down).unwrap();
    assert_eq!(queue_names(&s), ["A", "B"]);
}

#[test]
fn tied_neighbour_moves_exactly_one_place() {
    // Checked in as B, C, A so the earliest-sorting entrant sits last in the collection.
    let (mut s, ids) = session_with(&["B", "C", "A"]);
    join_queue(&mut s, ids[2], 4).unwrap();
    join_queue(&mut s, ids[0], 5).unwrap();
    join_queue(&mut s, ids[1], 5).unwrap();
    assert_eq!(queue_names(&s), ["A", "B", "C"]);

    reorder_queue_item(&mut s, ids[1], ReorderMove::Up).unwrap();
    assert_eq!(queue_names(&s), ["A", "C", "B"]);
    reorder_queue_item(&mut s, ids[1], ReorderMove::Down).unwrap();
    assert_eq!(queue_names(&s), ["A", "B", "C"]);
}

#[test]
fn swapped_timestamp_does_not_overtake_a_tie() {
    // X sorts first; Y and Z share a timestamp and Z comes before X in the collection.
    let (mut s, ids) = session_with(&["Y", "Z", "X"]);
    join_queue(&mut s, ids[2], 1).unwrap();
    join_queue(&mut s, ids[0], 2).unwrap();
    join_queue(&mut s, ids[1], 2).unwrap();
    assert_eq!(queue_names(&s), ["X", "Y", "Z"]);

    reorder_queue_item(&mut s, ids[0], ReorderMove::Up).unwrap();
    assert_eq!(queue_names(&s), ["Y", "X", "Z"]);
    assert_eq!(s.entrant(ids[0]).unwrap().joined_at, 1);
    assert_eq!(s.entrant(ids[2]).unwrap().joined_at, 2);
}

#[test]
fn rest_all_clears_queue_and_groups() {
    let (mut s, ids) = session_with(&["A", "B", "C"]);
    join_queue_as_group(&mut s, &ids[0..2], 1).unwrap();
    join_queue(&mut s, ids[2], 2).unwrap();
    assert_eq!(rest_all_queue(&mut s), 3);
    assert!(s.queue().is_empty());
    assert!(s.entrants.iter().all(|e| e.group_id.is_none()));
}

#[test]
fn apply_returns_new_state_only_on_success() {
    let (s, ids) = session_with(&["A"]);
    let (next, ()) = s.apply(|s| join_queue(s, ids[0], 9)).unwrap();
    assert!(next.entrant(ids[0]).unwrap().is_queued());
    assert!(s.entrant(ids[0]).unwrap().is_idle());

    let err = s
        .apply(|s| {
            join_queue(s, ids[0], 9)?;
            withdraw_from_queue(s, ids[0])?;
            withdraw_from_queue(s, ids[0])
        })
        .unwrap_err();
    assert_eq!(err, SessionError::NotQueued(ids[0]));
    assert!(s.entrant(ids[0]).unwrap().is_idle());
}
