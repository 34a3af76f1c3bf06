//! Integration tests for match batch selection.

use court_queue_web::{
    next_batch, ready_batch, select_next_batch, Entrant, EntrantStatus, Session, SessionError,
    SkillLevel,
};
use uuid::Uuid;

fn solo(name: &str, t: i64) -> Entrant {
    let mut e = Entrant::new(name, SkillLevel::Beginner, t);
    e.status = EntrantStatus::Queued;
    e
}

fn group(names: &[&str], t: i64) -> Vec<Entrant> {
    let g = Uuid::new_v4();
    names
        .iter()
        .map(|n| {
            let mut e = solo(n, t);
            e.group_id = Some(g);
            e
        })
        .collect()
}

fn names(batch: &[&Entrant]) -> Vec<String> {
    batch.iter().map(|e| e.name.clone()).collect()
}

#[test]
fn five_solos_take_first_four() {
    let q: Vec<Entrant> = ["A", "B", "C", "D", "E"]
        .iter()
        .enumerate()
        .map(|(i, n)| solo(n, i as i64 + 1))
        .collect();
    let refs: Vec<&Entrant> = q.iter().collect();
    let batch = select_next_batch(&refs, 4);
    assert_eq!(names(&batch), ["A", "B", "C", "D"]);

    let rest: Vec<&Entrant> = refs[4..].to_vec();
    let second = select_next_batch(&rest, 4);
    assert_eq!(names(&second), ["E"]);
}

#[test]
fn group_of_three_plus_solo_fills_court() {
    let mut q = group(&["X", "Y", "Z"], 1);
    q.push(solo("W", 2));
    let refs: Vec<&Entrant> = q.iter().collect();
    assert_eq!(names(&select_next_batch(&refs, 4)), ["X", "Y", "Z", "W"]);
}

#[test]
fn full_group_leaves_trailing_solo() {
    let mut q = group(&["P", "Q", "R", "S"], 1);
    q.push(solo("T", 2));
    let refs: Vec<&Entrant> = q.iter().collect();
    assert_eq!(names(&select_next_batch(&refs, 4)), ["P", "Q", "R", "S"]);
}

#[test]
fn group_that_does_not_fit_is_skipped_whole() {
    let mut q = vec![solo("A", 1), solo("B", 2)];
    q.extend(group(&["G1", "G2", "G3"], 3));
    q.push(solo("C", 4));
    q.push(solo("D", 5));
    let refs: Vec<&Entrant> = q.iter().collect();
    // Two slots used, a group of three cannot fit, later solos fill in.
    assert_eq!(names(&select_next_batch(&refs, 4)), ["A", "B", "C", "D"]);
}

#[test]
fn consecutive_groups_are_checked_against_remaining_room() {
    let mut q = group(&["A1", "A2"], 1);
    q.extend(group(&["B1", "B2", "B3"], 2));
    q.extend(group(&["C1", "C2"], 3));
    let refs: Vec<&Entrant> = q.iter().collect();
    assert_eq!(names(&select_next_batch(&refs, 4)), ["A1", "A2", "C1", "C2"]);
}

#[test]
fn non_contiguous_group_members_are_gathered() {
    let g = Uuid::new_v4();
    let mut x = solo("X", 1);
    x.group_id = Some(g);
    let mut y = solo("Y", 3);
    y.group_id = Some(g);
    let q = vec![x, solo("M", 2), y, solo("N", 4)];
    let refs: Vec<&Entrant> = q.iter().collect();
    assert_eq!(names(&select_next_batch(&refs, 4)), ["X", "Y", "M", "N"]);
}

#[test]
fn batch_never_exceeds_capacity() {
    let q: Vec<Entrant> = (0..10).map(|i| solo(&format!("P{i}"), i)).collect();
    let refs: Vec<&Entrant> = q.iter().collect();
    for cap in 0..6 {
        assert!(select_next_batch(&refs, cap).len() <= cap);
    }
    assert!(select_next_batch(&[], 4).is_empty());
}

#[test]
fn session_batch_ignores_idle_and_playing_entrants() {
    let mut s = Session::new(2);
    s.entrants.push(solo("A", 3));
    let mut idle = solo("Idle", 1);
    idle.status = EntrantStatus::Idle;
    s.entrants.push(idle);
    let mut playing = solo("Busy", 2);
    playing.status = EntrantStatus::Playing;
    s.entrants.push(playing);
    s.entrants.push(solo("B", 4));

    assert_eq!(names(&next_batch(&s)), ["A", "B"]);
    assert_eq!(
        ready_batch(&s).unwrap_err(),
        SessionError::InsufficientPlayers {
            selected: 2,
            capacity: 4
        }
    );
}
