//! Queue membership and manual reordering.
//!
//! Order is never stored separately: every operation here works by rewriting `joined_at`.

use crate::logic::batch::group_members;
use crate::models::{EntrantId, EntrantStatus, GroupId, Session, SessionError, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Where a queue item should move.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderMove {
    /// One item earlier.
    Up,
    /// One item later.
    Down,
    /// Trade places with the item containing this entrant (drag and drop).
    Onto(EntrantId),
}

/// Put one idle entrant at the back of the queue, solo.
pub fn join_queue(
    session: &mut Session,
    entrant_id: EntrantId,
    now: Timestamp,
) -> Result<(), SessionError> {
    let entrant = session.entrant_mut(entrant_id)?;
    if !entrant.is_idle() {
        return Err(SessionError::NotIdle(entrant_id));
    }
    entrant.status = EntrantStatus::Queued;
    entrant.group_id = None;
    entrant.joined_at = now;
    Ok(())
}

/// Queue up to `capacity` idle entrants together under a fresh group id, all with the
/// same `joined_at`. A single entrant joins solo. Returns the group id, if any.
pub fn join_queue_as_group(
    session: &mut Session,
    entrant_ids: &[EntrantId],
    now: Timestamp,
) -> Result<Option<GroupId>, SessionError> {
    let mut seen = HashSet::new();
    let ids: Vec<EntrantId> = entrant_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    if ids.is_empty() {
        return Err(SessionError::EmptySelection);
    }
    if ids.len() > session.capacity {
        return Err(SessionError::CapacityExceeded {
            requested: ids.len(),
            capacity: session.capacity,
        });
    }
    for &id in &ids {
        if !session.entrant(id)?.is_idle() {
            return Err(SessionError::NotIdle(id));
        }
    }

    let group_id = if ids.len() > 1 { Some(Uuid::new_v4()) } else { None };
    for &id in &ids {
        let e = session.entrant_mut(id)?;
        e.status = EntrantStatus::Queued;
        e.group_id = group_id;
        e.joined_at = now;
    }
    if let Some(g) = group_id {
        log::info!("Group {} of {} joined the queue", g, ids.len());
    }
    Ok(group_id)
}

/// Take one entrant out of the queue back to the bench. Other group members keep their group.
pub fn withdraw_from_queue(session: &mut Session, entrant_id: EntrantId) -> Result<(), SessionError> {
    let entrant = session.entrant_mut(entrant_id)?;
    if !entrant.is_queued() {
        return Err(SessionError::NotQueued(entrant_id));
    }
    entrant.go_idle();
    Ok(())
}

/// Detach one member from its group. It stays queued, one millisecond ahead of the group
/// it left so it sorts right before the remaining members.
pub fn unbind_from_group(session: &mut Session, entrant_id: EntrantId) -> Result<(), SessionError> {
    let entrant = session.entrant_mut(entrant_id)?;
    if !entrant.is_queued() {
        return Err(SessionError::NotQueued(entrant_id));
    }
    if entrant.group_id.is_none() {
        return Err(SessionError::NotGrouped(entrant_id));
    }
    entrant.group_id = None;
    entrant.joined_at -= 1;
    Ok(())
}

/// Send everyone in the queue back to the bench. Returns how many moved.
pub fn rest_all_queue(session: &mut Session) -> usize {
    let mut moved = 0;
    for e in session.entrants.iter_mut().filter(|e| e.is_queued()) {
        e.go_idle();
        moved += 1;
    }
    moved
}

/// A solo entrant or a whole group, as one movable queue item.
#[derive(Debug)]
struct QueueUnit {
    members: Vec<(EntrantId, Timestamp)>,
}

impl QueueUnit {
    /// Earliest `joined_at` of the unit.
    fn anchor(&self) -> Timestamp {
        self.members.iter().map(|&(_, t)| t).min().unwrap_or_default()
    }

    fn contains(&self, id: EntrantId) -> bool {
        self.members.iter().any(|&(m, _)| m == id)
    }
}

/// Queue items in chronological order, each placed where its first member sorts.
fn queue_units(session: &Session) -> Vec<QueueUnit> {
    let queue = session.queue();
    let mut seen: HashSet<GroupId> = HashSet::new();
    let mut units = Vec::new();
    for e in &queue {
        let members = match e.group_id {
            None => vec![(e.id, e.joined_at)],
            Some(g) if seen.insert(g) => group_members(&queue, g)
                .iter()
                .map(|m| (m.id, m.joined_at))
                .collect(),
            Some(_) => continue,
        };
        units.push(QueueUnit { members });
    }
    units
}

/// Move every member of `unit` so its anchor becomes `anchor`, keeping internal offsets.
fn shift_unit(session: &mut Session, unit: &QueueUnit, anchor: Timestamp) -> Result<(), SessionError> {
    let old = unit.anchor();
    for &(id, t) in &unit.members {
        session.entrant_mut(id)?.joined_at = anchor + (t - old);
    }
    Ok(())
}

/// Move a queue item (the entrant's whole group, if grouped) by swapping `joined_at` with
/// the neighbouring item or with the target item. Moving past either end does nothing.
pub fn reorder_queue_item(
    session: &mut Session,
    entrant_id: EntrantId,
    mv: ReorderMove,
) -> Result<(), SessionError> {
    if !session.entrant(entrant_id)?.is_queued() {
        return Err(SessionError::NotQueued(entrant_id));
    }
    let units = queue_units(session);
    let from = units
        .iter()
        .position(|u| u.contains(entrant_id))
        .ok_or(SessionError::NotQueued(entrant_id))?;

    let to = match mv {
        ReorderMove::Up => match from.checked_sub(1) {
            Some(to) => to,
            None => return Ok(()),
        },
        ReorderMove::Down => {
            if from + 1 >= units.len() {
                return Ok(());
            }
            from + 1
        }
        ReorderMove::Onto(target) => {
            if !session.entrant(target)?.is_queued() {
                return Err(SessionError::NotQueued(target));
            }
            units
                .iter()
                .position(|u| u.contains(target))
                .ok_or(SessionError::NotQueued(target))?
        }
    };
    if from == to {
        return Ok(());
    }

    let (a, b) = (units[from].anchor(), units[to].anchor());
    if a != b {
        shift_unit(session, &units[from], b)?;
        shift_unit(session, &units[to], a)?;
    }

    let mut order: Vec<&QueueUnit> = units.iter().collect();
    order.swap(from, to);
    let ids: Vec<EntrantId> = order
        .iter()
        .flat_map(|u| u.members.iter().map(|&(id, _)| id))
        .collect();
    settle_queue(session, &ids)?;

    log::debug!("Moved queue item {} from {} to {}", entrant_id, from, to);
    Ok(())
}

/// Rewrite the queued entrants' slots in the collection so they appear in `order`.
/// Equal `joined_at` values sort by collection position, so this pins down ties.
fn settle_queue(session: &mut Session, order: &[EntrantId]) -> Result<(), SessionError> {
    let slots: Vec<usize> = session
        .entrants
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_queued())
        .map(|(i, _)| i)
        .collect();
    let placed = order
        .iter()
        .map(|id| session.entrant(*id).cloned())
        .collect::<Result<Vec<_>, _>>()?;
    for (slot, entrant) in slots.into_iter().zip(placed) {
        session.entrants[slot] = entrant;
    }
    Ok(())
}
