//! Match batch selection: who goes on the next free court.

use crate::models::{Entrant, GroupId, Session, SessionError};
use std::collections::HashSet;

/// Greedily pick the next batch of at most `capacity` entrants from an ordered queue.
///
/// 1. Walk the queue in order, stopping once `capacity` entrants are picked.
/// 2. Solo entrants always take a slot.
/// 3. On the first member of a group, gather every member of that group from the whole
///    queue. The group is taken only if all of it fits; either way it is not looked at again.
///
/// Groups are never split. A group that does not fit waits for a later batch.
pub fn select_next_batch<'a>(queue: &[&'a Entrant], capacity: usize) -> Vec<&'a Entrant> {
    let mut batch: Vec<&'a Entrant> = Vec::with_capacity(capacity);
    let mut decided: HashSet<GroupId> = HashSet::new();

    for &entrant in queue {
        if batch.len() >= capacity {
            break;
        }
        match entrant.group_id {
            None => batch.push(entrant),
            Some(group_id) => {
                if !decided.insert(group_id) {
                    continue;
                }
                let members = group_members(queue, group_id);
                if batch.len() + members.len() <= capacity {
                    batch.extend(members);
                }
            }
        }
    }

    batch
}

/// Every entrant of `group_id` in `queue`, in queue order.
pub(crate) fn group_members<'a>(queue: &[&'a Entrant], group_id: GroupId) -> Vec<&'a Entrant> {
    queue
        .iter()
        .copied()
        .filter(|e| e.group_id == Some(group_id))
        .collect()
}

/// The batch a free court would take right now, from the session's queue.
pub fn next_batch(session: &Session) -> Vec<&Entrant> {
    select_next_batch(&session.queue(), session.capacity)
}

/// The next batch, but only if it fills a court.
pub fn ready_batch(session: &Session) -> Result<Vec<&Entrant>, SessionError> {
    let batch = next_batch(session);
    if batch.len() < session.capacity {
        return Err(SessionError::InsufficientPlayers {
            selected: batch.len(),
            capacity: session.capacity,
        });
    }
    Ok(batch)
}
