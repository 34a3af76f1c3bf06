//! Match lifecycle on a court: start from the queue, end back to the bench.

use crate::logic::batch::ready_batch;
use crate::models::{CourtId, EntrantId, EntrantStatus, Session, SessionError, Timestamp};

/// Start a match on a free court with the next batch from the queue.
///
/// Fails with `InsufficientPlayers` unless the batch fills the court exactly; nothing
/// changes in that case. Returns the ids now on the court, in batch order.
pub fn start_match(
    session: &mut Session,
    court_id: CourtId,
    now: Timestamp,
) -> Result<Vec<EntrantId>, SessionError> {
    if !session.court(court_id)?.is_free() {
        return Err(SessionError::CourtOccupied(court_id));
    }
    let ids: Vec<EntrantId> = ready_batch(session)?.iter().map(|e| e.id).collect();

    for &id in &ids {
        session.entrant_mut(id)?.status = EntrantStatus::Playing;
    }
    let court = session.court_mut(court_id)?;
    court.occupant_ids = ids.clone();
    court.start_time = Some(now);
    log::info!("Match started on {} with {} players", court.name, ids.len());
    Ok(ids)
}

/// End the match on a court: occupants go idle and lose their group. Returns who finished.
/// Ending a free court does nothing.
pub fn end_match(session: &mut Session, court_id: CourtId) -> Result<Vec<EntrantId>, SessionError> {
    let court = session.court_mut(court_id)?;
    let finished = std::mem::take(&mut court.occupant_ids);
    court.start_time = None;
    if !finished.is_empty() {
        log::info!("Match ended on {}", court.name);
    }

    for e in session
        .entrants
        .iter_mut()
        .filter(|e| finished.contains(&e.id))
    {
        e.go_idle();
    }
    Ok(finished)
}

/// Call-up text for a started match, e.g. "Please Ann, Bo, Cy, Di, go to Court 2".
pub fn announcement(court_name: &str, names: &[&str]) -> String {
    format!("Please {}, go to {}", names.join(", "), court_name)
}

/// Call-up text for whoever is currently on `court_id`.
pub fn court_announcement(session: &Session, court_id: CourtId) -> Result<String, SessionError> {
    let court = session.court(court_id)?;
    let names: Vec<&str> = court
        .occupant_ids
        .iter()
        .filter_map(|id| session.entrant(*id).ok())
        .map(|e| e.name.as_str())
        .collect();
    Ok(announcement(&court.name, &names))
}
