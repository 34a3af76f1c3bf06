//! Queue display order: the queue carved into capacity-sized match blocks.
//!
//! Blocks come from repeatedly running [`select_next_batch`] on whatever is still waiting,
//! so the first block is exactly what the next free court would take, the second block what
//! the court after that would take, and so on. A group that did not fit a block shows up in
//! a later one, even if solo entrants who joined after it are shown ahead of it.

use crate::logic::batch::{group_members, select_next_batch};
use crate::models::{Entrant, EntrantId, Session, SkillLevel};
use serde::Serialize;
use std::collections::HashSet;

/// Entrants of one level needed to tag a block.
pub const MATCH_TAG_THRESHOLD: usize = 3;

/// One visual queue slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplaySlot<'a> {
    Player(&'a Entrant),
    /// Filler padding block number `block` up to capacity.
    Empty { block: usize },
}

impl DisplaySlot<'_> {
    pub fn entrant(&self) -> Option<&Entrant> {
        match self {
            DisplaySlot::Player(e) => Some(*e),
            DisplaySlot::Empty { .. } => None,
        }
    }
}

/// Skill flavor of a prospective match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTag {
    /// Mostly advanced players.
    Intense,
    /// Mostly beginners.
    Casual,
}

/// A prospective match: the entrants one court would take, in order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchBlock<'a> {
    pub index: usize,
    pub entrants: Vec<&'a Entrant>,
    pub capacity: usize,
}

impl<'a> MatchBlock<'a> {
    /// Empty slots needed to pad this block to capacity.
    pub fn fillers(&self) -> usize {
        self.capacity.saturating_sub(self.entrants.len())
    }

    /// A full block can start a match.
    pub fn is_playable(&self) -> bool {
        self.entrants.len() == self.capacity
    }

    pub fn tag(&self) -> Option<MatchTag> {
        let count = |level: SkillLevel| self.entrants.iter().filter(|e| e.level == level).count();
        if count(SkillLevel::Advanced) >= MATCH_TAG_THRESHOLD {
            Some(MatchTag::Intense)
        } else if count(SkillLevel::Beginner) >= MATCH_TAG_THRESHOLD {
            Some(MatchTag::Casual)
        } else {
            None
        }
    }

    /// Members followed by fillers.
    pub fn slots(&self) -> impl Iterator<Item = DisplaySlot<'a>> + '_ {
        let index = self.index;
        self.entrants
            .iter()
            .map(|&e| DisplaySlot::Player(e))
            .chain((0..self.fillers()).map(move |_| DisplaySlot::Empty { block: index }))
    }
}

/// Carve the queued entrants (any order, any status mix) into successive match blocks.
pub fn match_blocks(entrants: &[Entrant], capacity: usize) -> Vec<MatchBlock<'_>> {
    let mut pool: Vec<&Entrant> = entrants.iter().filter(|e| e.is_queued()).collect();
    pool.sort_by_key(|e| e.joined_at);

    let mut blocks = Vec::new();
    while !pool.is_empty() {
        let mut batch = select_next_batch(&pool, capacity);
        if batch.is_empty() {
            // Only an oversized group (bad persisted data) can get here.
            let head = pool[0];
            log::warn!(
                "Queue head {} cannot be placed in a block of {}; showing its group on its own",
                head.name,
                capacity
            );
            batch = match head.group_id {
                Some(group_id) => group_members(&pool, group_id),
                None => vec![head],
            };
        }
        let taken: HashSet<EntrantId> = batch.iter().map(|e| e.id).collect();
        pool.retain(|e| !taken.contains(&e.id));
        blocks.push(MatchBlock {
            index: blocks.len(),
            entrants: batch,
            capacity,
        });
    }
    blocks
}

/// Display slots for the whole queue: every block's members, each block padded to capacity.
pub fn compute_display_order(entrants: &[Entrant], capacity: usize) -> Vec<DisplaySlot<'_>> {
    match_blocks(entrants, capacity)
        .iter()
        .flat_map(|block| block.slots().collect::<Vec<_>>())
        .collect()
}

/// Display slots for a session's queue.
pub fn session_display_order(session: &Session) -> Vec<DisplaySlot<'_>> {
    compute_display_order(&session.entrants, session.capacity)
}

/// Match blocks for a session's queue.
pub fn session_blocks(session: &Session) -> Vec<MatchBlock<'_>> {
    match_blocks(&session.entrants, session.capacity)
}
