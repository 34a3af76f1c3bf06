//! Court and Member (roster entry).

use crate::models::entrant::{EntrantId, SkillLevel, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Courts are numbered from 1.
pub type CourtId = u32;

/// Unique identifier for a roster member.
pub type MemberId = Uuid;

/// A playing court. `occupant_ids` is empty or holds the entrants of the running match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    #[serde(default)]
    pub occupant_ids: Vec<EntrantId>,
    /// Set when a match starts, cleared when it ends.
    #[serde(default)]
    pub start_time: Option<Timestamp>,
}

impl Court {
    pub fn new(id: CourtId) -> Self {
        Self {
            id,
            name: format!("Court {}", id),
            occupant_ids: Vec::new(),
            start_time: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.occupant_ids.is_empty()
    }

    /// Elapsed match time as `mm:ss` (minutes are not wrapped at 60). `00:00` when idle.
    pub fn elapsed_label(&self, now: Timestamp) -> String {
        let secs = match self.start_time {
            Some(start) if !self.is_free() => (now - start).max(0) / 1000,
            _ => 0,
        };
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// A roster member: known player who can be checked in on any session day.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    pub created_at: Timestamp,
}

impl Member {
    pub fn new(name: impl Into<String>, level: SkillLevel, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level,
            created_at: now,
        }
    }
}
