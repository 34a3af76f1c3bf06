//! Entrant (checked-in person), SkillLevel, and EntrantStatus.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an entrant (used in courts, queue and lookups).
pub type EntrantId = Uuid;

/// Shared id of entrants that must be seated on the same court.
pub type GroupId = Uuid;

/// Milliseconds since the Unix epoch. The queue is ordered by this value alone.
pub type Timestamp = i64;

/// Where the entrant currently is.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrantStatus {
    /// On the bench.
    #[default]
    Idle,
    /// Waiting in the queue.
    Queued,
    /// Occupying a court.
    Playing,
}

/// Skill tier. Records persisted before levels existed load as `Beginner`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Next tier, wrapping from advanced back to beginner (level toggle button).
    pub fn next(self) -> Self {
        match self {
            SkillLevel::Beginner => SkillLevel::Intermediate,
            SkillLevel::Intermediate => SkillLevel::Advanced,
            SkillLevel::Advanced => SkillLevel::Beginner,
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

/// A person checked into the session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    #[serde(default)]
    pub status: EntrantStatus,
    /// None for solo entrants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Ordering key; rewritten by reorder and unbind.
    pub joined_at: Timestamp,
    #[serde(default)]
    pub level: SkillLevel,
}

impl Entrant {
    /// Create an idle, ungrouped entrant.
    pub fn new(name: impl Into<String>, level: SkillLevel, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: EntrantStatus::Idle,
            group_id: None,
            joined_at: now,
            level,
        }
    }

    pub fn is_queued(&self) -> bool {
        self.status == EntrantStatus::Queued
    }

    pub fn is_idle(&self) -> bool {
        self.status == EntrantStatus::Idle
    }

    /// Back to the bench, leaving any group.
    pub fn go_idle(&mut self) {
        self.status = EntrantStatus::Idle;
        self.group_id = None;
    }
}
