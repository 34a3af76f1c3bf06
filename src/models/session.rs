//! Session: entrants, courts and roster for one day of play.

use crate::models::court::{Court, CourtId, Member, MemberId};
use crate::models::entrant::{Entrant, EntrantId, EntrantStatus, SkillLevel, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Maximum entrants per court (and per match).
pub const DEFAULT_CAPACITY: usize = 4;

/// Courts created for a brand new session.
pub const INITIAL_COURT_COUNT: u32 = 6;

/// Current wall-clock time as a queue timestamp.
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Errors that can occur during session operations. A failed operation leaves the session unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// The next batch does not fill a court.
    InsufficientPlayers { selected: usize, capacity: usize },
    /// A group or selection larger than a court.
    CapacityExceeded { requested: usize, capacity: usize },
    /// The name is already on the roster or already checked in.
    DuplicateName(String),
    /// Names must not be blank.
    EmptyName,
    /// Group join with no entrants.
    EmptySelection,
    /// The court has players on it.
    CourtOccupied(CourtId),
    /// At least one court must remain.
    LastCourt,
    /// Roster import rejected as a whole.
    MalformedImport(String),
    EntrantNotFound(EntrantId),
    MemberNotFound(MemberId),
    CourtNotFound(CourtId),
    /// Entrant must be on the bench for this action.
    NotIdle(EntrantId),
    /// Entrant must be in the queue for this action.
    NotQueued(EntrantId),
    /// Entrant is not part of a group.
    NotGrouped(EntrantId),
}

impl SessionError {
    /// True for lookups of ids that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SessionError::EntrantNotFound(_)
                | SessionError::MemberNotFound(_)
                | SessionError::CourtNotFound(_)
        )
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InsufficientPlayers { selected, capacity } => write!(
                f,
                "Not enough players to start: {} of {} slots can be filled",
                selected, capacity
            ),
            SessionError::CapacityExceeded { requested, capacity } => write!(
                f,
                "At most {} players can queue together (requested {})",
                capacity, requested
            ),
            SessionError::DuplicateName(name) => write!(f, "'{}' already exists", name),
            SessionError::EmptyName => write!(f, "Name must not be empty"),
            SessionError::EmptySelection => write!(f, "No players selected"),
            SessionError::CourtOccupied(id) => write!(f, "Court {} still has players on it", id),
            SessionError::LastCourt => write!(f, "At least one court must remain"),
            SessionError::MalformedImport(reason) => write!(f, "Import rejected: {}", reason),
            SessionError::EntrantNotFound(_) => write!(f, "Player not found"),
            SessionError::MemberNotFound(_) => write!(f, "Member not found"),
            SessionError::CourtNotFound(id) => write!(f, "Court {} not found", id),
            SessionError::NotIdle(_) => write!(f, "Player is not on the bench"),
            SessionError::NotQueued(_) => write!(f, "Player is not in the queue"),
            SessionError::NotGrouped(_) => write!(f, "Player is not in a group"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Head counts for the header / court toolbar.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub checked_in: usize,
    pub idle: usize,
    pub queued: usize,
    pub playing: usize,
    pub free_courts: usize,
}

/// Full session state. Queue order is derived from the entrants on every read.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub entrants: Vec<Entrant>,
    #[serde(default)]
    pub courts: Vec<Court>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(INITIAL_COURT_COUNT)
    }
}

impl Session {
    /// Create an empty session with `court_count` free courts.
    pub fn new(court_count: u32) -> Self {
        Self {
            entrants: Vec::new(),
            courts: (1..=court_count).map(Court::new).collect(),
            members: Vec::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Run `op` against a copy and return the new state. On error `self` is untouched,
    /// so readers only ever see whole transitions.
    pub fn apply<T, F>(&self, op: F) -> Result<(Session, T), SessionError>
    where
        F: FnOnce(&mut Session) -> Result<T, SessionError>,
    {
        let mut next = self.clone();
        let out = op(&mut next)?;
        Ok((next, out))
    }

    pub fn entrant(&self, id: EntrantId) -> Result<&Entrant, SessionError> {
        self.entrants
            .iter()
            .find(|e| e.id == id)
            .ok_or(SessionError::EntrantNotFound(id))
    }

    pub fn entrant_mut(&mut self, id: EntrantId) -> Result<&mut Entrant, SessionError> {
        self.entrants
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(SessionError::EntrantNotFound(id))
    }

    pub fn court(&self, id: CourtId) -> Result<&Court, SessionError> {
        self.courts
            .iter()
            .find(|c| c.id == id)
            .ok_or(SessionError::CourtNotFound(id))
    }

    pub fn court_mut(&mut self, id: CourtId) -> Result<&mut Court, SessionError> {
        self.courts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SessionError::CourtNotFound(id))
    }

    /// Queued entrants sorted by `joined_at` (stable: ties keep collection order).
    pub fn queue(&self) -> Vec<&Entrant> {
        let mut queue: Vec<&Entrant> = self.entrants.iter().filter(|e| e.is_queued()).collect();
        queue.sort_by_key(|e| e.joined_at);
        queue
    }

    /// Idle entrants, most recently joined first.
    pub fn bench(&self) -> Vec<&Entrant> {
        let mut bench: Vec<&Entrant> = self.entrants.iter().filter(|e| e.is_idle()).collect();
        bench.sort_by_key(|e| std::cmp::Reverse(e.joined_at));
        bench
    }

    pub fn stats(&self) -> SessionStats {
        let count = |s: EntrantStatus| self.entrants.iter().filter(|e| e.status == s).count();
        SessionStats {
            checked_in: self.entrants.len(),
            idle: count(EntrantStatus::Idle),
            queued: count(EntrantStatus::Queued),
            playing: count(EntrantStatus::Playing),
            free_courts: self.courts.iter().filter(|c| c.is_free()).count(),
        }
    }

    /// Add a roster member (beginner). Names are trimmed and unique (case-insensitive).
    pub fn create_member(&mut self, name: &str, now: Timestamp) -> Result<MemberId, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.members.iter().any(|m| same_name(&m.name, name)) {
            return Err(SessionError::DuplicateName(name.to_string()));
        }
        let member = Member::new(name, SkillLevel::default(), now);
        let id = member.id;
        self.members.push(member);
        Ok(id)
    }

    /// Delete a roster member. Does not affect a checked-in entrant with the same name.
    pub fn remove_member(&mut self, member_id: MemberId) -> Result<(), SessionError> {
        let idx = self
            .members
            .iter()
            .position(|m| m.id == member_id)
            .ok_or(SessionError::MemberNotFound(member_id))?;
        self.members.remove(idx);
        Ok(())
    }

    /// Change a member's level; a checked-in entrant with the same name follows.
    pub fn update_member_level(
        &mut self,
        member_id: MemberId,
        level: SkillLevel,
    ) -> Result<(), SessionError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or(SessionError::MemberNotFound(member_id))?;
        member.level = level;
        let name = member.name.clone();
        for e in self.entrants.iter_mut().filter(|e| same_name(&e.name, &name)) {
            e.level = level;
        }
        Ok(())
    }

    /// Change an entrant's level; the roster member with the same name follows.
    pub fn update_entrant_level(
        &mut self,
        entrant_id: EntrantId,
        level: SkillLevel,
    ) -> Result<(), SessionError> {
        let entrant = self.entrant_mut(entrant_id)?;
        entrant.level = level;
        let name = entrant.name.clone();
        for m in self.members.iter_mut().filter(|m| same_name(&m.name, &name)) {
            m.level = level;
        }
        Ok(())
    }

    /// Members matching `term` (case-insensitive substring), newest first, split into
    /// (checked in, not checked in).
    pub fn search_members(&self, term: &str) -> (Vec<&Member>, Vec<&Member>) {
        let term = term.trim().to_lowercase();
        let mut found: Vec<&Member> = self
            .members
            .iter()
            .filter(|m| term.is_empty() || m.name.to_lowercase().contains(&term))
            .collect();
        found.sort_by_key(|m| std::cmp::Reverse(m.created_at));
        found
            .into_iter()
            .partition(|m| self.entrants.iter().any(|e| same_name(&e.name, &m.name)))
    }

    /// Check a walk-in onto the bench.
    pub fn check_in(
        &mut self,
        name: &str,
        level: SkillLevel,
        now: Timestamp,
    ) -> Result<EntrantId, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.entrants.iter().any(|e| same_name(&e.name, name)) {
            return Err(SessionError::DuplicateName(name.to_string()));
        }
        let entrant = Entrant::new(name, level, now);
        let id = entrant.id;
        log::debug!("Checked in {}", name);
        self.entrants.push(entrant);
        Ok(id)
    }

    /// Check a roster member onto the bench with their stored level.
    pub fn check_in_member(
        &mut self,
        member_id: MemberId,
        now: Timestamp,
    ) -> Result<EntrantId, SessionError> {
        let member = self
            .members
            .iter()
            .find(|m| m.id == member_id)
            .ok_or(SessionError::MemberNotFound(member_id))?;
        let (name, level) = (member.name.clone(), member.level);
        self.check_in(&name, level, now)
    }

    /// Early leave: drop the entrant whatever its status and take it off any court.
    pub fn remove_entrant(&mut self, entrant_id: EntrantId) -> Result<(), SessionError> {
        let idx = self
            .entrants
            .iter()
            .position(|e| e.id == entrant_id)
            .ok_or(SessionError::EntrantNotFound(entrant_id))?;
        let entrant = self.entrants.remove(idx);
        for court in &mut self.courts {
            court.occupant_ids.retain(|id| *id != entrant_id);
        }
        log::info!("{} left early", entrant.name);
        Ok(())
    }

    /// Remove every idle entrant from the session. Returns how many left.
    pub fn clear_bench(&mut self) -> usize {
        let before = self.entrants.len();
        self.entrants.retain(|e| !e.is_idle());
        before - self.entrants.len()
    }

    /// End of day: every entrant back to the bench, every court cleared.
    pub fn reset_session(&mut self) {
        for e in &mut self.entrants {
            e.go_idle();
        }
        for c in &mut self.courts {
            c.occupant_ids.clear();
            c.start_time = None;
        }
    }

    /// Append a court numbered one past the highest id.
    pub fn add_court(&mut self) -> CourtId {
        let id = self.courts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        self.courts.push(Court::new(id));
        id
    }

    /// Remove the last court. Refused if it is the only court or is in use.
    pub fn remove_court(&mut self) -> Result<CourtId, SessionError> {
        if self.courts.len() <= 1 {
            return Err(SessionError::LastCourt);
        }
        let last = self.courts.last().ok_or(SessionError::LastCourt)?;
        if !last.is_free() {
            return Err(SessionError::CourtOccupied(last.id));
        }
        let id = last.id;
        self.courts.pop();
        Ok(id)
    }
}
