//! Data structures for the court queue: entrants, courts, roster, session state.

mod court;
mod entrant;
mod session;

pub use court::{Court, CourtId, Member, MemberId};
pub use entrant::{Entrant, EntrantId, EntrantStatus, GroupId, SkillLevel, Timestamp};
pub use session::{
    now_millis, Session, SessionError, SessionStats, DEFAULT_CAPACITY, INITIAL_COURT_COUNT,
};
