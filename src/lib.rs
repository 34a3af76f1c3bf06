//! Court queue web app: library with models, queue ordering and match selection logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    announcement, avatar_color, compute_display_order, court_announcement, end_match,
    group_color, import_members_csv, initials, join_queue, join_queue_as_group, match_blocks,
    next_batch, palette_index, ready_batch, reorder_queue_item, rest_all_queue,
    select_next_batch, session_blocks, session_display_order, start_match, unbind_from_group,
    withdraw_from_queue, DisplaySlot, MatchBlock, MatchTag, ReorderMove,
};
pub use models::{
    now_millis, Court, CourtId, Entrant, EntrantId, EntrantStatus, GroupId, Member, MemberId,
    Session, SessionError, SessionStats, SkillLevel, Timestamp, DEFAULT_CAPACITY,
    INITIAL_COURT_COUNT,
};
pub use store::StoreError;
