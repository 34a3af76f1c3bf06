//! Queue business logic: batch selection, display order, queue operations, matches, roster.

mod batch;
mod display;
mod matches;
mod palette;
mod queue;
mod roster;

pub use batch::{next_batch, ready_batch, select_next_batch};
pub use display::{
    compute_display_order, match_blocks, session_blocks, session_display_order, DisplaySlot,
    MatchBlock, MatchTag, MATCH_TAG_THRESHOLD,
};
pub use matches::{announcement, court_announcement, end_match, start_match};
pub use palette::{avatar_color, group_color, initials, palette_index, AVATAR_PALETTE, GROUP_PALETTE};
pub use queue::{
    join_queue, join_queue_as_group, reorder_queue_item, rest_all_queue, unbind_from_group,
    withdraw_from_queue, ReorderMove,
};
pub use roster::{import_members_csv, MIN_IMPORT_ROWS};
