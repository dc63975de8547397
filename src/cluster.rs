//! Cluster classification: where a message sits in a run of messages that
//! read as one visual block.
//!
//! A run continues while messages share a calendar day, no update event
//! interrupts it, and (in groups) the sender or (in 1:1 threads) the
//! direction stays the same. A reaction badge always ends the run.

use serde::Serialize;

use crate::clock::FeedClock;
use crate::config::{Dimensions, VerticalInsets};
use crate::feed::NeighborContext;
use crate::message::Message;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterPosition {
    Singular,
    Start,
    Middle,
    End,
}

impl ClusterPosition {
    pub fn is_start(self) -> bool {
        matches!(self, ClusterPosition::Singular | ClusterPosition::Start)
    }

    pub fn is_end(self) -> bool {
        matches!(self, ClusterPosition::Singular | ClusterPosition::End)
    }
}

/// Whether `current` and `neighbor` belong to the same run, ignoring reactions.
fn continues_run(current: &Message, neighbor: &Message, is_group_thread: bool, clock: &FeedClock) -> bool {
    if neighbor.is_update() || current.is_update() {
        return false;
    }
    if !clock.is_same_day(current.timestamp, neighbor.timestamp) {
        return false;
    }
    if is_group_thread {
        // An unknown sender cannot be proven equal, so it breaks the run
        !current.sender.is_empty() && current.sender == neighbor.sender
    } else {
        current.direction == neighbor.direction
    }
}

pub fn is_start_of_cluster(current: &Message, previous: Option<&Message>, is_group_thread: bool, clock: &FeedClock) -> bool {
    match previous {
        None => true,
        Some(prev) => !continues_run(current, prev, is_group_thread, clock),
    }
}

pub fn is_end_of_cluster(current: &Message, next: Option<&Message>, is_group_thread: bool, clock: &FeedClock) -> bool {
    if current.has_reactions() {
        return true;
    }
    match next {
        None => true,
        Some(next) => !continues_run(current, next, is_group_thread, clock),
    }
}

pub fn is_singular(current: &Message, ctx: &NeighborContext<'_>, clock: &FeedClock) -> bool {
    is_start_of_cluster(current, ctx.previous, ctx.is_group_thread, clock)
        && is_end_of_cluster(current, ctx.next, ctx.is_group_thread, clock)
}

/// Classify `current` within its feed neighbourhood.
pub fn classify(current: &Message, ctx: &NeighborContext<'_>, clock: &FeedClock) -> ClusterPosition {
    let start = is_start_of_cluster(current, ctx.previous, ctx.is_group_thread, clock);
    let end = is_end_of_cluster(current, ctx.next, ctx.is_group_thread, clock);
    match (start, end) {
        (true, true) => ClusterPosition::Singular,
        (true, false) => ClusterPosition::Start,
        (false, true) => ClusterPosition::End,
        (false, false) => ClusterPosition::Middle,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingKind {
    Default,
    Collapsed,
}

impl SpacingKind {
    pub fn to_pixels(self, dims: &Dimensions) -> i32 {
        match self {
            SpacingKind::Default => dims.spacing_default,
            SpacingKind::Collapsed => dims.spacing_collapsed,
        }
    }
}

/// Vertical gap above and below the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MessageSpacing {
    pub top: SpacingKind,
    pub bottom: SpacingKind,
}

impl MessageSpacing {
    pub fn to_pixels(&self, dims: &Dimensions) -> VerticalInsets {
        VerticalInsets {
            top: self.top.to_pixels(dims),
            bottom: self.bottom.to_pixels(dims),
        }
    }
}

/// Full spacing at cluster boundaries, tight spacing inside a cluster.
pub fn message_spacing(position: ClusterPosition) -> MessageSpacing {
    let kind = |boundary: bool| if boundary { SpacingKind::Default } else { SpacingKind::Collapsed };
    MessageSpacing {
        top: kind(position.is_start()),
        bottom: kind(position.is_end()),
    }
}

/// Sender header and avatar visibility for an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuthorDecoration {
    /// Reserve the avatar column at all.
    pub avatar_column: bool,
    pub show_sender_name: bool,
    pub show_avatar: bool,
}

/// Only incoming group messages are decorated. The name heads a sender run
/// (or a new day), the avatar sits beside its last message.
///
/// The avatar rule ignores day boundaries and reactions: the picture
/// follows the sender, not the bubble shape.
pub fn author_decoration(current: &Message, ctx: &NeighborContext<'_>, clock: &FeedClock) -> AuthorDecoration {
    if !ctx.is_group_thread || current.is_outgoing() {
        return AuthorDecoration::default();
    }

    let show_sender_name = match ctx.previous {
        None => true,
        Some(prev) => {
            prev.is_update()
                || prev.sender != current.sender
                || !clock.is_same_day(prev.timestamp, current.timestamp)
        }
    };

    let show_avatar = match ctx.next {
        None => true,
        Some(next) => next.is_update() || next.sender != current.sender,
    };

    AuthorDecoration {
        avatar_column: true,
        show_sender_name,
        show_avatar,
    }
}
