//! Bubble shape resolution.
//!
//! Corners are resolved in logical terms (leading/trailing) and only turned
//! into physical left/right corners at the very end, in
//! [`CornerRadiusSet::to_physical`], where right-to-left layout mirrors them.

use serde::Serialize;

use crate::cluster::ClusterPosition;
use crate::config::{Dimensions, LayoutDirection};
use crate::error::{BubbleError, Result};
use crate::message::{Direction, Message};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerRadius {
    Big,
    Collapsed,
    Zero,
}

impl CornerRadius {
    pub fn to_pixels(self, dims: &Dimensions) -> i32 {
        match self {
            CornerRadius::Big => dims.corner_radius_big,
            CornerRadius::Collapsed => dims.corner_radius_collapsed,
            CornerRadius::Zero => 0,
        }
    }
}

/// Four corners in reading-direction terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CornerRadiusSet {
    pub top_leading: CornerRadius,
    pub top_trailing: CornerRadius,
    pub bottom_trailing: CornerRadius,
    pub bottom_leading: CornerRadius,
}

/// Four corners in screen terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PhysicalCorners<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_right: T,
    pub bottom_left: T,
}

impl<T: Copy> PhysicalCorners<T> {
    pub fn map<U>(self, f: impl Fn(T) -> U) -> PhysicalCorners<U> {
        PhysicalCorners {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }
}

impl CornerRadiusSet {
    pub const fn new(
        top_leading: CornerRadius,
        top_trailing: CornerRadius,
        bottom_trailing: CornerRadius,
        bottom_leading: CornerRadius,
    ) -> Self {
        Self {
            top_leading,
            top_trailing,
            bottom_trailing,
            bottom_leading,
        }
    }

    pub const fn uniform(radius: CornerRadius) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    pub fn zero_top(&mut self) {
        self.top_leading = CornerRadius::Zero;
        self.top_trailing = CornerRadius::Zero;
    }

    pub fn zero_bottom(&mut self) {
        self.bottom_leading = CornerRadius::Zero;
        self.bottom_trailing = CornerRadius::Zero;
    }

    /// Leading and trailing swapped.
    pub fn mirrored(self) -> Self {
        Self::new(self.top_trailing, self.top_leading, self.bottom_leading, self.bottom_trailing)
    }

    pub fn to_physical(self, direction: LayoutDirection) -> PhysicalCorners<CornerRadius> {
        let set = match direction {
            LayoutDirection::Ltr => self,
            LayoutDirection::Rtl => self.mirrored(),
        };
        PhysicalCorners {
            top_left: set.top_leading,
            top_right: set.top_trailing,
            bottom_right: set.bottom_trailing,
            bottom_left: set.bottom_leading,
        }
    }

    pub fn to_pixels(self, dims: &Dimensions, direction: LayoutDirection) -> PhysicalCorners<i32> {
        self.to_physical(direction).map(|r| r.to_pixels(dims))
    }
}

/// Background drawable picked for the bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundVariant {
    SentAlone,
    SentStart,
    SentMiddle,
    SentEnd,
    ReceivedAlone,
    ReceivedStart,
    ReceivedMiddle,
    ReceivedEnd,
}

impl BackgroundVariant {
    pub fn for_position(position: ClusterPosition, direction: Direction) -> Self {
        use BackgroundVariant::*;
        match (direction, position) {
            (Direction::Outgoing, ClusterPosition::Singular) => SentAlone,
            (Direction::Outgoing, ClusterPosition::Start) => SentStart,
            (Direction::Outgoing, ClusterPosition::Middle) => SentMiddle,
            (Direction::Outgoing, ClusterPosition::End) => SentEnd,
            (Direction::Incoming, ClusterPosition::Singular) => ReceivedAlone,
            (Direction::Incoming, ClusterPosition::Start) => ReceivedStart,
            (Direction::Incoming, ClusterPosition::Middle) => ReceivedMiddle,
            (Direction::Incoming, ClusterPosition::End) => ReceivedEnd,
        }
    }
}

/// Base corner table. Outgoing bubbles collapse on the trailing side,
/// incoming ones on the leading side, wherever they touch a neighbour.
pub fn base_corners(position: ClusterPosition, direction: Direction) -> CornerRadiusSet {
    use CornerRadius::{Big as B, Collapsed as C};
    match (position, direction) {
        (ClusterPosition::Singular, _) => CornerRadiusSet::uniform(B),
        (ClusterPosition::Start, Direction::Outgoing) => CornerRadiusSet::new(B, B, C, B),
        (ClusterPosition::Start, Direction::Incoming) => CornerRadiusSet::new(B, B, B, C),
        (ClusterPosition::End, Direction::Outgoing) => CornerRadiusSet::new(B, C, B, B),
        (ClusterPosition::End, Direction::Incoming) => CornerRadiusSet::new(C, B, B, B),
        (ClusterPosition::Middle, Direction::Outgoing) => CornerRadiusSet::new(B, C, C, B),
        (ClusterPosition::Middle, Direction::Incoming) => CornerRadiusSet::new(C, B, B, C),
    }
}

/// Everything the shape of one item depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeInputs {
    pub position: ClusterPosition,
    pub direction: Direction,
    pub is_group_thread: bool,
    pub has_body_text: bool,
    pub has_quote: bool,
    pub has_link_preview: bool,
    pub has_extra_text: bool,
}

impl ShapeInputs {
    pub fn for_message(message: &Message, position: ClusterPosition, is_group_thread: bool) -> Self {
        Self {
            position,
            direction: message.direction,
            is_group_thread,
            has_body_text: message.has_body_text(),
            has_quote: message.has_quote(),
            has_link_preview: message.has_link_preview(),
            has_extra_text: message.has_extra_text,
        }
    }

    /// Incoming group message heading a run: the sender name sits above it.
    fn has_sender_header(&self) -> bool {
        self.is_group_thread && !self.direction.is_outgoing() && self.position.is_start()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BubbleShape {
    pub background: BackgroundVariant,
    pub bubble: CornerRadiusSet,
    /// Corners of media drawn inside the bubble.
    pub media: CornerRadiusSet,
}

/// Resolve bubble and media corners for one item.
pub fn resolve_corners(inputs: &ShapeInputs) -> BubbleShape {
    let bubble = base_corners(inputs.position, inputs.direction);
    let mut media = bubble;

    // Text below the media takes over the bottom edge
    if inputs.has_body_text {
        media.zero_bottom();
    }
    if inputs.has_sender_header() {
        media.zero_top();
    }
    if inputs.has_quote {
        media.zero_top();
    }
    if inputs.has_link_preview || inputs.has_extra_text {
        media.zero_bottom();
    }

    BubbleShape {
        background: BackgroundVariant::for_position(inputs.position, inputs.direction),
        bubble,
        media,
    }
}

/// Top corners of the quote block, `true` meaning big.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuoteCorners {
    pub top_leading_big: bool,
    pub top_trailing_big: bool,
}

/// Quote block corners. A quote without a slot to render into is an
/// integration error, never silently dropped.
pub fn resolve_quote_corners(
    message: &Message,
    inputs: &ShapeInputs,
    quote_slot_available: bool,
) -> Result<Option<QuoteCorners>> {
    if !inputs.has_quote {
        return Ok(None);
    }
    if !quote_slot_available {
        return Err(BubbleError::MissingQuoteSlot { message_id: message.id });
    }

    let outgoing = inputs.direction.is_outgoing();
    let corners = if inputs.position.is_start() {
        let big = outgoing || !inputs.is_group_thread;
        QuoteCorners {
            top_leading_big: big,
            top_trailing_big: big,
        }
    } else {
        QuoteCorners {
            top_leading_big: outgoing,
            top_trailing_big: !outgoing,
        }
    };
    Ok(Some(corners))
}

/// Top corners of a link preview card (leading, trailing).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PreviewCorners {
    pub top_leading: CornerRadius,
    pub top_trailing: CornerRadius,
}

pub fn resolve_link_preview_corners(inputs: &ShapeInputs, big_image: bool) -> PreviewCorners {
    let corners = |top_leading, top_trailing| PreviewCorners { top_leading, top_trailing };
    if big_image || inputs.has_quote || inputs.has_sender_header() {
        corners(CornerRadius::Zero, CornerRadius::Zero)
    } else if inputs.position.is_start() {
        corners(CornerRadius::Big, CornerRadius::Big)
    } else if inputs.direction.is_outgoing() {
        corners(CornerRadius::Big, CornerRadius::Collapsed)
    } else {
        corners(CornerRadius::Collapsed, CornerRadius::Big)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedContactStyle {
    Singular,
    ClusteredOutgoing,
    ClusteredIncoming,
}

/// Contact card styling. Only applies when the card is the whole bubble.
pub fn resolve_shared_contact_style(inputs: &ShapeInputs) -> Option<SharedContactStyle> {
    if inputs.has_body_text {
        return None;
    }
    let style = if inputs.position.is_end() {
        SharedContactStyle::Singular
    } else if inputs.direction.is_outgoing() {
        SharedContactStyle::ClusteredOutgoing
    } else {
        SharedContactStyle::ClusteredIncoming
    };
    Some(style)
}

/// Deleted messages get an outline instead of a fill, except on wallpaper.
pub fn draws_body_outline(message: &Message, has_wallpaper: bool) -> bool {
    !has_wallpaper && message.remote_deleted
}

/// Corner mask handed to the chat-color gradient renderer. Only filled,
/// outgoing bubbles are colorized.
pub fn colorizer_mask(message: &Message, shape: &BubbleShape) -> Option<CornerRadiusSet> {
    if message.is_outgoing() && !message.has_no_bubble() && !message.remote_deleted {
        Some(shape.bubble)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Direction;
    use chrono::{TimeZone, Utc};
    use crate::shape::CornerRadius::{Big as B, Collapsed as C, Zero as Z};

    fn inputs(position: ClusterPosition, direction: Direction) -> ShapeInputs {
        ShapeInputs {
            position,
            direction,
            is_group_thread: false,
            has_body_text: false,
            has_quote: false,
            has_link_preview: false,
            has_extra_text: false,
        }
    }

    fn message(direction: Direction) -> Message {
        Message::text(9, Utc.timestamp_opt(0, 0).unwrap(), "alice", direction, "")
    }

    #[test]
    fn test_base_table() {
        let out = Direction::Outgoing;
        let inc = Direction::Incoming;
        assert_eq!(base_corners(ClusterPosition::Singular, out), CornerRadiusSet::uniform(B));
        assert_eq!(base_corners(ClusterPosition::Singular, inc), CornerRadiusSet::uniform(B));
        assert_eq!(base_corners(ClusterPosition::Start, out), CornerRadiusSet::new(B, B, C, B));
        assert_eq!(base_corners(ClusterPosition::Start, inc), CornerRadiusSet::new(B, B, B, C));
        assert_eq!(base_corners(ClusterPosition::End, out), CornerRadiusSet::new(B, C, B, B));
        assert_eq!(base_corners(ClusterPosition::End, inc), CornerRadiusSet::new(C, B, B, B));
        assert_eq!(base_corners(ClusterPosition::Middle, out), CornerRadiusSet::new(B, C, C, B));
        assert_eq!(base_corners(ClusterPosition::Middle, inc), CornerRadiusSet::new(C, B, B, C));
    }

    #[test]
    fn test_body_text_zeroes_media_bottom_only() {
        let mut i = inputs(ClusterPosition::Singular, Direction::Outgoing);
        i.has_body_text = true;
        let shape = resolve_corners(&i);
        assert_eq!(shape.bubble, CornerRadiusSet::uniform(B));
        assert_eq!(shape.media, CornerRadiusSet::new(B, B, Z, Z));
    }

    #[test]
    fn test_quote_zeroes_media_top() {
        let mut i = inputs(ClusterPosition::Middle, Direction::Incoming);
        i.has_quote = true;
        let shape = resolve_corners(&i);
        assert_eq!(shape.media, CornerRadiusSet::new(Z, Z, B, C));
        assert_eq!(shape.bubble, CornerRadiusSet::new(C, B, B, C));
    }

    #[test]
    fn test_link_preview_or_extra_text_zeroes_media_bottom() {
        let mut i = inputs(ClusterPosition::Start, Direction::Outgoing);
        i.has_extra_text = true;
        assert_eq!(resolve_corners(&i).media, CornerRadiusSet::new(B, B, Z, Z));

        let mut i = inputs(ClusterPosition::Start, Direction::Outgoing);
        i.has_link_preview = true;
        assert_eq!(resolve_corners(&i).media, CornerRadiusSet::new(B, B, Z, Z));
    }

    #[test]
    fn test_group_incoming_start_zeroes_media_top() {
        let mut i = inputs(ClusterPosition::Start, Direction::Incoming);
        i.is_group_thread = true;
        assert_eq!(resolve_corners(&i).media, CornerRadiusSet::new(Z, Z, B, C));

        // Outgoing in a group has no sender header
        let mut i = inputs(ClusterPosition::Start, Direction::Outgoing);
        i.is_group_thread = true;
        assert_eq!(resolve_corners(&i).media, CornerRadiusSet::new(B, B, C, B));
    }

    #[test]
    fn test_rtl_mirrors_physical_corners() {
        let set = CornerRadiusSet::new(B, C, Z, C);
        let ltr = set.to_physical(LayoutDirection::Ltr);
        let rtl = set.to_physical(LayoutDirection::Rtl);
        assert_eq!(ltr.top_left, rtl.top_right);
        assert_eq!(ltr.top_right, rtl.top_left);
        assert_eq!(ltr.bottom_right, rtl.bottom_left);
        assert_eq!(ltr.bottom_left, rtl.bottom_right);
    }

    #[test]
    fn test_to_pixels() {
        let dims = Dimensions::default();
        let px = base_corners(ClusterPosition::Middle, Direction::Outgoing).to_pixels(&dims, LayoutDirection::Ltr);
        assert_eq!(px.top_left, dims.corner_radius_big);
        assert_eq!(px.top_right, dims.corner_radius_collapsed);
        assert_eq!(px.bottom_right, dims.corner_radius_collapsed);
        assert_eq!(px.bottom_left, dims.corner_radius_big);
    }

    #[test]
    fn test_background_variant() {
        assert_eq!(
            resolve_corners(&inputs(ClusterPosition::Middle, Direction::Incoming)).background,
            BackgroundVariant::ReceivedMiddle
        );
        assert_eq!(
            resolve_corners(&inputs(ClusterPosition::Singular, Direction::Outgoing)).background,
            BackgroundVariant::SentAlone
        );
    }

    #[test]
    fn test_quote_corners() {
        let msg = message(Direction::Incoming);
        let mut i = inputs(ClusterPosition::Start, Direction::Incoming);
        i.has_quote = true;
        i.is_group_thread = true;
        let corners = resolve_quote_corners(&msg, &i, true).unwrap().unwrap();
        assert!(!corners.top_leading_big && !corners.top_trailing_big);

        i.is_group_thread = false;
        let corners = resolve_quote_corners(&msg, &i, true).unwrap().unwrap();
        assert!(corners.top_leading_big && corners.top_trailing_big);

        let mut out = inputs(ClusterPosition::End, Direction::Outgoing);
        out.has_quote = true;
        let corners = resolve_quote_corners(&message(Direction::Outgoing), &out, true).unwrap().unwrap();
        assert!(corners.top_leading_big && !corners.top_trailing_big);
    }

    #[test]
    fn test_missing_quote_slot_is_fatal() {
        let msg = message(Direction::Incoming);
        let mut i = inputs(ClusterPosition::Singular, Direction::Incoming);
        i.has_quote = true;
        assert!(matches!(
            resolve_quote_corners(&msg, &i, false),
            Err(BubbleError::MissingQuoteSlot { message_id: 9 })
        ));

        // No quote, no slot needed
        i.has_quote = false;
        assert!(resolve_quote_corners(&msg, &i, false).unwrap().is_none());
    }

    #[test]
    fn test_link_preview_corners() {
        let i = inputs(ClusterPosition::Middle, Direction::Outgoing);
        assert_eq!(resolve_link_preview_corners(&i, true), PreviewCorners { top_leading: Z, top_trailing: Z });
        assert_eq!(resolve_link_preview_corners(&i, false), PreviewCorners { top_leading: B, top_trailing: C });

        let i = inputs(ClusterPosition::End, Direction::Incoming);
        assert_eq!(resolve_link_preview_corners(&i, false), PreviewCorners { top_leading: C, top_trailing: B });

        let i = inputs(ClusterPosition::Singular, Direction::Incoming);
        assert_eq!(resolve_link_preview_corners(&i, false), PreviewCorners { top_leading: B, top_trailing: B });
    }

    #[test]
    fn test_shared_contact_style() {
        let i = inputs(ClusterPosition::End, Direction::Outgoing);
        assert_eq!(resolve_shared_contact_style(&i), Some(SharedContactStyle::Singular));

        let i = inputs(ClusterPosition::Start, Direction::Incoming);
        assert_eq!(resolve_shared_contact_style(&i), Some(SharedContactStyle::ClusteredIncoming));

        let mut i = inputs(ClusterPosition::Start, Direction::Outgoing);
        assert_eq!(resolve_shared_contact_style(&i), Some(SharedContactStyle::ClusteredOutgoing));
        i.has_body_text = true;
        assert_eq!(resolve_shared_contact_style(&i), None);
    }

    #[test]
    fn test_outline_and_colorizer() {
        let mut msg = message(Direction::Outgoing);
        let shape = resolve_corners(&inputs(ClusterPosition::Singular, Direction::Outgoing));
        assert!(!draws_body_outline(&msg, false));
        assert_eq!(colorizer_mask(&msg, &shape), Some(shape.bubble));

        msg.remote_deleted = true;
        assert!(draws_body_outline(&msg, false));
        assert!(!draws_body_outline(&msg, true));
        assert_eq!(colorizer_mask(&msg, &shape), None);

        assert_eq!(colorizer_mask(&message(Direction::Incoming), &shape), None);
    }
}
