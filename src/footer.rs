//! Footer (timestamp and delivery status) visibility and placement.

use serde::Serialize;

use crate::clock::FeedClock;
use crate::cluster::{is_end_of_cluster, ClusterPosition};
use crate::config::{Dimensions, VerticalInsets};
use crate::message::{DeliveryStatus, Message};
use crate::variant::ContentVariant;

/// Whether the footer is shown for `current`.
///
/// Any pending state, a timer, an insecure transport or audio (the footer
/// hosts the playback speed toggle) forces it. Otherwise it is shown at the
/// end of a cluster or when the next message would display a different
/// timestamp.
pub fn is_footer_visible(current: &Message, next: Option<&Message>, is_group_thread: bool, clock: &FeedClock) -> bool {
    if current.has_audio() {
        return true;
    }

    let forced_by_state = current.expires_in_ms > 0
        || !current.secure
        || matches!(
            current.status,
            DeliveryStatus::Pending | DeliveryStatus::PendingApproval | DeliveryStatus::Failed | DeliveryStatus::RateLimited
        );
    if forced_by_state {
        return true;
    }

    let different_timestamps =
        next.is_some_and(|n| !clock.is_same_display_timestamp(n.timestamp, current.timestamp));

    different_timestamps || is_end_of_cluster(current, next, is_group_thread, clock)
}

/// Where the footer is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterSlot {
    /// Below the body text, inside the bubble.
    Standalone,
    /// Under a sticker or borderless image, outside any chrome.
    StickerSlot,
    /// Inside the contact card.
    SharedContactSlot,
    /// Overlaid on the media thumbnail.
    MediaSlot,
}

/// The footer moves into the content view when there is no text line to
/// carry it.
///
/// Messages drawn without a bubble always use the sticker slot, matching
/// [`footer_style`]. `sticker_slot_available` is false for hosts whose
/// layout has no separate sticker footer; the standalone footer is used
/// then.
pub fn active_footer_slot(message: &Message, variant: ContentVariant, sticker_slot_available: bool) -> FooterSlot {
    if sticker_slot_available && message.has_no_bubble() {
        return FooterSlot::StickerSlot;
    }
    let body_empty = !message.has_body_text();
    match variant {
        ContentVariant::SharedContact if body_empty => FooterSlot::SharedContactSlot,
        ContentVariant::MediaThumbnail { .. } if body_empty && message.has_only_thumbnail() => FooterSlot::MediaSlot,
        _ => FooterSlot::Standalone,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterStyle {
    /// Regular footer inside a bubble.
    Plain,
    /// Small tinted pill so the footer stays legible over wallpaper.
    BubbleBackground,
    /// No background, secondary text and icon colors.
    Borderless,
}

pub fn footer_style(message: &Message, has_wallpaper: bool) -> FooterStyle {
    if !message.has_no_bubble() {
        FooterStyle::Plain
    } else if has_wallpaper && !message.is_outgoing() {
        FooterStyle::BubbleBackground
    } else {
        FooterStyle::Borderless
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FooterPlacement {
    pub visible: bool,
    pub slot: FooterSlot,
    pub style: FooterStyle,
    /// Deleted messages keep only the sending indicator.
    pub sending_status_only: bool,
}

pub fn place_footer(
    message: &Message,
    next: Option<&Message>,
    variant: ContentVariant,
    is_group_thread: bool,
    has_wallpaper: bool,
    sticker_slot_available: bool,
    clock: &FeedClock,
) -> FooterPlacement {
    FooterPlacement {
        visible: is_footer_visible(message, next, is_group_thread, clock),
        slot: active_footer_slot(message, variant, sticker_slot_available),
        style: footer_style(message, has_wallpaper),
        sending_status_only: message.remote_deleted,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginKind {
    Small,
    Big,
}

impl MarginKind {
    /// Small matches the bubble's own top padding.
    pub fn to_pixels(self, dims: &Dimensions) -> i32 {
        match self {
            MarginKind::Small => dims.bubble_top_padding,
            MarginKind::Big => dims.revealable_padding,
        }
    }
}

/// Padding around a view-once card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RevealableMargins {
    pub top: MarginKind,
    pub bottom: MarginKind,
}

impl RevealableMargins {
    pub fn to_pixels(&self, dims: &Dimensions) -> VerticalInsets {
        VerticalInsets {
            top: self.top.to_pixels(dims),
            bottom: self.bottom.to_pixels(dims),
        }
    }
}

/// The card sits tight under a sender header and tight above a footer.
pub fn revealable_margins(message: &Message, position: ClusterPosition, footer_visible: bool) -> RevealableMargins {
    let top = if message.is_outgoing() || !position.is_start() {
        MarginKind::Big
    } else {
        MarginKind::Small
    };
    let bottom = if footer_visible { MarginKind::Small } else { MarginKind::Big };
    RevealableMargins { top, bottom }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Direction, Slide, SlideKind};
    use crate::variant::select_variant;
    use chrono::{TimeZone, Utc};

    fn msg(id: u64, secs: i64, direction: Direction) -> Message {
        Message::text(id, Utc.timestamp_opt(1_714_557_600 + secs, 0).unwrap(), "alice", direction, "hi")
    }

    #[test]
    fn test_footer_hidden_inside_cluster_same_minute() {
        let clock = FeedClock::utc();
        let a = msg(1, 0, Direction::Incoming);
        let b = msg(2, 10, Direction::Incoming);
        assert!(!is_footer_visible(&a, Some(&b), false, &clock));
        assert!(is_footer_visible(&b, None, false, &clock));
    }

    #[test]
    fn test_footer_shown_when_next_timestamp_differs() {
        let clock = FeedClock::utc();
        let a = msg(1, 0, Direction::Incoming);
        let b = msg(2, 120, Direction::Incoming);
        assert!(is_footer_visible(&a, Some(&b), false, &clock));
    }

    #[test]
    fn test_footer_forced_by_state() {
        let clock = FeedClock::utc();
        let next = msg(2, 5, Direction::Outgoing);

        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::PendingApproval,
            DeliveryStatus::Failed,
            DeliveryStatus::RateLimited,
        ] {
            let mut m = msg(1, 0, Direction::Outgoing);
            m.status = status;
            assert!(is_footer_visible(&m, Some(&next), false, &clock), "{:?}", status);
        }

        let mut timer = msg(1, 0, Direction::Outgoing);
        timer.expires_in_ms = 30_000;
        assert!(is_footer_visible(&timer, Some(&next), false, &clock));

        let mut insecure = msg(1, 0, Direction::Outgoing);
        insecure.secure = false;
        assert!(is_footer_visible(&insecure, Some(&next), false, &clock));

        let audio = msg(1, 0, Direction::Outgoing).with_slides(vec![Slide::new(SlideKind::Audio)]);
        assert!(is_footer_visible(&audio, Some(&next), false, &clock));
    }

    #[test]
    fn test_active_slot() {
        let sticker = Message::text(1, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "")
            .with_slides(vec![Slide::new(SlideKind::Sticker)]);
        assert_eq!(active_footer_slot(&sticker, ContentVariant::Sticker, true), FooterSlot::StickerSlot);
        assert_eq!(active_footer_slot(&sticker, ContentVariant::Sticker, false), FooterSlot::Standalone);

        let mut contact = msg(2, 0, Direction::Incoming);
        contact.body.clear();
        contact.shared_contact = true;
        assert_eq!(
            active_footer_slot(&contact, ContentVariant::SharedContact, true),
            FooterSlot::SharedContactSlot
        );

        let media = Message::text(3, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "")
            .with_slides(vec![Slide::new(SlideKind::Image)]);
        let variant = ContentVariant::MediaThumbnail { slide_count: 1 };
        assert_eq!(active_footer_slot(&media, variant, true), FooterSlot::MediaSlot);

        let captioned = Message::text(4, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "look")
            .with_slides(vec![Slide::new(SlideKind::Image)]);
        assert_eq!(active_footer_slot(&captioned, variant, true), FooterSlot::Standalone);
    }

    #[test]
    fn test_slot_agrees_with_style_for_bubbleless_messages() {
        // A document outranks the sticker but the message still has no bubble
        let sticker_doc = Message::text(5, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "")
            .with_slides(vec![Slide::new(SlideKind::Sticker), Slide::new(SlideKind::Document)]);
        let variant = select_variant(&sticker_doc, true);
        assert_eq!(variant, ContentVariant::Document);
        assert_eq!(footer_style(&sticker_doc, false), FooterStyle::Borderless);
        assert_eq!(active_footer_slot(&sticker_doc, variant, true), FooterSlot::StickerSlot);
        assert_eq!(active_footer_slot(&sticker_doc, variant, false), FooterSlot::Standalone);

        // A captioned sticker keeps its bubble and the standalone footer
        let captioned = Message::text(6, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "hi")
            .with_slides(vec![Slide::new(SlideKind::Sticker)]);
        assert_eq!(footer_style(&captioned, false), FooterStyle::Plain);
        assert_eq!(
            active_footer_slot(&captioned, select_variant(&captioned, true), true),
            FooterSlot::Standalone
        );
    }

    #[test]
    fn test_footer_style() {
        let text = msg(1, 0, Direction::Incoming);
        assert_eq!(footer_style(&text, true), FooterStyle::Plain);

        let sticker = Message::text(2, Utc.timestamp_opt(0, 0).unwrap(), "a", Direction::Incoming, "")
            .with_slides(vec![Slide::new(SlideKind::Sticker)]);
        assert_eq!(footer_style(&sticker, true), FooterStyle::BubbleBackground);
        assert_eq!(footer_style(&sticker, false), FooterStyle::Borderless);

        let mut outgoing = sticker.clone();
        outgoing.direction = Direction::Outgoing;
        assert_eq!(footer_style(&outgoing, true), FooterStyle::Borderless);
    }

    #[test]
    fn test_revealable_margins() {
        let incoming = msg(1, 0, Direction::Incoming);
        assert_eq!(
            revealable_margins(&incoming, ClusterPosition::Start, true),
            RevealableMargins { top: MarginKind::Small, bottom: MarginKind::Small }
        );
        assert_eq!(
            revealable_margins(&incoming, ClusterPosition::Middle, false),
            RevealableMargins { top: MarginKind::Big, bottom: MarginKind::Big }
        );
        let outgoing = msg(2, 0, Direction::Outgoing);
        assert_eq!(revealable_margins(&outgoing, ClusterPosition::Singular, true).top, MarginKind::Big);

        let dims = Dimensions {
            bubble_top_padding: 6,
            revealable_padding: 12,
            ..Dimensions::default()
        };
        assert_eq!(
            revealable_margins(&incoming, ClusterPosition::Start, true).to_pixels(&dims),
            VerticalInsets { top: 6, bottom: 6 }
        );
        assert_eq!(
            revealable_margins(&outgoing, ClusterPosition::Singular, false).to_pixels(&dims),
            VerticalInsets { top: 12, bottom: 12 }
        );
    }
}
