//! Multiselect hit testing: which selectable part of a message a touch
//! lands on, and the vertical bounds of each part.

use serde::Serialize;

use crate::error::{BubbleError, Result};
use crate::message::Message;
use crate::variant::ContentVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiselectPart {
    Text,
    Attachments,
}

/// Selectable parts of one message, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MultiselectParts {
    Single { part: MultiselectPart },
    Double { top: MultiselectPart, bottom: MultiselectPart },
}

impl MultiselectParts {
    /// An attachment view above body text forms two parts, anything else
    /// is one. Only views the selected variant actually shows count.
    pub fn for_content(message: &Message, variant: ContentVariant) -> Self {
        let has_attachment = attachment_view(variant).is_some();
        let has_text = message.has_body_text() && !message.remote_deleted;
        match (has_attachment, has_text) {
            (true, true) => MultiselectParts::Double {
                top: MultiselectPart::Attachments,
                bottom: MultiselectPart::Text,
            },
            (true, false) => MultiselectParts::Single {
                part: MultiselectPart::Attachments,
            },
            _ => MultiselectParts::Single {
                part: MultiselectPart::Text,
            },
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, MultiselectParts::Single { .. })
    }
}

/// Vertical extent of a projected view, in root coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub top: i32,
    pub height: i32,
}

impl Span {
    pub fn new(top: i32, height: i32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Projected regions of the laid-out item at touch time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Projections {
    pub media: Option<Span>,
    pub document: Option<Span>,
    pub audio: Option<Span>,
    pub bubble: Option<Span>,
    /// The whole item row.
    pub item: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttachmentView {
    Media,
    Document,
    Audio,
}

/// The attachment sub-view shown for `variant`, if any.
fn attachment_view(variant: ContentVariant) -> Option<AttachmentView> {
    match variant {
        ContentVariant::MediaThumbnail { .. } | ContentVariant::LinkPreview { big_image: true } => {
            Some(AttachmentView::Media)
        }
        ContentVariant::Document => Some(AttachmentView::Document),
        ContentVariant::Audio => Some(AttachmentView::Audio),
        _ => None,
    }
}

/// Projection of the attachment sub-view. The outer `None` means the
/// variant shows no attachment, the inner one that the host did not
/// project it.
fn attachment_span(variant: ContentVariant, projections: &Projections) -> Option<Option<Span>> {
    attachment_view(variant).map(|view| match view {
        AttachmentView::Media => projections.media,
        AttachmentView::Document => projections.document,
        AttachmentView::Audio => projections.audio,
    })
}

fn no_region(message: &Message) -> BubbleError {
    BubbleError::NoSelectableRegion { message_id: message.id }
}

/// Map a touch (`touch_y` in root coordinates) to the part it selects.
///
/// A touch strictly below the attachment's lower edge selects the bottom
/// part. A touch on the edge itself stays with the attachment.
pub fn part_for_touch(
    message: &Message,
    variant: ContentVariant,
    projections: &Projections,
    touch_y: f32,
) -> Result<MultiselectPart> {
    let (top, bottom) = match MultiselectParts::for_content(message, variant) {
        MultiselectParts::Single { part } => return Ok(part),
        MultiselectParts::Double { top, bottom } => (top, bottom),
    };

    let span = attachment_span(variant, projections)
        .flatten()
        .ok_or_else(|| no_region(message))?;

    if touch_y > span.bottom() as f32 {
        Ok(bottom)
    } else {
        Ok(top)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Pixel offset of the `edge` of `part`.
///
/// The attachment part is bounded by its sub-view. Text starts below the
/// attachment and ends with the bubble. Messages without a bubble use the
/// item row.
pub fn boundary_for(
    message: &Message,
    variant: ContentVariant,
    projections: &Projections,
    edge: Edge,
    part: MultiselectPart,
) -> Result<i32> {
    if let Some(span) = attachment_span(variant, projections) {
        let span = span.ok_or_else(|| no_region(message))?;
        match (edge, part) {
            (Edge::Top, MultiselectPart::Attachments) => return Ok(span.top),
            (Edge::Top, MultiselectPart::Text) => return Ok(span.bottom()),
            (Edge::Bottom, MultiselectPart::Attachments) => return Ok(span.bottom()),
            (Edge::Bottom, MultiselectPart::Text) => {}
        }
    }

    let outer = if message.has_no_bubble() {
        projections.item
    } else {
        projections.bubble.ok_or_else(|| no_region(message))?
    };

    Ok(match edge {
        Edge::Top => outer.top,
        Edge::Bottom => outer.bottom(),
    })
}

/// Quotes and link previews are drawn in the bubble but cannot be selected.
pub fn has_non_selectable_media(message: &Message) -> bool {
    message.has_quote() || message.has_link_preview()
}
