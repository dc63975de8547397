//! Content presentation selection.
//!
//! A message can satisfy several attachment predicates at once; the
//! selection below is a strict priority chain and exactly one variant wins.

use serde::Serialize;

use crate::config::Dimensions;
use crate::message::{Message, SlideKind};
use crate::shape::{
    resolve_link_preview_corners, resolve_shared_contact_style, BubbleShape, CornerRadiusSet, PreviewCorners,
    ShapeInputs, SharedContactStyle,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ContentVariant {
    Revealable,
    SharedContact,
    LinkPreview { big_image: bool },
    Audio,
    Document,
    Sticker,
    MediaThumbnail { slide_count: usize },
    PlainText,
}

/// Pick the one content variant for `message`.
///
/// Remote deletion overrides everything: the message is shown as a
/// placeholder line of text.
pub fn select_variant(message: &Message, message_request_accepted: bool) -> ContentVariant {
    if message.remote_deleted {
        return ContentVariant::PlainText;
    }

    if message.view_once {
        ContentVariant::Revealable
    } else if message.shared_contact {
        ContentVariant::SharedContact
    } else if message.has_link_preview() && message_request_accepted {
        // Unaccepted requests never fetch or render previews
        ContentVariant::LinkPreview {
            big_image: message.has_big_image_link_preview(),
        }
    } else if message.has_audio() {
        ContentVariant::Audio
    } else if message.has_document() {
        ContentVariant::Document
    } else if (message.has_sticker() && message.is_captionless()) || message.is_borderless() {
        ContentVariant::Sticker
    } else if message.has_thumbnail() {
        ContentVariant::MediaThumbnail {
            slide_count: message.thumbnail_slides().count(),
        }
    } else {
        ContentVariant::PlainText
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletedBy {
    You,
    Sender,
}

/// How the body text line is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BodyPresentation {
    /// Italic "this message was deleted" line.
    DeletedPlaceholder { by: DeletedBy },
    Hidden,
    Text { linkify: bool, read_more: bool },
}

pub fn body_presentation(message: &Message, message_request_accepted: bool) -> BodyPresentation {
    if message.remote_deleted {
        let by = if message.is_outgoing() { DeletedBy::You } else { DeletedBy::Sender };
        BodyPresentation::DeletedPlaceholder { by }
    } else if message.is_captionless() {
        BodyPresentation::Hidden
    } else {
        BodyPresentation::Text {
            linkify: message_request_accepted,
            read_more: message.has_extra_text,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailMinWidth {
    Solo,
    WithContent,
}

impl ThumbnailMinWidth {
    pub fn to_pixels(self, dims: &Dimensions) -> i32 {
        match self {
            ThumbnailMinWidth::Solo => dims.media_min_width_solo,
            ThumbnailMinWidth::WithContent => dims.media_min_width_with_content,
        }
    }
}

/// Inputs to content selection that come from the feed, not the message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentInputs {
    pub message_request_accepted: bool,
    /// The host allows this particular item to play inline.
    pub allow_inline_play: bool,
    /// Global autoplay policy for looping silent videos.
    pub autoplay_policy: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ContentPresentation {
    pub variant: ContentVariant,
    pub body: BodyPresentation,
    /// Download and playback affordances. Off for failed messages.
    pub show_controls: bool,
    /// The single slide is a looping silent video allowed to play in place.
    pub inline_playback: bool,
    pub thumbnail_min_width: Option<ThumbnailMinWidth>,
    pub show_thumbnail_shade: bool,
}

pub fn present_content(message: &Message, inputs: &ContentInputs) -> ContentPresentation {
    let variant = select_variant(message, inputs.message_request_accepted);

    let mut inline_playback = false;
    let mut thumbnail_min_width = None;
    let mut show_thumbnail_shade = false;

    match variant {
        ContentVariant::MediaThumbnail { slide_count } => {
            thumbnail_min_width = Some(if message.is_captionless() {
                ThumbnailMinWidth::Solo
            } else {
                ThumbnailMinWidth::WithContent
            });
            show_thumbnail_shade = !message.has_body_text() && !message.has_extra_text;

            let looping = slide_count == 1
                && message
                    .thumbnail_slides()
                    .all(|s| s.kind == SlideKind::Video && s.video_gif);
            inline_playback = looping && (inputs.autoplay_policy || inputs.allow_inline_play);
        }
        ContentVariant::LinkPreview { big_image: true } => {
            thumbnail_min_width = Some(ThumbnailMinWidth::WithContent);
        }
        _ => {}
    }

    ContentPresentation {
        variant,
        body: body_presentation(message, inputs.message_request_accepted),
        show_controls: !message.is_failed(),
        inline_playback,
        thumbnail_min_width,
        show_thumbnail_shade,
    }
}

/// Corner overrides owned by the selected content view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ContentCorners {
    None,
    Media { corners: CornerRadiusSet },
    LinkPreview { media: Option<CornerRadiusSet>, card: PreviewCorners },
    SharedContact { style: Option<SharedContactStyle> },
}

pub fn content_corners(variant: ContentVariant, shape: &BubbleShape, inputs: &ShapeInputs) -> ContentCorners {
    match variant {
        ContentVariant::MediaThumbnail { .. } => ContentCorners::Media { corners: shape.media },
        ContentVariant::LinkPreview { big_image } => ContentCorners::LinkPreview {
            media: big_image.then_some(shape.media),
            card: resolve_link_preview_corners(inputs, big_image),
        },
        ContentVariant::SharedContact => ContentCorners::SharedContact {
            style: resolve_shared_contact_style(inputs),
        },
        ContentVariant::Revealable
        | ContentVariant::Audio
        | ContentVariant::Document
        | ContentVariant::Sticker
        | ContentVariant::PlainText => ContentCorners::None,
    }
}
