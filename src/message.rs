use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent the message relative to the local user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    pub fn is_outgoing(self) -> bool {
        self == Direction::Outgoing
    }
}

/// Content messages cluster; update events (joins, timer changes, safety
/// number changes) never do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Content,
    Update,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Sent,
    Pending,
    Failed,
    RateLimited,
    PendingApproval,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Image,
    Video,
    Audio,
    Document,
    Sticker,
}

/// One attachment slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,
    /// Looping video without an audio track.
    #[serde(default)]
    pub video_gif: bool,
    /// Transparent image meant to be shown without bubble chrome.
    #[serde(default)]
    pub borderless: bool,
}

impl Slide {
    pub fn new(kind: SlideKind) -> Self {
        Self {
            kind,
            video_gif: false,
            borderless: false,
        }
    }

    fn is_thumbnail(&self) -> bool {
        matches!(self.kind, SlideKind::Image | SlideKind::Video)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub url: String,
    /// Preview has an image large enough to render above the text.
    #[serde(default)]
    pub big_image: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRef {
    pub id: u64,
    pub author: String,
}

/// A feed message as handed over by the data layer.
///
/// Read-only to the resolvers. Any change (new reaction, status update)
/// means the whole item is bound again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub sender: String,
    pub direction: Direction,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub body: String,
    /// Body was truncated and has a "read more" continuation.
    #[serde(default)]
    pub has_extra_text: bool,
    #[serde(default)]
    pub quote: Option<QuoteRef>,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub link_preview: Option<LinkPreview>,
    #[serde(default)]
    pub shared_contact: bool,
    #[serde(default)]
    pub view_once: bool,
    #[serde(default)]
    pub remote_deleted: bool,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default)]
    pub expires_in_ms: u64,
    #[serde(default)]
    pub reaction_count: u32,
}

fn default_secure() -> bool {
    true
}

impl Message {
    /// Plain text message with everything else at its default.
    pub fn text(id: u64, timestamp: DateTime<Utc>, sender: &str, direction: Direction, body: &str) -> Self {
        Self {
            id,
            timestamp,
            sender: sender.to_string(),
            direction,
            kind: MessageKind::Content,
            body: body.to_string(),
            has_extra_text: false,
            quote: None,
            slides: Vec::new(),
            link_preview: None,
            shared_contact: false,
            view_once: false,
            remote_deleted: false,
            status: DeliveryStatus::Sent,
            secure: true,
            expires_in_ms: 0,
            reaction_count: 0,
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_slides(mut self, slides: Vec<Slide>) -> Self {
        self.slides = slides;
        self
    }

    pub fn is_update(&self) -> bool {
        self.kind == MessageKind::Update
    }

    pub fn is_outgoing(&self) -> bool {
        self.direction.is_outgoing()
    }

    pub fn is_failed(&self) -> bool {
        self.status == DeliveryStatus::Failed
    }

    pub fn has_reactions(&self) -> bool {
        self.reaction_count > 0
    }

    pub fn has_body_text(&self) -> bool {
        !self.body.trim().is_empty()
    }

    pub fn has_quote(&self) -> bool {
        self.quote.is_some()
    }

    pub fn has_link_preview(&self) -> bool {
        self.link_preview.is_some()
    }

    pub fn has_big_image_link_preview(&self) -> bool {
        self.link_preview.as_ref().is_some_and(|p| p.big_image)
    }

    pub fn has_audio(&self) -> bool {
        self.slides.iter().any(|s| s.kind == SlideKind::Audio)
    }

    pub fn has_document(&self) -> bool {
        self.slides.iter().any(|s| s.kind == SlideKind::Document)
    }

    pub fn has_sticker(&self) -> bool {
        self.slides.iter().any(|s| s.kind == SlideKind::Sticker)
    }

    pub fn has_thumbnail(&self) -> bool {
        self.slides.iter().any(Slide::is_thumbnail)
    }

    pub fn thumbnail_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| s.is_thumbnail())
    }

    /// Attachments with no caption and no overflow text.
    pub fn is_captionless(&self) -> bool {
        !self.slides.is_empty() && !self.has_body_text() && !self.has_extra_text
    }

    /// A captionless single image flagged as borderless.
    pub fn is_borderless(&self) -> bool {
        self.is_captionless()
            && self.thumbnail_slides().count() == 1
            && self.thumbnail_slides().all(|s| s.borderless)
    }

    /// Rendered without any bubble background (stickers and borderless images).
    pub fn has_no_bubble(&self) -> bool {
        (self.has_sticker() && self.is_captionless()) || self.is_borderless()
    }

    /// Thumbnails are the only attachment type present.
    pub fn has_only_thumbnail(&self) -> bool {
        self.has_thumbnail()
            && !self.has_audio()
            && !self.has_document()
            && !self.shared_contact
            && !self.has_sticker()
            && !self.is_borderless()
            && !self.view_once
    }
}
