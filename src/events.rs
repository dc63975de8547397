//! Structured events emitted by a bound item (taps, voice note callbacks).
//!
//! The item owns no navigation or persistence. It reports what happened to
//! an optional [`EventSink`]; with no sink registered every action is a
//! no-op.

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::message::{DeliveryStatus, Message};
use crate::variant::ContentVariant;

/// Why a tap was routed away from the content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptReason {
    /// Offer to resend.
    Failed,
    /// Needs a challenge to be solved before sending resumes.
    RateLimited,
    PendingApproval,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ItemEvent {
    AttachmentTapped { message_id: u64, slide_index: usize },
    QuoteTapped { message_id: u64, quote_id: u64 },
    LinkPreviewTapped { message_id: u64, url: String },
    SharedContactTapped { message_id: u64 },
    ReactionsTapped { message_id: u64 },
    ViewOnceTapped { message_id: u64 },
    InterceptedTap { message_id: u64, reason: InterceptReason },
    RegisterVoiceNoteCallbacks { message_id: u64 },
    UnregisterVoiceNoteCallbacks { message_id: u64 },
}

/// Receiver for item events. Implemented by the host.
pub trait EventSink {
    fn on_event(&self, event: ItemEvent);
}

/// Forwards events over a channel to whoever owns navigation.
#[derive(Clone, Debug)]
pub struct ChannelEventSink {
    tx: Sender<ItemEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: Sender<ItemEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn on_event(&self, event: ItemEvent) {
        // Receiver gone means the feed is being torn down
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

/// Sub-view the user tapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tap {
    Attachment { slide_index: usize },
    Quote,
    LinkPreview,
    SharedContact,
    Reactions,
    ViewOnce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Dispatched,
    /// Delivered as [`ItemEvent::InterceptedTap`] instead of the content event.
    Intercepted,
    /// A multiselect batch is active; the tap toggles selection in the host.
    Passthrough,
    /// No sink, or the message has nothing under the tap.
    Ignored,
}

fn intercept_reason(message: &Message, rate_limit_challenge_pending: bool) -> Option<InterceptReason> {
    match message.status {
        DeliveryStatus::Failed => Some(InterceptReason::Failed),
        DeliveryStatus::RateLimited if rate_limit_challenge_pending => Some(InterceptReason::RateLimited),
        DeliveryStatus::PendingApproval => Some(InterceptReason::PendingApproval),
        _ => None,
    }
}

/// Taps on the content go to the resend/approval flow instead.
pub fn intercepts_clicks(message: &Message, batch_selection_active: bool, rate_limit_challenge_pending: bool) -> bool {
    !batch_selection_active && intercept_reason(message, rate_limit_challenge_pending).is_some()
}

fn content_event(message: &Message, tap: Tap) -> Option<ItemEvent> {
    let message_id = message.id;
    match tap {
        Tap::Attachment { slide_index } if slide_index < message.slides.len() => {
            Some(ItemEvent::AttachmentTapped { message_id, slide_index })
        }
        Tap::Attachment { .. } => None,
        Tap::Quote => message.quote.as_ref().map(|q| ItemEvent::QuoteTapped {
            message_id,
            quote_id: q.id,
        }),
        Tap::LinkPreview => message.link_preview.as_ref().map(|p| ItemEvent::LinkPreviewTapped {
            message_id,
            url: p.url.clone(),
        }),
        Tap::SharedContact => message
            .shared_contact
            .then_some(ItemEvent::SharedContactTapped { message_id }),
        Tap::Reactions => message.has_reactions().then_some(ItemEvent::ReactionsTapped { message_id }),
        Tap::ViewOnce => message.view_once.then_some(ItemEvent::ViewOnceTapped { message_id }),
    }
}

/// Route a tap on `message` to the sink.
pub fn dispatch_tap(
    message: &Message,
    tap: Tap,
    batch_selection_active: bool,
    rate_limit_challenge_pending: bool,
    sink: Option<&dyn EventSink>,
) -> TapOutcome {
    if batch_selection_active {
        return TapOutcome::Passthrough;
    }
    let Some(sink) = sink else {
        return TapOutcome::Ignored;
    };

    if let Some(reason) = intercept_reason(message, rate_limit_challenge_pending) {
        tracing::debug!(message_id = message.id, ?reason, "tap intercepted");
        sink.on_event(ItemEvent::InterceptedTap {
            message_id: message.id,
            reason,
        });
        return TapOutcome::Intercepted;
    }

    match content_event(message, tap) {
        Some(event) => {
            tracing::trace!(message_id = message.id, ?event, "dispatching");
            sink.on_event(event);
            TapOutcome::Dispatched
        }
        None => TapOutcome::Ignored,
    }
}

/// Items showing the audio view hook into the shared voice note player
/// while bound.
pub fn voice_note_callbacks(
    message: &Message,
    variant: ContentVariant,
    register: bool,
    sink: Option<&dyn EventSink>,
) {
    if variant != ContentVariant::Audio {
        return;
    }
    if let Some(sink) = sink {
        let message_id = message.id;
        sink.on_event(if register {
            ItemEvent::RegisterVoiceNoteCallbacks { message_id }
        } else {
            ItemEvent::UnregisterVoiceNoteCallbacks { message_id }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Direction, LinkPreview, QuoteRef, Slide, SlideKind};
    use crate::variant::select_variant;
    use chrono::{TimeZone, Utc};
    use crossbeam_channel::unbounded;

    fn msg() -> Message {
        Message::text(5, Utc.timestamp_opt(1_714_557_600, 0).unwrap(), "alice", Direction::Incoming, "hi")
    }

    #[test]
    fn test_channel_sink_delivers_quote_tap() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);
        let mut m = msg();
        m.quote = Some(QuoteRef { id: 2, author: "bob".to_string() });

        let outcome = dispatch_tap(&m, Tap::Quote, false, false, Some(&sink));
        assert_eq!(outcome, TapOutcome::Dispatched);
        assert_eq!(rx.try_recv().unwrap(), ItemEvent::QuoteTapped { message_id: 5, quote_id: 2 });
    }

    #[test]
    fn test_missing_sink_is_noop() {
        let m = msg().with_slides(vec![Slide::new(SlideKind::Image)]);
        assert_eq!(
            dispatch_tap(&m, Tap::Attachment { slide_index: 0 }, false, false, None),
            TapOutcome::Ignored
        );
    }

    #[test]
    fn test_batch_selection_suppresses_events() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);
        let mut m = msg();
        m.link_preview = Some(LinkPreview { url: "https://example.org".to_string(), big_image: false });

        assert_eq!(dispatch_tap(&m, Tap::LinkPreview, true, false, Some(&sink)), TapOutcome::Passthrough);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_message_intercepts() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);
        let mut m = msg().with_slides(vec![Slide::new(SlideKind::Image)]);
        m.status = DeliveryStatus::Failed;

        assert!(intercepts_clicks(&m, false, false));
        assert!(!intercepts_clicks(&m, true, false));
        assert_eq!(
            dispatch_tap(&m, Tap::Attachment { slide_index: 0 }, false, false, Some(&sink)),
            TapOutcome::Intercepted
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ItemEvent::InterceptedTap { message_id: 5, reason: InterceptReason::Failed }
        );
    }

    #[test]
    fn test_rate_limited_only_intercepts_with_challenge() {
        let mut m = msg();
        m.status = DeliveryStatus::RateLimited;
        assert!(!intercepts_clicks(&m, false, false));
        assert!(intercepts_clicks(&m, false, true));

        m.status = DeliveryStatus::PendingApproval;
        assert!(intercepts_clicks(&m, false, false));
    }

    #[test]
    fn test_tap_without_target_is_ignored() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);
        let m = msg();
        assert_eq!(dispatch_tap(&m, Tap::Quote, false, false, Some(&sink)), TapOutcome::Ignored);
        assert_eq!(
            dispatch_tap(&m, Tap::Attachment { slide_index: 3 }, false, false, Some(&sink)),
            TapOutcome::Ignored
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_voice_note_callbacks_only_for_audio() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);

        let text = msg();
        voice_note_callbacks(&text, select_variant(&text, true), true, Some(&sink));
        assert!(rx.try_recv().is_err());

        let audio = msg().with_slides(vec![Slide::new(SlideKind::Audio)]);
        let variant = select_variant(&audio, true);
        voice_note_callbacks(&audio, variant, true, Some(&sink));
        voice_note_callbacks(&audio, variant, false, Some(&sink));
        assert_eq!(rx.try_recv().unwrap(), ItemEvent::RegisterVoiceNoteCallbacks { message_id: 5 });
        assert_eq!(rx.try_recv().unwrap(), ItemEvent::UnregisterVoiceNoteCallbacks { message_id: 5 });
    }

    #[test]
    fn test_hidden_audio_registers_no_callbacks() {
        let (tx, rx) = unbounded();
        let sink = ChannelEventSink::new(tx);

        let mut deleted = msg().with_slides(vec![Slide::new(SlideKind::Audio)]);
        deleted.remote_deleted = true;
        assert_eq!(select_variant(&deleted, true), ContentVariant::PlainText);
        voice_note_callbacks(&deleted, select_variant(&deleted, true), true, Some(&sink));

        let mut view_once = msg().with_slides(vec![Slide::new(SlideKind::Audio)]);
        view_once.view_once = true;
        voice_note_callbacks(&view_once, select_variant(&view_once, true), true, Some(&sink));

        let mut preview = msg().with_slides(vec![Slide::new(SlideKind::Audio)]);
        preview.link_preview = Some(LinkPreview { url: "https://example.org".to_string(), big_image: false });
        assert_eq!(select_variant(&preview, true), ContentVariant::LinkPreview { big_image: false });
        voice_note_callbacks(&preview, select_variant(&preview, true), true, Some(&sink));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (tx, rx) = unbounded();
        drop(rx);
        let sink = ChannelEventSink::new(tx);
        let mut m = msg();
        m.reaction_count = 1;
        assert_eq!(dispatch_tap(&m, Tap::Reactions, false, false, Some(&sink)), TapOutcome::Dispatched);
    }
}
