//! The bind pipeline: one message plus its neighbours in, a fully resolved
//! item description out.
//!
//! [`resolve`] is pure. [`ConversationItem`] wraps it with the per-slot
//! state a recycled feed view needs (bound message, convergence counters,
//! event sink) and guarantees nothing survives a rebind.

use serde::Serialize;

use crate::cluster::{author_decoration, classify, message_spacing, AuthorDecoration, ClusterPosition, MessageSpacing};
use crate::config::{Dimensions, LayoutSettings, VerticalInsets};
use crate::error::{BubbleError, Result};
use crate::events::{dispatch_tap, intercepts_clicks, voice_note_callbacks, EventSink, Tap, TapOutcome};
use crate::feed::{FeedWindow, NeighborContext};
use crate::footer::{place_footer, revealable_margins, FooterPlacement, RevealableMargins};
use crate::layout::{
    Convergence, LayoutConstraints, LayoutContext, MeasuredSizes, MeasurementProvider, PassOutcome, SettledLayout,
};
use crate::message::Message;
use crate::multiselect::{self, has_non_selectable_media, Edge, MultiselectPart, MultiselectParts, Projections};
use crate::shape::{
    colorizer_mask, draws_body_outline, resolve_corners, resolve_quote_corners, BubbleShape, CornerRadiusSet,
    PhysicalCorners, QuoteCorners, ShapeInputs,
};
use crate::variant::{content_corners, present_content, ContentCorners, ContentInputs, ContentPresentation, ContentVariant};

/// Optional sub-views of the host layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostSlots {
    pub quote_view: bool,
    /// Separate footer under stickers and borderless images.
    pub sticker_footer: bool,
}

impl Default for HostSlots {
    fn default() -> Self {
        Self {
            quote_view: true,
            sticker_footer: true,
        }
    }
}

/// Everything one bind depends on.
#[derive(Clone, Copy, Debug)]
pub struct BindRequest<'a> {
    pub message: &'a Message,
    pub context: NeighborContext<'a>,
    pub message_request_accepted: bool,
    pub allow_inline_play: bool,
    pub has_wallpaper: bool,
    pub batch_selection_active: bool,
    pub rate_limit_challenge_pending: bool,
    pub slots: HostSlots,
}

impl<'a> BindRequest<'a> {
    /// Request for an accepted thread with no wallpaper and no selection.
    pub fn new(message: &'a Message, context: NeighborContext<'a>) -> Self {
        Self {
            message,
            context,
            message_request_accepted: true,
            allow_inline_play: false,
            has_wallpaper: false,
            batch_selection_active: false,
            rate_limit_challenge_pending: false,
            slots: HostSlots::default(),
        }
    }

    pub fn from_window(window: FeedWindow<'a>) -> Self {
        Self::new(window.current, window.context)
    }
}

/// Resolved presentation of one message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    pub message_id: u64,
    pub position: ClusterPosition,
    pub spacing: MessageSpacing,
    pub spacing_px: VerticalInsets,
    pub author: AuthorDecoration,
    pub shape: BubbleShape,
    /// Bubble corners in pixels, mirrored for right-to-left layout.
    pub bubble_corners_px: PhysicalCorners<i32>,
    pub content: ContentPresentation,
    pub thumbnail_min_width_px: Option<i32>,
    /// Body text size in scaled pixels.
    pub body_text_size: u32,
    pub content_corners: ContentCorners,
    pub quote_corners: Option<QuoteCorners>,
    pub footer: FooterPlacement,
    pub revealable_margins: Option<RevealableMargins>,
    pub revealable_margins_px: Option<VerticalInsets>,
    pub draws_outline: bool,
    pub colorizer_mask: Option<CornerRadiusSet>,
    pub intercepts_clicks: bool,
    pub multiselect: MultiselectParts,
    pub has_non_selectable_media: bool,
    pub layout: LayoutContext,
}

/// Run every resolver for one message.
pub fn resolve(request: &BindRequest<'_>, settings: &LayoutSettings) -> Result<ResolvedItem> {
    let clock = settings.clock()?;
    let message = request.message;
    let ctx = &request.context;

    let position = classify(message, ctx, &clock);
    let inputs = ShapeInputs::for_message(message, position, ctx.is_group_thread);
    let shape = resolve_corners(&inputs);
    let quote_corners = resolve_quote_corners(message, &inputs, request.slots.quote_view)?;

    let content = present_content(
        message,
        &ContentInputs {
            message_request_accepted: request.message_request_accepted,
            allow_inline_play: request.allow_inline_play,
            autoplay_policy: settings.autoplay_gifs,
        },
    );

    let footer = place_footer(
        message,
        ctx.next,
        content.variant,
        ctx.is_group_thread,
        request.has_wallpaper,
        request.slots.sticker_footer,
        &clock,
    );
    let revealable_margins =
        (content.variant == ContentVariant::Revealable).then(|| revealable_margins(message, position, footer.visible));

    let dims = &settings.dimensions;
    let spacing = message_spacing(position);

    Ok(ResolvedItem {
        message_id: message.id,
        position,
        spacing,
        spacing_px: spacing.to_pixels(dims),
        author: author_decoration(message, ctx, &clock),
        bubble_corners_px: shape.bubble.to_pixels(dims, settings.direction),
        thumbnail_min_width_px: content.thumbnail_min_width.map(|w| w.to_pixels(dims)),
        body_text_size: settings.message_font_size,
        content_corners: content_corners(content.variant, &shape, &inputs),
        quote_corners,
        revealable_margins_px: revealable_margins.map(|m| m.to_pixels(dims)),
        revealable_margins,
        draws_outline: draws_body_outline(message, request.has_wallpaper),
        colorizer_mask: colorizer_mask(message, &shape),
        intercepts_clicks: intercepts_clicks(
            message,
            request.batch_selection_active,
            request.rate_limit_challenge_pending,
        ),
        multiselect: MultiselectParts::for_content(message, content.variant),
        has_non_selectable_media: has_non_selectable_media(message),
        layout: LayoutContext::new(message, content.variant, ctx.is_group_thread, footer.visible, footer.slot),
        shape,
        content,
        footer,
    })
}

struct Bound {
    message: Message,
    resolved: ResolvedItem,
    convergence: Convergence,
    dimensions: Dimensions,
    batch_selection_active: bool,
    rate_limit_challenge_pending: bool,
}

/// A recyclable feed slot.
#[derive(Default)]
pub struct ConversationItem {
    bound: Option<Bound>,
    sink: Option<Box<dyn EventSink>>,
}

impl ConversationItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Box<dyn EventSink>) -> Self {
        Self {
            bound: None,
            sink: Some(sink),
        }
    }

    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink>>) {
        self.sink = sink;
    }

    /// Bind a message, dropping whatever was bound before.
    pub fn bind(&mut self, request: &BindRequest<'_>, settings: &LayoutSettings) -> Result<&ResolvedItem> {
        self.unbind();

        let resolved = resolve(request, settings)?;
        tracing::debug!(
            message_id = resolved.message_id,
            position = ?resolved.position,
            variant = ?resolved.content.variant,
            "bound item"
        );
        voice_note_callbacks(request.message, resolved.content.variant, true, self.sink.as_deref());

        let bound = self.bound.insert(Bound {
            message: request.message.clone(),
            resolved,
            convergence: Convergence::new(&settings.dimensions),
            dimensions: settings.dimensions.clone(),
            batch_selection_active: request.batch_selection_active,
            rate_limit_challenge_pending: request.rate_limit_challenge_pending,
        });
        Ok(&bound.resolved)
    }

    /// Release all transient state. Any convergence in progress is abandoned.
    pub fn unbind(&mut self) {
        if let Some(bound) = self.bound.take() {
            voice_note_callbacks(
                &bound.message,
                bound.resolved.content.variant,
                false,
                self.sink.as_deref(),
            );
            tracing::trace!(message_id = bound.message.id, "unbound item");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn resolved(&self) -> Option<&ResolvedItem> {
        self.bound.as_ref().map(|b| &b.resolved)
    }

    pub fn constraints(&self) -> Option<&LayoutConstraints> {
        self.bound.as_ref().map(|b| b.convergence.constraints())
    }

    pub fn measure_pass_count(&self) -> u32 {
        self.bound.as_ref().map_or(0, |b| b.convergence.measure_pass_count())
    }

    /// Report one measurement from the host.
    pub fn on_measured(&mut self, measured: &MeasuredSizes) -> Result<PassOutcome> {
        let bound = self.bound.as_mut().ok_or(BubbleError::NotBound)?;
        Ok(bound
            .convergence
            .on_measured(measured, &bound.resolved.layout, &bound.dimensions))
    }

    /// Measure and reconcile until the layout settles or the cap is hit.
    pub fn settle(&mut self, provider: &mut dyn MeasurementProvider) -> Result<SettledLayout> {
        let bound = self.bound.as_mut().ok_or(BubbleError::NotBound)?;
        Ok(bound
            .convergence
            .settle(provider, &bound.resolved.layout, &bound.dimensions))
    }

    pub fn part_for_touch(&self, projections: &Projections, touch_y: f32) -> Result<MultiselectPart> {
        let bound = self.bound.as_ref().ok_or(BubbleError::NotBound)?;
        multiselect::part_for_touch(&bound.message, bound.resolved.content.variant, projections, touch_y)
    }

    pub fn boundary_for(&self, projections: &Projections, edge: Edge, part: MultiselectPart) -> Result<i32> {
        let bound = self.bound.as_ref().ok_or(BubbleError::NotBound)?;
        multiselect::boundary_for(&bound.message, bound.resolved.content.variant, projections, edge, part)
    }

    pub fn tap(&self, tap: Tap) -> TapOutcome {
        match &self.bound {
            Some(bound) => dispatch_tap(
                &bound.message,
                tap,
                bound.batch_selection_active,
                bound.rate_limit_challenge_pending,
                self.sink.as_deref(),
            ),
            None => TapOutcome::Ignored,
        }
    }
}

impl Drop for ConversationItem {
    fn drop(&mut self) {
        self.unbind();
    }
}
