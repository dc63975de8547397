//! Layout convergence between body text, footer, quote and media widths.
//!
//! The host measures the item, hands the sizes to [`Convergence::on_measured`]
//! and re-measures with the returned constraints until the pass settles.
//! The widths depend on each other, so this is a fixed-point iteration that
//! is cut off after [`MAX_MEASURE_PASSES`] reconciliations.

use serde::Serialize;

use crate::config::Dimensions;
use crate::footer::FooterSlot;
use crate::message::Message;
use crate::variant::ContentVariant;

/// Upper bound on reconciliations in one bind-to-settle cycle.
pub const MAX_MEASURE_PASSES: u32 = 3;

/// Measured width of a sub-view and the horizontal margins around it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub width: i32,
    pub horizontal_margins: i32,
}

impl Region {
    pub fn new(width: i32, horizontal_margins: i32) -> Self {
        Self {
            width,
            horizontal_margins,
        }
    }

    fn outer_width(&self) -> i32 {
        self.width + self.horizontal_margins
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextMetrics {
    pub region: Region,
    pub last_line_width: i32,
    pub single_line: bool,
    /// Emoji-only body rendered at a large size.
    pub jumbomoji: bool,
}

/// Output of one measurement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasuredSizes {
    /// Full width of the item row.
    pub row_width: i32,
    pub bubble_width: i32,
    pub body: TextMetrics,
    pub footer: Region,
    pub date_height: i32,
    pub quote: Option<Region>,
    pub shared_contact: Option<Region>,
    pub audio: Option<Region>,
    pub media: Option<Region>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FooterMargins {
    pub top: i32,
    pub bottom: i32,
}

/// Layout parameters written back to the host before the next measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutConstraints {
    /// `None` wraps content.
    pub bubble_width: Option<i32>,
    pub quote_width: Option<i32>,
    pub shared_contact_width: Option<i32>,
    pub footer_width: Option<i32>,
    pub footer_margins: FooterMargins,
    /// The footer was pulled up beside the last text line in this cycle.
    pub footer_collapsed: bool,
}

impl LayoutConstraints {
    pub fn initial(dims: &Dimensions) -> Self {
        Self {
            bubble_width: None,
            quote_width: None,
            shared_contact_width: None,
            footer_width: None,
            footer_margins: default_footer_margins(dims),
            footer_collapsed: false,
        }
    }
}

fn default_footer_margins(dims: &Dimensions) -> FooterMargins {
    FooterMargins {
        top: dims.footer_default_top_margin,
        bottom: dims.bubble_bottom_padding,
    }
}

/// Per-bind facts the reconciliation reads. Fixed for the whole cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutContext {
    pub message_id: u64,
    pub has_quote: bool,
    pub has_audio: bool,
    pub has_shared_contact: bool,
    /// Width follows the media view (thumbnails and big-image previews).
    pub media_sized: bool,
    pub footer_visible: bool,
    pub footer_slot: FooterSlot,
    /// Reserve the avatar column when computing the max bubble width.
    pub reserves_avatar: bool,
}

impl LayoutContext {
    pub fn new(
        message: &Message,
        variant: ContentVariant,
        is_group_thread: bool,
        footer_visible: bool,
        footer_slot: FooterSlot,
    ) -> Self {
        let media_sized = matches!(
            variant,
            ContentVariant::MediaThumbnail { .. } | ContentVariant::LinkPreview { big_image: true }
        );
        Self {
            message_id: message.id,
            has_quote: message.has_quote(),
            has_audio: variant == ContentVariant::Audio,
            has_shared_contact: variant == ContentVariant::SharedContact,
            media_sized,
            footer_visible,
            footer_slot,
            reserves_avatar: is_group_thread && !message.is_outgoing() && !message.remote_deleted,
        }
    }
}

/// Width inside the bubble that a child with `margins` may take.
fn available_bubble_width(measured: &MeasuredSizes, ctx: &LayoutContext, dims: &Dimensions, margins: i32) -> i32 {
    let available = match (ctx.has_audio, measured.audio, ctx.media_sized, measured.media) {
        (true, Some(audio), _, _) => audio.outer_width(),
        (_, _, true, Some(media)) => media.width,
        _ => measured.bubble_width - dims.bubble_horizontal_padding,
    };
    available - margins
}

/// Widest the bubble may grow.
fn max_bubble_width(measured: &MeasuredSizes, ctx: &LayoutContext, dims: &Dimensions) -> i32 {
    if ctx.media_sized {
        return dims.media_bubble_max_width;
    }
    let mut paddings = dims.row_horizontal_padding;
    if ctx.reserves_avatar {
        paddings += dims.avatar_column_width;
    }
    measured.row_width - paddings
}

fn collapse_footer(constraints: &mut LayoutConstraints, measured: &MeasuredSizes, dims: &Dimensions) {
    constraints.footer_margins = FooterMargins {
        top: -(measured.date_height + dims.footer_collapse_lift),
        bottom: dims.footer_collapsed_bottom_margin,
    };
    constraints.footer_collapsed = true;
}

/// Result of one reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconciled {
    pub constraints: LayoutConstraints,
    pub needs_another_pass: bool,
}

/// Compare one measurement against the constraints it was taken with and
/// compute the next constraints.
pub fn reconcile(
    measured: &MeasuredSizes,
    constraints: &LayoutConstraints,
    ctx: &LayoutContext,
    dims: &Dimensions,
) -> Reconciled {
    let mut next = *constraints;
    let mut needs_another_pass = false;

    // Quote spans the whole bubble
    if ctx.has_quote {
        if let Some(quote) = measured.quote {
            let available = available_bubble_width(measured, ctx, dims, quote.horizontal_margins);
            if quote.width != available {
                next.quote_width = Some(available);
                needs_another_pass = true;
            }
        }
    }

    let body = &measured.body;
    let may_collapse = !next.footer_collapsed
        && ctx.footer_slot == FooterSlot::Standalone
        && !ctx.has_audio
        && ctx.footer_visible
        && !body.jumbomoji
        && body.last_line_width > 0;

    if may_collapse {
        let footer_width = measured.footer.width;
        let available = available_bubble_width(measured, ctx, dims, body.region.horizontal_margins);

        if body.single_line {
            let max_width = max_bubble_width(measured, ctx, dims);
            let with_footer = body.region.width + dims.footer_text_gap + footer_width + body.region.horizontal_margins;
            let wrapped = max_width.min(with_footer.max(measured.bubble_width));

            if ctx.has_quote && with_footer < available {
                collapse_footer(&mut next, measured, dims);
                needs_another_pass = true;
            } else if with_footer != body.region.width && with_footer <= wrapped {
                next.bubble_width = Some(wrapped);
                collapse_footer(&mut next, measured, dims);
                needs_another_pass = true;
            }
        }

        // Room left on the last line of wrapped text
        if !next.footer_collapsed && body.last_line_width + dims.footer_text_gap + footer_width <= body.region.width {
            collapse_footer(&mut next, measured, dims);
            needs_another_pass = true;
        }
    }

    let defaults = default_footer_margins(dims);
    if !next.footer_collapsed && next.footer_margins != defaults {
        next.footer_margins = defaults;
        needs_another_pass = true;
    }

    if ctx.has_shared_contact {
        if let Some(contact) = measured.shared_contact {
            let available = available_bubble_width(measured, ctx, dims, contact.horizontal_margins);
            if contact.width != available {
                next.shared_contact_width = Some(available);
                needs_another_pass = true;
            }
        }
    }

    // Audio footer stretches under the whole player
    if ctx.has_audio && ctx.footer_visible {
        let available = available_bubble_width(measured, ctx, dims, measured.footer.horizontal_margins);
        if measured.footer.width != available {
            next.footer_width = Some(available);
            needs_another_pass = true;
        }
    }

    Reconciled {
        constraints: next,
        needs_another_pass,
    }
}

/// Supplies measurements for the current constraints.
pub trait MeasurementProvider {
    fn measure(&mut self, constraints: &LayoutConstraints) -> MeasuredSizes;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    /// Apply the constraints and measure again.
    Remeasure,
    Settled,
    /// Cap reached; the current constraints are accepted as is.
    CapReached,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SettledLayout {
    pub constraints: LayoutConstraints,
    pub passes: u32,
    pub capped: bool,
}

/// Transient convergence state for one bound item.
#[derive(Clone, Debug)]
pub struct Convergence {
    measure_pass_count: u32,
    constraints: LayoutConstraints,
}

impl Convergence {
    pub fn new(dims: &Dimensions) -> Self {
        Self {
            measure_pass_count: 0,
            constraints: LayoutConstraints::initial(dims),
        }
    }

    /// Drop all state from a previous bind.
    pub fn reset(&mut self, dims: &Dimensions) {
        *self = Self::new(dims);
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        &self.constraints
    }

    pub fn measure_pass_count(&self) -> u32 {
        self.measure_pass_count
    }

    /// Feed one measurement in. Called by the host after every measure.
    pub fn on_measured(&mut self, measured: &MeasuredSizes, ctx: &LayoutContext, dims: &Dimensions) -> PassOutcome {
        if self.measure_pass_count == 0 {
            self.constraints.footer_collapsed = false;
        }
        self.measure_pass_count += 1;
        let Reconciled {
            constraints,
            needs_another_pass,
        } = reconcile(measured, &self.constraints, ctx, dims);
        self.constraints = constraints;

        if !needs_another_pass {
            tracing::trace!(message_id = ctx.message_id, passes = self.measure_pass_count, "layout settled");
            self.end_cycle();
            return PassOutcome::Settled;
        }

        if self.measure_pass_count < MAX_MEASURE_PASSES {
            return PassOutcome::Remeasure;
        }

        tracing::warn!(
            message_id = ctx.message_id,
            passes = self.measure_pass_count,
            "Hit measure cap of {}, keeping current layout",
            MAX_MEASURE_PASSES
        );
        self.end_cycle();
        PassOutcome::CapReached
    }

    fn end_cycle(&mut self) {
        self.measure_pass_count = 0;
    }

    /// Drive measure and reconcile until settled or capped.
    pub fn settle(
        &mut self,
        provider: &mut dyn MeasurementProvider,
        ctx: &LayoutContext,
        dims: &Dimensions,
    ) -> SettledLayout {
        let mut passes = 0;
        loop {
            let measured = provider.measure(&self.constraints);
            passes += 1;
            match self.on_measured(&measured, ctx, dims) {
                PassOutcome::Remeasure => continue,
                outcome => {
                    return SettledLayout {
                        constraints: self.constraints,
                        passes,
                        capped: outcome == PassOutcome::CapReached,
                    }
                }
            }
        }
    }
}
