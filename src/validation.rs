//! Sanity checks for host-supplied layout settings

use crate::config::{Dimensions, LayoutSettings};
use crate::error::{BubbleError, Result};

/// Smallest and largest message font sizes the host settings screen offers.
const MIN_FONT_SIZE: u32 = 8;
const MAX_FONT_SIZE: u32 = 40;

fn invalid(msg: impl Into<String>) -> BubbleError {
    BubbleError::InvalidSettings(msg.into())
}

/// Validates corner radii and widths.
pub fn validate_dimensions(dims: &Dimensions) -> Result<()> {
    if dims.corner_radius_big <= 0 {
        return Err(invalid("Big corner radius must be positive"));
    }

    // A collapsed corner has to be visibly tighter than a free one
    if dims.corner_radius_collapsed < 0 || dims.corner_radius_collapsed > dims.corner_radius_big {
        return Err(invalid(format!(
            "Collapsed corner radius {} must be between 0 and the big radius {}",
            dims.corner_radius_collapsed, dims.corner_radius_big
        )));
    }

    if dims.media_bubble_max_width <= 0 {
        return Err(invalid("Media bubble max width must be positive"));
    }

    if dims.media_min_width_solo > dims.media_bubble_max_width
        || dims.media_min_width_with_content > dims.media_bubble_max_width
    {
        return Err(invalid("Media minimum widths cannot exceed the media max width"));
    }

    let non_negative = [
        ("footer_default_top_margin", dims.footer_default_top_margin),
        ("bubble_bottom_padding", dims.bubble_bottom_padding),
        ("footer_collapsed_bottom_margin", dims.footer_collapsed_bottom_margin),
        ("footer_text_gap", dims.footer_text_gap),
        ("footer_collapse_lift", dims.footer_collapse_lift),
        ("bubble_horizontal_padding", dims.bubble_horizontal_padding),
        ("row_horizontal_padding", dims.row_horizontal_padding),
        ("avatar_column_width", dims.avatar_column_width),
        ("bubble_top_padding", dims.bubble_top_padding),
        ("revealable_padding", dims.revealable_padding),
        ("spacing_default", dims.spacing_default),
        ("spacing_collapsed", dims.spacing_collapsed),
    ];
    for (name, value) in non_negative {
        if value < 0 {
            return Err(invalid(format!("{} cannot be negative (got {})", name, value)));
        }
    }

    Ok(())
}

/// Validates a full settings object before the pipeline uses it.
pub fn validate_settings(settings: &LayoutSettings) -> Result<()> {
    validate_dimensions(&settings.dimensions)?;

    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&settings.message_font_size) {
        return Err(invalid(format!(
            "Message font size {} outside {}..={}",
            settings.message_font_size, MIN_FONT_SIZE, MAX_FONT_SIZE
        )));
    }

    // FixedOffset only accepts offsets strictly inside one day
    settings.clock()?;

    Ok(())
}
