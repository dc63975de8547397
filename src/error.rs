//! Error type shared by every resolver.

use thiserror::Error;

/// Errors raised while resolving a conversation item.
///
/// Only integration mistakes and settings problems surface here. Layout
/// degradation (the measure cap) is logged, not returned.
#[derive(Debug, Error)]
pub enum BubbleError {
    /// The message carries a quote but the host never provided a quote slot.
    #[error("message {message_id} has a quote but no quote slot is available")]
    MissingQuoteSlot { message_id: u64 },

    /// Multiselect was asked about a message with no recognised region.
    #[error("message {message_id} has neither a selectable attachment nor a bubble")]
    NoSelectableRegion { message_id: u64 },

    /// Touch or tap handling on an item slot with no message bound.
    #[error("no message is bound to this item")]
    NotBound,

    #[error("invalid layout settings: {0}")]
    InvalidSettings(String),

    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BubbleError>;
