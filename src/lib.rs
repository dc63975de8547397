//! Bubble layout library.
//!
//! Resolves how a chat message is drawn inside a conversation feed: its
//! place in a cluster of related messages, bubble and media corners, the
//! content presentation, footer placement, layout convergence against host
//! measurements and multiselect hit testing.

pub mod clock;
pub mod cluster;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod footer;
pub mod item;
pub mod layout;
pub mod logging;
pub mod message;
pub mod multiselect;
pub mod shape;
pub mod validation;
pub mod variant;

pub use error::{BubbleError, Result};
pub use item::{resolve, BindRequest, ConversationItem, ResolvedItem};
pub use message::Message;
