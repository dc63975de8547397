use crate::message::Message;

/// The neighbours a message is classified against.
///
/// Derived per render pass from feed order, never stored. Feed order is
/// not guaranteed to be timestamp order, so resolvers compare semantic
/// fields (day, sender, direction) rather than relying on adjacency alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeighborContext<'a> {
    pub previous: Option<&'a Message>,
    pub next: Option<&'a Message>,
    pub is_group_thread: bool,
}

impl<'a> NeighborContext<'a> {
    pub fn new(previous: Option<&'a Message>, next: Option<&'a Message>, is_group_thread: bool) -> Self {
        Self {
            previous,
            next,
            is_group_thread,
        }
    }

    /// A message with no neighbours at all.
    pub fn alone(is_group_thread: bool) -> Self {
        Self::new(None, None, is_group_thread)
    }
}

/// One message together with its feed neighbours.
#[derive(Clone, Copy, Debug)]
pub struct FeedWindow<'a> {
    pub current: &'a Message,
    pub context: NeighborContext<'a>,
}

/// An ordered conversation feed, oldest first.
#[derive(Default, Clone, Debug)]
pub struct Feed {
    pub messages: Vec<Message>,
    pub is_group_thread: bool,
}

impl Feed {
    pub fn new(messages: Vec<Message>, is_group_thread: bool) -> Self {
        Self {
            messages,
            is_group_thread,
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The window around the message at `index`.
    pub fn window(&self, index: usize) -> Option<FeedWindow<'_>> {
        let current = self.messages.get(index)?;
        let previous = index.checked_sub(1).and_then(|i| self.messages.get(i));
        let next = self.messages.get(index + 1);
        Some(FeedWindow {
            current,
            context: NeighborContext::new(previous, next, self.is_group_thread),
        })
    }

    /// Windows for every message, in feed order.
    pub fn windows(&self) -> impl Iterator<Item = FeedWindow<'_>> {
        (0..self.messages.len()).filter_map(move |i| self.window(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Direction;
    use chrono::{TimeZone, Utc};

    fn msg(id: u64) -> Message {
        Message::text(id, Utc.timestamp_opt(id as i64 * 10, 0).unwrap(), "alice", Direction::Incoming, "hi")
    }

    #[test]
    fn test_windows_edges() {
        let feed = Feed::new(vec![msg(1), msg(2), msg(3)], true);
        let windows: Vec<_> = feed.windows().collect();
        assert_eq!(windows.len(), 3);

        assert!(windows[0].context.previous.is_none());
        assert_eq!(windows[0].context.next.map(|m| m.id), Some(2));

        assert_eq!(windows[1].context.previous.map(|m| m.id), Some(1));
        assert_eq!(windows[1].context.next.map(|m| m.id), Some(3));

        assert_eq!(windows[2].context.previous.map(|m| m.id), Some(2));
        assert!(windows[2].context.next.is_none());
        assert!(windows[2].context.is_group_thread);
    }

    #[test]
    fn test_window_out_of_range() {
        let mut feed = Feed::default();
        assert!(feed.is_empty());
        assert!(feed.window(0).is_none());
        feed.push(msg(1));
        assert_eq!(feed.len(), 1);
        let only = feed.window(0).unwrap();
        assert!(only.context.previous.is_none() && only.context.next.is_none());
    }
}
