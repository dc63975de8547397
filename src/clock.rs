//! Calendar comparisons used for clustering and footer decisions.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::{BubbleError, Result};

/// Seconds per display bucket. Footer timestamps are shown at minute
/// resolution, so two messages in the same minute render the same label.
const DISPLAY_BUCKET_SECONDS: i64 = 60;

/// Timezone-aware comparisons for feed timestamps.
///
/// The offset is passed in explicitly so results never depend on the
/// process-wide local timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedClock {
    offset: FixedOffset,
}

impl FeedClock {
    pub fn new(utc_offset_seconds: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_seconds).ok_or_else(|| {
            BubbleError::InvalidSettings(format!("UTC offset out of range: {}s", utc_offset_seconds))
        })?;
        Ok(Self { offset })
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Both instants fall on the same local calendar day.
    pub fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        a.with_timezone(&self.offset).date_naive() == b.with_timezone(&self.offset).date_naive()
    }

    /// Both instants render the same rounded footer timestamp.
    ///
    /// Offsets are whole minutes in practice, so minute buckets are
    /// timezone independent.
    pub fn is_same_display_timestamp(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        a.timestamp().div_euclid(DISPLAY_BUCKET_SECONDS) == b.timestamp().div_euclid(DISPLAY_BUCKET_SECONDS)
    }
}

impl Default for FeedClock {
    fn default() -> Self {
        Self::utc()
    }
}
