//! Chronological merge of messages and calls.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CallEvent, Message, TimelineEntry, TimelineItem};

/// Order of a message and a call that share a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Messages before calls
    #[default]
    MessagesFirst,
    /// Calls before messages
    CallsFirst,
}

impl TieBreak {
    fn rank(&self, item: &TimelineItem) -> u8 {
        match (self, item) {
            (TieBreak::MessagesFirst, TimelineItem::Message(_))
            | (TieBreak::CallsFirst, TimelineItem::Call(_)) => 0,
            _ => 1,
        }
    }
}

/// Merges the message and call streams into one dated timeline.
#[derive(Debug, Clone)]
pub struct TimelineMerger {
    offset: FixedOffset,
    tie_break: TieBreak,
}

impl TimelineMerger {
    /// Create a merger that groups by calendar day at `offset`.
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            tie_break: TieBreak::default(),
        }
    }

    /// Set the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Sorted items without dividers.
    ///
    /// Deleted and empty messages are dropped. Items are ordered by
    /// timestamp, then tie-break rank, then input order with all messages
    /// counted before all calls.
    pub fn merge(&self, messages: &[Message], calls: &[CallEvent]) -> Vec<TimelineItem> {
        let mut items: Vec<(usize, TimelineItem)> = messages
            .iter()
            .filter(|msg| msg.is_renderable())
            .cloned()
            .map(TimelineItem::Message)
            .chain(calls.iter().cloned().map(TimelineItem::Call))
            .enumerate()
            .collect();

        items.sort_by(|(ia, a), (ib, b)| {
            a.timestamp()
                .cmp(&b.timestamp())
                .then_with(|| self.tie_break.rank(a).cmp(&self.tie_break.rank(b)))
                .then_with(|| ia.cmp(ib))
        });

        log::debug!(
            "merged {} messages and {} calls into {} items",
            messages.len(),
            calls.len(),
            items.len()
        );

        items.into_iter().map(|(_, item)| item).collect()
    }

    /// Merge and insert a divider before the first item of each local day.
    pub fn merge_with_dividers(&self, messages: &[Message], calls: &[CallEvent]) -> Vec<TimelineEntry> {
        let items = self.merge(messages, calls);
        let mut entries = Vec::with_capacity(items.len() + 8);
        let mut current: Option<NaiveDate> = None;

        for item in items {
            let date = self.local_date(&item);
            if current != Some(date) {
                entries.push(TimelineEntry::DateDivider { date });
                current = Some(date);
            }
            entries.push(TimelineEntry::Item(item));
        }

        entries
    }

    /// Calendar date of an item at the configured offset.
    pub fn local_date(&self, item: &TimelineItem) -> NaiveDate {
        item.timestamp().with_timezone(&self.offset).date_naive()
    }
}

impl Default for TimelineMerger {
    fn default() -> Self {
        Self::new(utc())
    }
}

/// The zero offset.
pub(crate) fn utc() -> FixedOffset {
    Utc.fix()
}
