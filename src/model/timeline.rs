//! Unified timeline of messages and calls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CallEvent, Message};
use crate::error::Result;

/// Either a message or a call event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineItem {
    /// A chat message
    Message(Message),
    /// A call record
    Call(CallEvent),
}

impl TimelineItem {
    /// Primary sort key.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            TimelineItem::Message(msg) => msg.timestamp,
            TimelineItem::Call(call) => call.start_time,
        }
    }

    /// Id of the underlying record.
    pub fn id(&self) -> &str {
        match self {
            TimelineItem::Message(msg) => &msg.id,
            TimelineItem::Call(call) => &call.id,
        }
    }

    /// Check if this is a message.
    pub fn is_message(&self) -> bool {
        matches!(self, TimelineItem::Message(_))
    }

    /// Check if this is a call.
    pub fn is_call(&self) -> bool {
        matches!(self, TimelineItem::Call(_))
    }
}

/// An entry in the merged timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    /// Start of a new calendar day
    DateDivider {
        /// The local calendar date
        date: NaiveDate,
    },
    /// A message or call
    Item(TimelineItem),
}

impl TimelineEntry {
    /// Check if this entry is a date divider.
    pub fn is_divider(&self) -> bool {
        matches!(self, TimelineEntry::DateDivider { .. })
    }

    /// Get the item if this entry is one.
    pub fn item(&self) -> Option<&TimelineItem> {
        match self {
            TimelineEntry::Item(item) => Some(item),
            TimelineEntry::DateDivider { .. } => None,
        }
    }
}

/// A complete chat transcript handed over by the chat widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Messages in chronological order
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Calls in chronological order
    #[serde(default)]
    pub calls: Vec<CallEvent>,

    /// Display names keyed by participant id
    #[serde(default)]
    pub participants: HashMap<String, String>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a transcript from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a message.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add a call.
    pub fn add_call(&mut self, call: CallEvent) {
        self.calls.push(call);
    }

    /// Register a participant's display name.
    pub fn add_participant(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.participants.insert(id.into(), name.into());
    }

    /// Display name for a participant, falling back to the id.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.participants.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Check if the transcript has nothing to export.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.calls.is_empty()
    }
}
