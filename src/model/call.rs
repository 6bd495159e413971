//! Call records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An audio or video call between two participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEvent {
    /// Call id, unique among calls
    pub id: String,

    /// Who placed the call
    pub caller_id: String,

    /// Who was called
    pub receiver_id: String,

    /// Audio or video
    pub call_type: CallType,

    /// Outcome of the call
    pub status: CallStatus,

    /// When the call started ringing
    pub start_time: DateTime<Utc>,

    /// Length of the connected call (0 unless completed)
    #[serde(default)]
    pub duration_seconds: u64,
}

impl CallEvent {
    /// Create a new call record.
    pub fn new(
        id: impl Into<String>,
        caller_id: impl Into<String>,
        receiver_id: impl Into<String>,
        call_type: CallType,
        status: CallStatus,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            caller_id: caller_id.into(),
            receiver_id: receiver_id.into(),
            call_type,
            status,
            start_time,
            duration_seconds: 0,
        }
    }

    /// Set the call duration.
    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Check if a participant took part in the call.
    pub fn involves(&self, user_id: &str) -> bool {
        self.caller_id == user_id || self.receiver_id == user_id
    }
}

/// Call media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// Voice only
    Audio,
    /// Voice and video
    Video,
}

impl CallType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CallType::Audio => "Audio",
            CallType::Video => "Video",
        }
    }
}

/// Call outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Connected and ended normally
    Completed,
    /// Not answered
    Missed,
    /// Declined by the receiver
    Rejected,
    /// Hung up by the caller before connecting
    Cancelled,
}

impl CallStatus {
    /// Suffix appended to call labels, empty for completed calls.
    pub fn suffix(&self) -> &'static str {
        match self {
            CallStatus::Completed => "",
            CallStatus::Missed => " (Missed)",
            CallStatus::Rejected => " (Rejected)",
            CallStatus::Cancelled => " (Cancelled)",
        }
    }
}

/// Format a call duration as `1h 02m 03s`, `5m 12s` or `45s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
