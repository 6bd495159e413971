//! Chat message records as supplied by the chat backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message id, unique among messages
    pub id: String,

    /// Id of the sending participant
    pub sender_id: String,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// Message body with lightweight markup, if any
    #[serde(default)]
    pub raw_text: Option<String>,

    /// Attached media
    #[serde(default)]
    pub attachment: Option<Attachment>,

    /// Id of the message this one replies to
    #[serde(default)]
    pub reply_to_id: Option<String>,

    /// Emoji reactions
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// The body was edited after sending
    #[serde(default)]
    pub edited: bool,

    /// The message was deleted
    #[serde(default)]
    pub deleted: bool,
}

impl Message {
    /// Create a text message.
    pub fn text(
        id: impl Into<String>,
        sender_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender_id: sender_id.into(),
            timestamp,
            raw_text: Some(text.into()),
            attachment: None,
            reply_to_id: None,
            reactions: Vec::new(),
            edited: false,
            deleted: false,
        }
    }

    /// Create a message that only carries an attachment.
    pub fn media(
        id: impl Into<String>,
        sender_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        attachment: Attachment,
    ) -> Self {
        Self {
            id: id.into(),
            sender_id: sender_id.into(),
            timestamp,
            raw_text: None,
            attachment: Some(attachment),
            reply_to_id: None,
            reactions: Vec::new(),
            edited: false,
            deleted: false,
        }
    }

    /// Attach media to the message.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Mark the message as a reply.
    pub fn replying_to(mut self, id: impl Into<String>) -> Self {
        self.reply_to_id = Some(id.into());
        self
    }

    /// Add a reaction.
    pub fn with_reaction(mut self, emoji: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.reactions.push(Reaction {
            emoji: emoji.into(),
            user_id: user_id.into(),
        });
        self
    }

    /// Mark the message as edited.
    pub fn mark_edited(mut self) -> Self {
        self.edited = true;
        self
    }

    /// Mark the message as deleted.
    pub fn mark_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Body text, if it contains anything besides whitespace.
    pub fn body(&self) -> Option<&str> {
        self.raw_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Check if the message contributes anything to the layout.
    pub fn is_renderable(&self) -> bool {
        !self.deleted && (self.body().is_some() || self.attachment.is_some())
    }
}

/// Media attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Kind of media
    pub kind: AttachmentKind,

    /// Source URL
    pub url: String,

    /// Original file name
    #[serde(default)]
    pub name: Option<String>,
}

impl Attachment {
    /// Create a new attachment.
    pub fn new(kind: AttachmentKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            name: None,
        }
    }

    /// Create an image attachment.
    pub fn image(url: impl Into<String>) -> Self {
        Self::new(AttachmentKind::Image, url)
    }

    /// Set the file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image
    }
}

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Still image
    Image,
    /// Video clip
    Video,
    /// Audio clip or voice note
    Audio,
    /// Any other file
    Document,
}

impl AttachmentKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "Image",
            AttachmentKind::Video => "Video",
            AttachmentKind::Audio => "Audio",
            AttachmentKind::Document => "Document",
        }
    }
}

/// An emoji reaction left by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// The emoji
    pub emoji: String,

    /// Who reacted
    pub user_id: String,
}
