//! Visual blocks produced from timeline entries.

use serde::Serialize;

use super::{AttachmentKind, WrappedLine};

/// A sized visual block: a bubble, a media block or a date divider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBlock {
    /// Horizontal side of the page
    pub alignment: Alignment,

    /// Block width in layout units
    pub width: f32,

    /// Block height in layout units, excluding sub-blocks
    pub height: f32,

    /// What the block draws
    pub body: BlockBody,

    /// Sender name or "You"
    pub sender_label: Option<String>,

    /// Time of day, with an edit marker
    pub timestamp_label: Option<String>,

    /// Blocks that must stay on the same page, directly below this one
    pub sub_blocks: Vec<LayoutBlock>,
}

impl LayoutBlock {
    /// Create a block without labels or sub-blocks.
    pub fn new(body: BlockBody, alignment: Alignment, width: f32, height: f32) -> Self {
        Self {
            alignment,
            width,
            height,
            body,
            sender_label: None,
            timestamp_label: None,
            sub_blocks: Vec::new(),
        }
    }

    /// Set the sender and timestamp labels.
    pub fn with_labels(mut self, sender: Option<String>, timestamp: Option<String>) -> Self {
        self.sender_label = sender;
        self.timestamp_label = timestamp;
        self
    }

    /// Attach a sub-block.
    pub fn with_sub_block(mut self, block: LayoutBlock) -> Self {
        self.sub_blocks.push(block);
        self
    }

    /// Kind of the block.
    pub fn kind(&self) -> BlockKind {
        match self.body {
            BlockBody::Divider { .. } => BlockKind::DateDivider,
            BlockBody::Message { .. } => BlockKind::MessageBubble,
            BlockBody::Call { .. } => BlockKind::CallBubble,
            BlockBody::Media(_) => BlockKind::MediaBlock,
        }
    }

    /// Height of the block together with its sub-blocks, separated by `gap`.
    pub fn group_height(&self, gap: f32) -> f32 {
        self.height
            + self
                .sub_blocks
                .iter()
                .map(|sub| gap + sub.group_height(gap))
                .sum::<f32>()
    }

    /// Check if this block is a date divider.
    pub fn is_divider(&self) -> bool {
        matches!(self.body, BlockBody::Divider { .. })
    }

    /// Number of wrapped text lines in the block body.
    pub fn line_count(&self) -> usize {
        match &self.body {
            BlockBody::Message { lines, .. } | BlockBody::Call { lines } => lines.len(),
            BlockBody::Divider { .. } | BlockBody::Media(_) => 0,
        }
    }
}

/// Kind of a layout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Calendar day separator
    DateDivider,
    /// Text message bubble
    MessageBubble,
    /// Call record bubble
    CallBubble,
    /// Attached media
    MediaBlock,
}

/// Horizontal side a block is placed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Other participants, observers, dividers
    #[default]
    Left,
    /// The viewer's own items
    Right,
}

/// Content of a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    /// Date divider with its label
    Divider {
        /// Long date label
        label: String,
    },

    /// Message text with optional context rows
    Message {
        /// "Reply to ..." row
        reply_context: Option<String>,
        /// Wrapped body text
        lines: Vec<WrappedLine>,
        /// Grouped reactions row
        reactions: Option<String>,
    },

    /// Call label lines
    Call {
        /// Wrapped label
        lines: Vec<WrappedLine>,
    },

    /// Media block
    Media(MediaDescriptor),
}

/// How an attachment is shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDescriptor {
    /// Kind of attachment
    pub kind: AttachmentKind,

    /// Label shown in placeholders, e.g. "[Video] clip.mp4"
    pub label: String,

    /// Clickable target below the media
    pub link_url: String,

    /// Visible link text (may be shortened to fit)
    pub link_text: String,

    /// Embedded image or placeholder
    pub rendering: MediaRendering,
}

/// Embedded image versus placeholder box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaRendering {
    /// Image drawn inline
    Embedded {
        /// Document resource holding the image bytes
        resource_id: String,
        /// Drawn width
        width: f32,
        /// Drawn height
        height: f32,
    },

    /// Fixed-size labeled box
    Placeholder {
        /// Box height
        height: f32,
    },
}

impl MediaRendering {
    /// Height of the visual area (image or placeholder box).
    pub fn height(&self) -> f32 {
        match self {
            MediaRendering::Embedded { height, .. } | MediaRendering::Placeholder { height } => {
                *height
            }
        }
    }

    /// Check if the media is embedded.
    pub fn is_embedded(&self) -> bool {
        matches!(self, MediaRendering::Embedded { .. })
    }
}
