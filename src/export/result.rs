//! Export result with the artifact and statistics.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, Warning};
use crate::model::{BlockBody, Document, LayoutBlock, Metadata};

/// Result of exporting one transcript.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Artifact file name
    pub filename: String,

    /// Encoded artifact
    pub bytes: Vec<u8>,

    /// MIME type of the artifact
    pub mime_type: &'static str,

    /// Export metadata
    pub metadata: Metadata,

    /// Layout statistics
    pub stats: ExportStats,

    /// Problems recovered along the way
    pub warnings: Vec<Warning>,
}

impl ExportResult {
    /// Number of pages in the artifact.
    pub fn page_count(&self) -> u32 {
        self.metadata.page_count
    }

    /// Get artifact length in bytes.
    pub fn content_len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Write the artifact into `dir` under its file name.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        log::debug!("wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Statistics collected while laying out a transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Total number of pages
    pub page_count: u32,

    /// Messages rendered
    pub message_count: u32,

    /// Calls rendered
    pub call_count: u32,

    /// Date dividers placed
    pub divider_count: u32,

    /// Media blocks placed
    pub media_count: u32,

    /// Media blocks with an embedded image
    pub embedded_image_count: u32,

    /// Wrapped text lines across all bubbles
    pub line_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,

    /// Recovered warnings
    pub warning_count: u32,
}

impl ExportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a finished document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self {
            page_count: doc.page_count(),
            message_count: doc.metadata.message_count,
            call_count: doc.metadata.call_count,
            ..Self::default()
        };
        for page in doc.pages() {
            for placed in page.blocks() {
                stats.add_block(&placed.block);
            }
        }
        stats
    }

    /// Count one placed block.
    pub fn add_block(&mut self, block: &LayoutBlock) {
        match &block.body {
            BlockBody::Divider { .. } => self.divider_count += 1,
            BlockBody::Message { lines, .. } | BlockBody::Call { lines } => {
                self.line_count += lines.len() as u32;
                for line in lines {
                    self.count_text(&line.plain_text());
                }
            }
            BlockBody::Media(media) => {
                self.media_count += 1;
                if media.rendering.is_embedded() {
                    self.embedded_image_count += 1;
                }
            }
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExportStats) {
        self.page_count += other.page_count;
        self.message_count += other.message_count;
        self.call_count += other.call_count;
        self.divider_count += other.divider_count;
        self.media_count += other.media_count;
        self.embedded_image_count += other.embedded_image_count;
        self.line_count += other.line_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
        self.warning_count += other.warning_count;
    }
}
