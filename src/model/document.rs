//! Document-level types.

use super::{Page, Resource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A finished, paginated transcript document.
///
/// Built once by the finalizer; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Export metadata
    pub metadata: Metadata,

    pages: Vec<Page>,

    /// Embedded images keyed by resource id
    pub resources: BTreeMap<String, Resource>,
}

impl Document {
    /// Assemble a document from finished pages.
    pub fn new(mut metadata: Metadata, pages: Vec<Page>, resources: BTreeMap<String, Resource>) -> Self {
        metadata.page_count = pages.len() as u32;
        Self {
            metadata,
            pages,
            resources,
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of placed blocks across pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(Page::block_count).sum()
    }
}

/// Export metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    /// Document title (header of page 1)
    pub title: String,

    /// Application name used in file names and footers
    pub app_name: String,

    /// Chat or conversation identifier
    pub subject_id: String,

    /// Whose perspective the transcript is rendered from
    pub perspective: String,

    /// Whether image media was embedded
    pub include_media: bool,

    /// When the export ran
    pub exported_at: DateTime<Utc>,

    /// Total number of pages
    pub page_count: u32,

    /// Messages rendered
    pub message_count: u32,

    /// Calls rendered
    pub call_count: u32,
}

impl Metadata {
    /// Create metadata for an export.
    pub fn new(
        title: impl Into<String>,
        app_name: impl Into<String>,
        subject_id: impl Into<String>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            app_name: app_name.into(),
            subject_id: subject_id.into(),
            perspective: String::new(),
            include_media: false,
            exported_at,
            page_count: 0,
            message_count: 0,
            call_count: 0,
        }
    }
}
