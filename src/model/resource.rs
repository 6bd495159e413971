//! Image resources embedded into an exported document.

use serde::Serialize;
use std::sync::Arc;

/// Image bytes referenced by embedded media blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Raw encoded image bytes, shared with the media cache
    #[serde(skip)]
    pub data: Arc<Vec<u8>>,

    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,

    /// URL the bytes were fetched from
    pub source_url: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl Resource {
    /// Create an image resource.
    pub fn image(
        data: Arc<Vec<u8>>,
        mime_type: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            source_url: source_url.into(),
            width: 0,
            height: 0,
        }
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Get the size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}
