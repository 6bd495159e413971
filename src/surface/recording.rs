//! Surface that records draw calls and encodes them as JSON.

use serde::Serialize;

use super::{Color, PageHandle, PageSurface, TextStyle};
use crate::error::{Error, Result};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// `draw_text`
    Text {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Text content
        text: String,
        /// Text style
        style: TextStyle,
    },
    /// `draw_line`
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
        /// Stroke color
        color: Color,
    },
    /// `draw_image`
    Image {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Drawn width
        width: f32,
        /// Drawn height
        height: f32,
        /// Size of the encoded image
        byte_len: usize,
    },
    /// `draw_link`
    Link {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Hit box width
        width: f32,
        /// Hit box height
        height: f32,
        /// Link target
        url: String,
    },
}

/// A page and its draw calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPage {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Draw calls in order
    pub ops: Vec<DrawOp>,
}

/// Records every primitive; `finish` emits the log as pretty JSON.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pages: Vec<RecordedPage>,
}

impl RecordingSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages recorded so far.
    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut RecordedPage> {
        self.pages
            .get_mut(page.0)
            .ok_or_else(|| Error::Render(format!("unknown page handle {}", page.0)))
    }

    fn record(&mut self, page: PageHandle, op: DrawOp) -> Result<()> {
        self.page_mut(page)?.ops.push(op);
        Ok(())
    }
}

impl PageSurface for RecordingSurface {
    fn new_page(&mut self, width: f32, height: f32) -> PageHandle {
        self.pages.push(RecordedPage {
            width,
            height,
            ops: Vec::new(),
        });
        PageHandle(self.pages.len() - 1)
    }

    fn draw_text(&mut self, page: PageHandle, x: f32, y: f32, text: &str, style: &TextStyle) -> Result<()> {
        self.record(
            page,
            DrawOp::Text {
                x,
                y,
                text: text.to_string(),
                style: *style,
            },
        )
    }

    fn draw_line(&mut self, page: PageHandle, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> Result<()> {
        self.record(page, DrawOp::Line { x1, y1, x2, y2, color })
    }

    fn draw_image(&mut self, page: PageHandle, x: f32, y: f32, width: f32, height: f32, bytes: &[u8]) -> Result<()> {
        self.record(
            page,
            DrawOp::Image {
                x,
                y,
                width,
                height,
                byte_len: bytes.len(),
            },
        )
    }

    fn draw_link(&mut self, page: PageHandle, x: f32, y: f32, width: f32, height: f32, url: &str) -> Result<()> {
        self.record(
            page,
            DrawOp::Link {
                x,
                y,
                width,
                height,
                url: url.to_string(),
            },
        )
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        #[derive(Serialize)]
        struct Recording<'a> {
            page_count: usize,
            pages: &'a [RecordedPage],
        }

        serde_json::to_vec_pretty(&Recording {
            page_count: self.pages.len(),
            pages: &self.pages,
        })
        .map_err(|e| Error::Serialization(format!("draw log: {}", e)))
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
