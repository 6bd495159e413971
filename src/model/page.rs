//! Page-level types.
//!
//! Pagination fills [`PageBuilder`]s; finalization turns each builder into
//! an immutable [`Page`] once header and footer bands are known.

use serde::Serialize;

use super::LayoutBlock;

/// A block with its absolute origin on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    /// Left edge
    pub x: f32,

    /// Top edge (y grows downward)
    pub y: f32,

    /// Index of the timeline group this block belongs to
    pub group: usize,

    /// The block itself; its sub-blocks are placed separately
    pub block: LayoutBlock,
}

impl PlacedBlock {
    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.block.height
    }

    /// Check if the vertical extents of two blocks intersect.
    pub fn overlaps_vertically(&self, other: &PlacedBlock) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }
}

/// A header or footer band stamped after layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Band width
    pub width: f32,

    /// Band height
    pub height: f32,

    /// Text lines, centered
    pub lines: Vec<String>,
}

impl Band {
    /// Create a band.
    pub fn new(x: f32, y: f32, width: f32, height: f32, lines: Vec<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            lines,
        }
    }
}

/// A page under construction, tracking the vertical cursor.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    number: u32,
    width: f32,
    height: f32,
    start_y: f32,
    limit_y: f32,
    cursor_y: f32,
    blocks: Vec<PlacedBlock>,
}

impl PageBuilder {
    /// Start a page whose content runs from `start_y` down to `limit_y`.
    pub fn new(number: u32, width: f32, height: f32, start_y: f32, limit_y: f32) -> Self {
        Self {
            number,
            width,
            height,
            start_y,
            limit_y,
            cursor_y: start_y,
            blocks: Vec::new(),
        }
    }

    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Current write position.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Lowest y a block may reach without overflowing.
    pub fn limit_y(&self) -> f32 {
        self.limit_y
    }

    /// Height available to content on an empty page.
    pub fn usable_height(&self) -> f32 {
        self.limit_y - self.start_y
    }

    /// Height left below the cursor.
    pub fn remaining_height(&self) -> f32 {
        (self.limit_y - self.cursor_y).max(0.0)
    }

    /// Check if a block of `height` fits below the cursor.
    pub fn fits(&self, height: f32) -> bool {
        self.cursor_y + height <= self.limit_y
    }

    /// Check if nothing has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks placed so far.
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// Place a block at the cursor and move the cursor below it.
    pub fn place(&mut self, x: f32, block: LayoutBlock, group: usize) -> f32 {
        let y = self.cursor_y;
        self.cursor_y += block.height;
        self.blocks.push(PlacedBlock { x, y, group, block });
        y
    }

    /// Move the cursor down, never past the bottom limit.
    pub fn advance(&mut self, dy: f32) {
        self.cursor_y = (self.cursor_y + dy).min(self.limit_y.max(self.cursor_y));
    }

    /// Freeze the page with its bands.
    pub fn finish(self, header: Option<Band>, footer: Option<Band>) -> Page {
        Page {
            number: self.number,
            width: self.width,
            height: self.height,
            blocks: self.blocks,
            header,
            footer,
        }
    }
}

/// A finished page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    number: u32,
    width: f32,
    height: f32,
    blocks: Vec<PlacedBlock>,
    header: Option<Band>,
    footer: Option<Band>,
}

impl Page {
    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Page width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Placed blocks in reading order.
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// Header band (first page only).
    pub fn header(&self) -> Option<&Band> {
        self.header.as_ref()
    }

    /// Footer band.
    pub fn footer(&self) -> Option<&Band> {
        self.footer.as_ref()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
