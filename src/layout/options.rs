//! Page geometry and layout configuration.

use serde::Serialize;

use super::FontMetrics;
use crate::error::{Error, Result};

/// Options controlling page geometry and block sizing.
///
/// All lengths are in layout units (millimetres for the default A4 page).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOptions {
    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Top margin
    pub top_margin: f32,

    /// Bottom margin; the footer band sits inside it
    pub bottom_margin: f32,

    /// Left margin
    pub left_margin: f32,

    /// Right margin
    pub right_margin: f32,

    /// Header band height, reserved on the first page only
    pub header_height: f32,

    /// Footer band height
    pub footer_height: f32,

    /// Height of one wrapped text line
    pub line_height: f32,

    /// Padding above and below bubble content
    pub bubble_padding: f32,

    /// Height of the sender/time row inside a bubble
    pub meta_row_height: f32,

    /// Padding left and right of bubble content
    pub horizontal_padding: f32,

    /// Maximum bubble width as a fraction of the content width
    pub bubble_max_width_ratio: f32,

    /// Vertical space between consecutive groups
    pub inter_block_spacing: f32,

    /// Vertical space between a block and its sub-blocks
    pub sub_block_gap: f32,

    /// Height of a date divider
    pub divider_height: f32,

    /// Height of the "Reply to" row
    pub reply_row_height: f32,

    /// Height of the reactions row
    pub reactions_row_height: f32,

    /// Width of the box embedded images are scaled into
    pub media_max_width: f32,

    /// Height of the box embedded images are scaled into
    pub media_max_height: f32,

    /// Height of a media placeholder box
    pub placeholder_height: f32,

    /// Height of the link row below media
    pub link_row_height: f32,

    /// Text measurement parameters
    pub font: FontMetrics,
}

impl LayoutOptions {
    /// Create layout options with A4 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set all four margins.
    pub fn with_margins(mut self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        self.top_margin = top;
        self.right_margin = right;
        self.bottom_margin = bottom;
        self.left_margin = left;
        self
    }

    /// Set the first-page header band height.
    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    /// Set the footer band height.
    pub fn with_footer_height(mut self, height: f32) -> Self {
        self.footer_height = height;
        self
    }

    /// Set the line height.
    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = height;
        self
    }

    /// Set the spacing between groups.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.inter_block_spacing = spacing;
        self
    }

    /// Set the spacing between a block and its sub-blocks.
    pub fn with_sub_block_gap(mut self, gap: f32) -> Self {
        self.sub_block_gap = gap;
        self
    }

    /// Set bubble padding and meta row height.
    pub fn with_bubble_padding(mut self, vertical: f32, horizontal: f32, meta_row: f32) -> Self {
        self.bubble_padding = vertical;
        self.horizontal_padding = horizontal;
        self.meta_row_height = meta_row;
        self
    }

    /// Set the maximum bubble width ratio.
    pub fn with_bubble_max_width_ratio(mut self, ratio: f32) -> Self {
        self.bubble_max_width_ratio = ratio;
        self
    }

    /// Set the divider height.
    pub fn with_divider_height(mut self, height: f32) -> Self {
        self.divider_height = height;
        self
    }

    /// Set the bounding box for embedded images.
    pub fn with_media_box(mut self, width: f32, height: f32) -> Self {
        self.media_max_width = width;
        self.media_max_height = height;
        self
    }

    /// Set the placeholder box height.
    pub fn with_placeholder_height(mut self, height: f32) -> Self {
        self.placeholder_height = height;
        self
    }

    /// Set the font metrics.
    pub fn with_font(mut self, font: FontMetrics) -> Self {
        self.font = font;
        self
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.left_margin - self.right_margin
    }

    /// Widest a bubble may be.
    pub fn max_bubble_width(&self) -> f32 {
        self.content_width() * self.bubble_max_width_ratio
    }

    /// Widest a wrapped text line inside a bubble may be.
    pub fn max_text_width(&self) -> f32 {
        (self.max_bubble_width() - 2.0 * self.horizontal_padding).max(0.0)
    }

    /// Vertical overhead of a bubble: padding plus the meta row.
    pub fn vertical_padding(&self) -> f32 {
        2.0 * self.bubble_padding + self.meta_row_height
    }

    /// First y available to content on a page.
    pub fn content_top(&self, page_number: u32) -> f32 {
        if page_number == 1 {
            self.top_margin + self.header_height
        } else {
            self.top_margin
        }
    }

    /// Lowest y content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Check that the geometry leaves room for content.
    pub fn validate(&self) -> Result<()> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(Error::InvalidOptions(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        let margins = [
            self.top_margin,
            self.bottom_margin,
            self.left_margin,
            self.right_margin,
            self.header_height,
            self.footer_height,
            self.inter_block_spacing,
            self.sub_block_gap,
        ];
        if margins.iter().any(|m| *m < 0.0 || !m.is_finite()) {
            return Err(Error::InvalidOptions(
                "margins, bands and spacing must be non-negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::InvalidOptions(
                "left and right margins exceed page width".to_string(),
            ));
        }
        if self.content_bottom() - self.content_top(1) <= 0.0 {
            return Err(Error::InvalidOptions(
                "margins and header exceed page height".to_string(),
            ));
        }
        if self.footer_height > self.bottom_margin {
            return Err(Error::InvalidOptions(
                "footer band does not fit in the bottom margin".to_string(),
            ));
        }
        if self.line_height <= 0.0 {
            return Err(Error::InvalidOptions(
                "line height must be positive".to_string(),
            ));
        }
        if !(self.bubble_max_width_ratio > 0.0 && self.bubble_max_width_ratio <= 1.0) {
            return Err(Error::InvalidOptions(format!(
                "bubble width ratio must be in (0, 1], got {}",
                self.bubble_max_width_ratio
            )));
        }
        if self.max_text_width() <= 0.0 {
            return Err(Error::InvalidOptions(
                "bubble padding leaves no room for text".to_string(),
            ));
        }
        if self.media_max_width <= 0.0 || self.media_max_height <= 0.0 {
            return Err(Error::InvalidOptions(
                "media box must be positive".to_string(),
            ));
        }
        self.font.validate()
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            left_margin: 15.0,
            right_margin: 15.0,
            header_height: 18.0,
            footer_height: 10.0,
            line_height: 5.0,
            bubble_padding: 2.5,
            meta_row_height: 5.0,
            horizontal_padding: 4.0,
            bubble_max_width_ratio: 0.72,
            inter_block_spacing: 3.0,
            sub_block_gap: 1.5,
            divider_height: 10.0,
            reply_row_height: 5.0,
            reactions_row_height: 5.0,
            media_max_width: 60.0,
            media_max_height: 60.0,
            placeholder_height: 16.0,
            link_row_height: 5.0,
            font: FontMetrics::default(),
        }
    }
}
