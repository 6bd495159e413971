//! Page surfaces: the drawing primitives a document backend provides.
//!
//! Coordinates are in layout units with the origin at the top-left corner
//! of the page and y growing downward. Text is positioned by the top-left
//! corner of its line box.

mod recording;
mod text;

pub use recording::{DrawOp, RecordedPage, RecordingSurface};
pub use text::TextSurface;

use serde::Serialize;

use crate::error::Result;

/// Handle to a page created by [`PageSurface::new_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageHandle(pub usize);

/// Stroke weight of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular
    #[default]
    Normal,
    /// Bold
    Bold,
}

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Body text.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Secondary text and rules.
    pub const GREY: Color = Color::rgb(120, 120, 120);
    /// Hyperlinks.
    pub const LINK: Color = Color::rgb(25, 90, 200);
    /// Outline of the viewer's own bubbles.
    pub const OWN_BUBBLE: Color = Color::rgb(70, 130, 180);
    /// Outline of other bubbles.
    pub const OTHER_BUBBLE: Color = Color::rgb(190, 190, 190);

    /// Create a color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a piece of text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    /// Font size in points
    pub size: f32,
    /// Stroke weight
    pub weight: FontWeight,
    /// Slanted
    pub italic: bool,
    /// Fill color
    pub color: Color,
}

impl TextStyle {
    /// Regular black text of `size`.
    pub fn new(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            italic: false,
            color: Color::BLACK,
        }
    }

    /// Bold variant.
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    /// Italic variant.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Drawing primitives of a paginated document backend.
///
/// Every draw call addresses a page by handle; an unknown handle is an
/// error. [`PageSurface::finish`] encodes everything drawn so far into the
/// output artifact.
pub trait PageSurface {
    /// Append a page of the given size.
    fn new_page(&mut self, width: f32, height: f32) -> PageHandle;

    /// Draw a single line of text.
    fn draw_text(&mut self, page: PageHandle, x: f32, y: f32, text: &str, style: &TextStyle) -> Result<()>;

    /// Draw a straight line.
    fn draw_line(&mut self, page: PageHandle, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> Result<()>;

    /// Draw encoded image bytes into a box.
    fn draw_image(&mut self, page: PageHandle, x: f32, y: f32, width: f32, height: f32, bytes: &[u8]) -> Result<()>;

    /// Add an invisible clickable area.
    fn draw_link(&mut self, page: PageHandle, x: f32, y: f32, width: f32, height: f32, url: &str) -> Result<()>;

    /// Number of pages created.
    fn page_count(&self) -> usize;

    /// Encode the drawn document.
    fn finish(&mut self) -> Result<Vec<u8>>;

    /// MIME type of the encoded artifact.
    fn mime_type(&self) -> &'static str;

    /// File extension of the encoded artifact.
    fn extension(&self) -> &'static str;
}

/// Draw the outline of a rectangle.
pub fn draw_rect(
    surface: &mut dyn PageSurface,
    page: PageHandle,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Color,
) -> Result<()> {
    let (right, bottom) = (x + width, y + height);
    surface.draw_line(page, x, y, right, y, color)?;
    surface.draw_line(page, right, y, right, bottom, color)?;
    surface.draw_line(page, right, bottom, x, bottom, color)?;
    surface.draw_line(page, x, bottom, x, y, color)
}
