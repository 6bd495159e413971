//! Plain-text surface.
//!
//! Text is snapped to a character grid: rows by y, columns by x divided by
//! the column width. Lines and link areas are not drawn. Pages are
//! separated by a form feed.

use unicode_width::UnicodeWidthStr;

use super::{Color, PageHandle, PageSurface, TextStyle};
use crate::error::{Error, Result};
use crate::layout::FontMetrics;

#[derive(Debug, Clone)]
struct GridText {
    row: i64,
    col: usize,
    text: String,
}

#[derive(Debug, Clone, Default)]
struct TextPage {
    items: Vec<GridText>,
}

/// Renders pages as monospaced plain text.
#[derive(Debug, Clone)]
pub struct TextSurface {
    column_width: f32,
    pages: Vec<TextPage>,
}

impl TextSurface {
    /// Create a surface whose grid matches the default font metrics.
    pub fn new() -> Self {
        Self::with_column_width(FontMetrics::default().column_width())
    }

    /// Create a surface with a custom column width.
    pub fn with_column_width(column_width: f32) -> Self {
        Self {
            column_width: column_width.max(f32::EPSILON),
            pages: Vec::new(),
        }
    }

    fn page_mut(&mut self, page: PageHandle) -> Result<&mut TextPage> {
        self.pages
            .get_mut(page.0)
            .ok_or_else(|| Error::Render(format!("unknown page handle {}", page.0)))
    }

    fn put(&mut self, page: PageHandle, x: f32, y: f32, text: &str) -> Result<()> {
        let col = (x.max(0.0) / self.column_width).round() as usize;
        let row = (y * 10.0).round() as i64;
        self.page_mut(page)?.items.push(GridText {
            row,
            col,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Text of one page.
    fn render_page(page: &TextPage) -> String {
        let mut items: Vec<&GridText> = page.items.iter().collect();
        items.sort_by_key(|item| (item.row, item.col));

        let mut lines: Vec<String> = Vec::new();
        let mut current_row = None;
        for item in items {
            if current_row != Some(item.row) {
                lines.push(String::new());
                current_row = Some(item.row);
            }
            if let Some(line) = lines.last_mut() {
                let used = line.width();
                if item.col > used {
                    line.push_str(&" ".repeat(item.col - used));
                }
                line.push_str(&item.text);
            }
        }

        lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSurface for TextSurface {
    fn new_page(&mut self, _width: f32, _height: f32) -> PageHandle {
        self.pages.push(TextPage::default());
        PageHandle(self.pages.len() - 1)
    }

    fn draw_text(&mut self, page: PageHandle, x: f32, y: f32, text: &str, _style: &TextStyle) -> Result<()> {
        self.put(page, x, y, text)
    }

    fn draw_line(&mut self, page: PageHandle, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _color: Color) -> Result<()> {
        self.page_mut(page).map(|_| ())
    }

    fn draw_image(&mut self, page: PageHandle, x: f32, y: f32, width: f32, height: f32, _bytes: &[u8]) -> Result<()> {
        self.put(page, x, y, &format!("[image {:.0}x{:.0}]", width, height))
    }

    fn draw_link(&mut self, page: PageHandle, _x: f32, _y: f32, _width: f32, _height: f32, _url: &str) -> Result<()> {
        self.page_mut(page).map(|_| ())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let pages: Vec<String> = self.pages.iter().map(Self::render_page).collect();
        let mut out = pages.join("\n\u{000C}\n");
        out.push('\n');
        Ok(out.into_bytes())
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let mut surface = TextSurface::with_column_width(1.0);
        let page = surface.new_page(80.0, 100.0);
        let style = TextStyle::new(10.0);
        surface.draw_text(page, 10.0, 5.0, "right", &style).unwrap();
        surface.draw_text(page, 0.0, 5.0, "left", &style).unwrap();
        surface.draw_text(page, 2.0, 10.0, "below", &style).unwrap();

        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert_eq!(out, "left      right\n  below\n");
    }

    #[test]
    fn test_adjacent_runs_join() {
        let mut surface = TextSurface::with_column_width(1.0);
        let page = surface.new_page(80.0, 100.0);
        let style = TextStyle::new(10.0);
        surface.draw_text(page, 0.0, 0.0, "Hello", &style).unwrap();
        surface.draw_text(page, 5.0, 0.0, ", world", &style).unwrap();

        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert_eq!(out, "Hello, world\n");
    }

    #[test]
    fn test_pages_separated_by_form_feed() {
        let mut surface = TextSurface::with_column_width(1.0);
        let style = TextStyle::new(10.0);
        let first = surface.new_page(80.0, 100.0);
        let second = surface.new_page(80.0, 100.0);
        surface.draw_text(first, 0.0, 0.0, "one", &style).unwrap();
        surface.draw_text(second, 0.0, 0.0, "two", &style).unwrap();
        surface
            .draw_line(second, 0.0, 0.0, 10.0, 0.0, Color::BLACK)
            .unwrap();

        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert_eq!(out, "one\n\u{000C}\ntwo\n");
        assert!(surface.draw_link(PageHandle(9), 0.0, 0.0, 1.0, 1.0, "x").is_err());
    }
}
