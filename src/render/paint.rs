//! Painting a finished document onto a page surface.

use crate::error::{Error, Result};
use crate::layout::{LayoutOptions, TextMeasure};
use crate::model::{
    Alignment, Band, BlockBody, Document, InlineRun, MediaDescriptor, MediaRendering, PlacedBlock,
    RunStyle, WrappedLine,
};
use crate::surface::{draw_rect, Color, PageHandle, PageSurface, TextStyle};

/// Point size of the title line in the header band.
const TITLE_SIZE: f32 = 14.0;

/// Point size of footer and subtitle text.
const SMALL_SIZE: f32 = 8.0;

/// Paint `document` onto `surface`, one surface page per document page.
pub fn paint(document: &Document, options: &LayoutOptions, surface: &mut dyn PageSurface) -> Result<()> {
    Painter::new(document, options).paint(surface)
}

/// Walks pages and blocks, issuing draw calls.
pub struct Painter<'a> {
    document: &'a Document,
    options: &'a LayoutOptions,
}

impl<'a> Painter<'a> {
    /// Create a painter.
    pub fn new(document: &'a Document, options: &'a LayoutOptions) -> Self {
        Self { document, options }
    }

    /// Paint every page.
    ///
    /// Fails if the surface did not end up with one new page per document
    /// page.
    pub fn paint(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let start = surface.page_count();
        for page in self.document.pages() {
            let handle = surface.new_page(page.width(), page.height());

            if let Some(header) = page.header() {
                self.header(surface, handle, header)?;
            }
            for placed in page.blocks() {
                self.block(surface, handle, placed)?;
            }
            if let Some(footer) = page.footer() {
                self.footer(surface, handle, footer)?;
            }
        }

        let painted = surface.page_count().saturating_sub(start);
        if painted != self.document.page_count() as usize {
            return Err(Error::Render(format!(
                "surface has {} new pages, document has {}",
                painted,
                self.document.page_count()
            )));
        }
        Ok(())
    }

    fn body_style(&self) -> TextStyle {
        TextStyle::new(self.options.font.font_size)
    }

    /// Width of text at `size`, scaled from the body metrics.
    fn width_at(&self, text: &str, style: RunStyle, size: f32) -> f32 {
        self.options.font.width(text, style) * size / self.options.font.font_size
    }

    fn header(&self, surface: &mut dyn PageSurface, page: PageHandle, band: &Band) -> Result<()> {
        let mut y = band.y;
        for (i, line) in band.lines.iter().enumerate() {
            let (style, size, run_style) = if i == 0 {
                (TextStyle::new(TITLE_SIZE).bold(), TITLE_SIZE, RunStyle::Bold)
            } else {
                (
                    TextStyle::new(SMALL_SIZE).with_color(Color::GREY),
                    SMALL_SIZE,
                    RunStyle::Plain,
                )
            };
            let x = band.x + (band.width - self.width_at(line, run_style, size)) / 2.0;
            surface.draw_text(page, x, y, line, &style)?;
            y += self.options.line_height * size / self.options.font.font_size;
        }
        let rule_y = band.y + band.height - 2.0;
        surface.draw_line(page, band.x, rule_y, band.x + band.width, rule_y, Color::GREY)
    }

    fn footer(&self, surface: &mut dyn PageSurface, page: PageHandle, band: &Band) -> Result<()> {
        surface.draw_line(page, band.x, band.y, band.x + band.width, band.y, Color::GREY)?;
        let style = TextStyle::new(SMALL_SIZE).with_color(Color::GREY);
        let mut y = band.y + 2.0;
        for line in &band.lines {
            let x = band.x + (band.width - self.width_at(line, RunStyle::Plain, SMALL_SIZE)) / 2.0;
            surface.draw_text(page, x, y, line, &style)?;
            y += self.options.line_height;
        }
        Ok(())
    }

    fn block(&self, surface: &mut dyn PageSurface, page: PageHandle, placed: &PlacedBlock) -> Result<()> {
        let block = &placed.block;
        let (x, y) = (placed.x, placed.y);
        let opts = self.options;

        if let BlockBody::Divider { label } = &block.body {
            return self.divider(surface, page, placed, label);
        }

        let outline = match block.alignment {
            Alignment::Right => Color::OWN_BUBBLE,
            Alignment::Left => Color::OTHER_BUBBLE,
        };
        draw_rect(surface, page, x, y, block.width, block.height, outline)?;

        let inner_x = x + opts.horizontal_padding;
        let inner_width = block.width - 2.0 * opts.horizontal_padding;
        let mut cursor = y + opts.bubble_padding;

        if let Some(sender) = &block.sender_label {
            surface.draw_text(page, inner_x, cursor, sender, &self.body_style().bold())?;
            if let Some(time) = &block.timestamp_label {
                let time_x = inner_x + inner_width - opts.font.width(time, RunStyle::Plain);
                let style = self.body_style().with_color(Color::GREY);
                surface.draw_text(page, time_x, cursor, time, &style)?;
            }
            cursor += opts.meta_row_height;
        }

        match &block.body {
            BlockBody::Message {
                reply_context,
                lines,
                reactions,
            } => {
                if let Some(reply) = reply_context {
                    let style = self.body_style().italic().with_color(Color::GREY);
                    surface.draw_text(page, inner_x, cursor, reply, &style)?;
                    cursor += opts.reply_row_height;
                }
                cursor = self.lines(surface, page, inner_x, cursor, lines)?;
                if let Some(reactions) = reactions {
                    let style = self.body_style().with_color(Color::GREY);
                    surface.draw_text(page, inner_x, cursor, reactions, &style)?;
                }
            }
            BlockBody::Call { lines } => {
                self.lines(surface, page, inner_x, cursor, lines)?;
            }
            BlockBody::Media(media) => {
                self.media(surface, page, inner_x, cursor, inner_width, media)?;
            }
            BlockBody::Divider { .. } => {}
        }
        Ok(())
    }

    fn divider(&self, surface: &mut dyn PageSurface, page: PageHandle, placed: &PlacedBlock, label: &str) -> Result<()> {
        let opts = self.options;
        let label_width = opts.font.width(label, RunStyle::Bold);
        let left = placed.x;
        let right = placed.x + placed.block.width;
        let label_x = left + (placed.block.width - label_width) / 2.0;
        let mid_y = placed.y + placed.block.height / 2.0;

        surface.draw_line(page, left, mid_y, (label_x - 3.0).max(left), mid_y, Color::GREY)?;
        surface.draw_line(page, (label_x + label_width + 3.0).min(right), mid_y, right, mid_y, Color::GREY)?;
        let style = self.body_style().bold().with_color(Color::GREY);
        surface.draw_text(page, label_x, mid_y - opts.line_height / 2.0, label, &style)
    }

    /// Draw wrapped lines from `y`; returns the y below the last line.
    fn lines(&self, surface: &mut dyn PageSurface, page: PageHandle, x: f32, y: f32, lines: &[WrappedLine]) -> Result<f32> {
        let mut line_y = y;
        for line in lines {
            let mut run_x = x;
            for run in &line.runs {
                run_x += self.run(surface, page, run_x, line_y, run)?;
            }
            line_y += self.options.line_height;
        }
        Ok(line_y)
    }

    /// Draw one run; returns its width.
    fn run(&self, surface: &mut dyn PageSurface, page: PageHandle, x: f32, y: f32, run: &InlineRun) -> Result<f32> {
        let opts = self.options;
        let width = opts.font.width(run.text(), run.style());
        let base = self.body_style();

        let style = match run.style() {
            RunStyle::Bold => base.bold(),
            RunStyle::Italic => base.italic(),
            RunStyle::Link => base.with_color(Color::LINK),
            RunStyle::Plain | RunStyle::Underline | RunStyle::Strikethrough => base,
        };
        surface.draw_text(page, x, y, run.text(), &style)?;

        let underline_y = y + opts.line_height * 0.85;
        match run {
            InlineRun::Underline { .. } => {
                surface.draw_line(page, x, underline_y, x + width, underline_y, Color::BLACK)?;
            }
            InlineRun::Strikethrough { .. } => {
                let strike_y = y + opts.line_height * 0.5;
                surface.draw_line(page, x, strike_y, x + width, strike_y, Color::BLACK)?;
            }
            InlineRun::Hyperlink { url, .. } => {
                surface.draw_line(page, x, underline_y, x + width, underline_y, Color::LINK)?;
                surface.draw_link(page, x, y, width, opts.line_height, url)?;
            }
            _ => {}
        }
        Ok(width)
    }

    fn media(
        &self,
        surface: &mut dyn PageSurface,
        page: PageHandle,
        x: f32,
        y: f32,
        width: f32,
        media: &MediaDescriptor,
    ) -> Result<()> {
        let opts = self.options;

        match &media.rendering {
            MediaRendering::Embedded {
                resource_id,
                width: image_width,
                height,
            } => {
                let resource = self.document.get_resource(resource_id).ok_or_else(|| {
                    Error::Render(format!("missing resource {}", resource_id))
                })?;
                surface.draw_image(page, x, y, *image_width, *height, &resource.data)?;
            }
            MediaRendering::Placeholder { height } => {
                draw_rect(surface, page, x, y, width, *height, Color::GREY)?;
                let label_width = opts.font.width(&media.label, RunStyle::Plain);
                let label_x = x + ((width - label_width) / 2.0).max(0.0);
                let label_y = y + (height - opts.line_height) / 2.0;
                let style = self.body_style().with_color(Color::GREY);
                surface.draw_text(page, label_x, label_y, &media.label, &style)?;
            }
        }

        let link_y = y + media.rendering.height();
        let link_width = opts.font.width(&media.link_text, RunStyle::Link);
        let style = self.body_style().with_color(Color::LINK);
        surface.draw_text(page, x, link_y, &media.link_text, &style)?;
        surface.draw_link(page, x, link_y, link_width, opts.link_row_height, &media.link_url)
    }
}
