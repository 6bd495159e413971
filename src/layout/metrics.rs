//! Text measurement.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::model::RunStyle;

/// Millimetres per typographic point.
const MM_PER_POINT: f32 = 0.3528;

/// Measures the rendered width of text.
///
/// Implementations must be additive: the width of a string equals the sum
/// of the widths of its characters. The wrapper relies on this to split
/// runs without re-measuring.
pub trait TextMeasure: Send + Sync {
    /// Width of `text` set in `style`, in layout units.
    fn width(&self, text: &str, style: RunStyle) -> f32;
}

/// Average-advance font model.
///
/// Every display column is `font_size * advance_em` points wide; bold
/// text is widened by `bold_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontMetrics {
    /// Font size in points
    pub font_size: f32,

    /// Average glyph advance as a fraction of the em
    pub advance_em: f32,

    /// Width multiplier for bold text
    pub bold_factor: f32,
}

impl FontMetrics {
    /// Create metrics for a font size.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    /// Width of one display column in layout units.
    pub fn column_width(&self) -> f32 {
        self.font_size * self.advance_em * MM_PER_POINT
    }

    /// Check that all parameters are positive.
    pub fn validate(&self) -> Result<()> {
        if self.font_size > 0.0 && self.advance_em > 0.0 && self.bold_factor > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidOptions(
                "font metrics must be positive".to_string(),
            ))
        }
    }

    fn style_factor(&self, style: RunStyle) -> f32 {
        if style.is_bold() {
            self.bold_factor
        } else {
            1.0
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            advance_em: 0.5,
            bold_factor: 1.08,
        }
    }
}

impl TextMeasure for FontMetrics {
    fn width(&self, text: &str, style: RunStyle) -> f32 {
        text.width() as f32 * self.column_width() * self.style_factor(style)
    }
}

/// Shorten `text` with a trailing "..." so it fits in `max_width`.
pub fn truncate_to_width(
    measure: &dyn TextMeasure,
    text: &str,
    style: RunStyle,
    max_width: f32,
) -> String {
    if measure.width(text, style) <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let budget = max_width - measure.width(ellipsis, style);
    let mut used = 0.0;
    let mut out = String::new();
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        let w = measure.width(ch.encode_utf8(&mut buf), style);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push_str(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_is_additive() {
        let font = FontMetrics::default();
        let whole = font.width("Hello world", RunStyle::Plain);
        let parts = font.width("Hello ", RunStyle::Plain) + font.width("world", RunStyle::Plain);
        assert!((whole - parts).abs() < 1e-4);
        assert!((whole - 11.0 * font.column_width()).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let font = FontMetrics::default();
        let plain = font.width("abc", RunStyle::Plain);
        let bold = font.width("abc", RunStyle::Bold);
        assert!((bold - plain * 1.08).abs() < 1e-4);
        assert_eq!(font.width("abc", RunStyle::Link), plain);
    }

    #[test]
    fn test_wide_characters() {
        let font = FontMetrics::default();
        assert_eq!(font.width("日本", RunStyle::Plain), font.width("abcd", RunStyle::Plain));
    }

    #[test]
    fn test_truncate() {
        let font = FontMetrics::default();
        let text = "The quick brown fox jumps over the lazy dog";
        let max = font.column_width() * 12.0;
        let short = truncate_to_width(&font, text, RunStyle::Plain, max);
        assert!(short.ends_with("..."));
        assert!(font.width(&short, RunStyle::Plain) <= max + 1e-4);
        assert_eq!(truncate_to_width(&font, "fox", RunStyle::Plain, max), "fox");
    }
}
