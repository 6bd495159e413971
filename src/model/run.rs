//! Styled text runs and wrapped lines.

use serde::Serialize;

/// A contiguous span of message text carrying one style.
///
/// Runs are leaves: styles never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum InlineRun {
    /// Unstyled text
    PlainText {
        /// Text content
        text: String,
    },
    /// `**bold**`
    Bold {
        /// Text content
        text: String,
    },
    /// `*italic*`
    Italic {
        /// Text content
        text: String,
    },
    /// `__underline__`
    Underline {
        /// Text content
        text: String,
    },
    /// `~~strikethrough~~`
    Strikethrough {
        /// Text content
        text: String,
    },
    /// A detected link
    Hyperlink {
        /// Text as written in the message
        text: String,
        /// Link target with a scheme
        url: String,
    },
}

impl InlineRun {
    /// Create a plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        InlineRun::PlainText { text: text.into() }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        InlineRun::Bold { text: text.into() }
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        InlineRun::Italic { text: text.into() }
    }

    /// Create an underlined run.
    pub fn underline(text: impl Into<String>) -> Self {
        InlineRun::Underline { text: text.into() }
    }

    /// Create a struck-through run.
    pub fn strikethrough(text: impl Into<String>) -> Self {
        InlineRun::Strikethrough { text: text.into() }
    }

    /// Create a hyperlink run.
    pub fn hyperlink(text: impl Into<String>, url: impl Into<String>) -> Self {
        InlineRun::Hyperlink {
            text: text.into(),
            url: url.into(),
        }
    }

    /// Create a run of the given style.
    ///
    /// Links need a target, so `RunStyle::Link` falls back to plain text;
    /// use [`InlineRun::with_text`] to split an existing link.
    pub fn styled(style: RunStyle, text: impl Into<String>) -> Self {
        let text = text.into();
        match style {
            RunStyle::Plain | RunStyle::Link => InlineRun::PlainText { text },
            RunStyle::Bold => InlineRun::Bold { text },
            RunStyle::Italic => InlineRun::Italic { text },
            RunStyle::Underline => InlineRun::Underline { text },
            RunStyle::Strikethrough => InlineRun::Strikethrough { text },
        }
    }

    /// Displayed text of the run.
    pub fn text(&self) -> &str {
        match self {
            InlineRun::PlainText { text }
            | InlineRun::Bold { text }
            | InlineRun::Italic { text }
            | InlineRun::Underline { text }
            | InlineRun::Strikethrough { text }
            | InlineRun::Hyperlink { text, .. } => text,
        }
    }

    /// Style tag of the run.
    pub fn style(&self) -> RunStyle {
        match self {
            InlineRun::PlainText { .. } => RunStyle::Plain,
            InlineRun::Bold { .. } => RunStyle::Bold,
            InlineRun::Italic { .. } => RunStyle::Italic,
            InlineRun::Underline { .. } => RunStyle::Underline,
            InlineRun::Strikethrough { .. } => RunStyle::Strikethrough,
            InlineRun::Hyperlink { .. } => RunStyle::Link,
        }
    }

    /// Link target, for hyperlinks.
    pub fn url(&self) -> Option<&str> {
        match self {
            InlineRun::Hyperlink { url, .. } => Some(url),
            _ => None,
        }
    }

    /// A run with the same style (and link target) but different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        match self {
            InlineRun::Hyperlink { url, .. } => InlineRun::Hyperlink {
                text: text.into(),
                url: url.clone(),
            },
            other => InlineRun::styled(other.style(), text),
        }
    }

    /// Check if this run is a hyperlink.
    pub fn is_link(&self) -> bool {
        matches!(self, InlineRun::Hyperlink { .. })
    }

    /// Check if this run has no text.
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// Style tag of a run, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStyle {
    /// Unstyled
    Plain,
    /// Bold weight
    Bold,
    /// Italic
    Italic,
    /// Underlined
    Underline,
    /// Struck through
    Strikethrough,
    /// Clickable link
    Link,
}

impl RunStyle {
    /// Check if text in this style is set in the bold face.
    pub fn is_bold(&self) -> bool {
        matches!(self, RunStyle::Bold)
    }
}

/// One output line of wrapped runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedLine {
    /// Run fragments in reading order
    pub runs: Vec<InlineRun>,

    /// Measured width of all fragments
    pub width: f32,
}

impl WrappedLine {
    /// Create a line from runs and their measured width.
    pub fn new(runs: Vec<InlineRun>, width: f32) -> Self {
        Self { runs, width }
    }

    /// Plain text of the line.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(InlineRun::text).collect()
    }

    /// Check if the line has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Concatenate the text of runs, dropping style.
pub fn plain_text(runs: &[InlineRun]) -> String {
    runs.iter().map(InlineRun::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_text_keeps_style() {
        let link = InlineRun::hyperlink("www.example.com", "https://www.example.com");
        let part = link.with_text("www.");
        assert_eq!(part.url(), Some("https://www.example.com"));
        assert_eq!(part.text(), "www.");

        let bold = InlineRun::bold("Hello world");
        assert_eq!(bold.with_text("world"), InlineRun::bold("world"));
    }

    #[test]
    fn test_plain_text() {
        let runs = vec![
            InlineRun::bold("Hello"),
            InlineRun::plain(" "),
            InlineRun::italic("there"),
        ];
        assert_eq!(plain_text(&runs), "Hello there");
    }

    #[test]
    fn test_style_tags() {
        assert_eq!(InlineRun::strikethrough("x").style(), RunStyle::Strikethrough);
        assert!(RunStyle::Bold.is_bold());
        assert!(!RunStyle::Link.is_bold());
    }
}
