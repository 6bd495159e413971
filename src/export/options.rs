//! Export configuration.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{Error, Result};
use crate::layout::{LayoutOptions, TieBreak, Viewer};

/// Output artifact format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Draw-operation log as JSON
    #[default]
    Json,

    /// Monospaced plain text
    Text,
}

impl OutputFormat {
    /// Parse a format name ("json" or "text"/"txt").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

/// Options for one transcript export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Application name used in file names and footers
    pub app_name: String,

    /// Chat or conversation identifier
    pub subject_id: String,

    /// Whose perspective to render from
    pub viewer: Viewer,

    /// Embed image attachments instead of placeholders
    pub include_media: bool,

    /// Output format
    pub format: OutputFormat,

    /// Offset used for calendar dates and time labels
    pub utc_offset: FixedOffset,

    /// Export timestamp; `None` means now
    pub exported_at: Option<DateTime<Utc>>,

    /// Header title; defaults to "Chat transcript: <subject>"
    pub header_title: Option<String>,

    /// Ordering of a message and a call with the same timestamp
    pub tie_break: TieBreak,

    /// Fetch media on the rayon pool
    pub parallel_media: bool,

    /// Add `download=1` to media links
    pub force_download_links: bool,

    /// Page geometry and metrics
    pub layout: LayoutOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            app_name: "Chatdoc".to_string(),
            subject_id: "chat".to_string(),
            viewer: Viewer::Observer,
            include_media: false,
            format: OutputFormat::Json,
            utc_offset: crate::layout::utc(),
            exported_at: None,
            header_title: None,
            tie_break: TieBreak::default(),
            parallel_media: true,
            force_download_links: true,
            layout: LayoutOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the chat identifier.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    /// Set the viewer.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    /// Enable or disable embedded images.
    pub fn with_media(mut self, include: bool) -> Self {
        self.include_media = include;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the offset for dates and times.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Pin the export timestamp.
    pub fn with_exported_at(mut self, at: DateTime<Utc>) -> Self {
        self.exported_at = Some(at);
        self
    }

    /// Override the header title.
    pub fn with_header_title(mut self, title: impl Into<String>) -> Self {
        self.header_title = Some(title.into());
        self
    }

    /// Set the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Enable or disable parallel media prefetch.
    pub fn with_parallel_media(mut self, parallel: bool) -> Self {
        self.parallel_media = parallel;
        self
    }

    /// Enable or disable download-forced media links.
    pub fn with_forced_downloads(mut self, force: bool) -> Self {
        self.force_download_links = force;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Header title line.
    pub fn title(&self) -> String {
        self.header_title
            .clone()
            .unwrap_or_else(|| format!("Chat transcript: {}", self.subject_id))
    }

    /// Export timestamp, falling back to the current time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.exported_at.unwrap_or_else(Utc::now)
    }

    /// Check options before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(Error::InvalidOptions("app name is empty".to_string()));
        }
        if self.subject_id.trim().is_empty() {
            return Err(Error::InvalidOptions("subject id is empty".to_string()));
        }
        if let Viewer::Participant(id) = &self.viewer {
            if id.is_empty() {
                return Err(Error::InvalidOptions("viewer id is empty".to_string()));
            }
        }
        self.layout.validate()
    }
}

/// Parse a UTC offset written as `Z`, `UTC`, `+HH:MM`, `-HH:MM` or `+HHMM`.
pub fn parse_utc_offset(text: &str) -> Result<FixedOffset> {
    let invalid = || Error::InvalidOptions(format!("invalid UTC offset: {}", text));
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(crate::layout::utc());
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
