//! # chatdoc
//!
//! Export chat transcripts into paginated documents.
//!
//! Messages and call records are merged into one timeline, message bodies
//! are parsed for lightweight markup and links, wrapped into bubbles, and
//! placed onto fixed-size pages with a header on the first page and a
//! numbered footer on every page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chatdoc::{export_transcript, ExportOptions, Transcript, Viewer};
//!
//! fn main() -> chatdoc::Result<()> {
//!     let json = std::fs::read_to_string("chat.json")?;
//!     let transcript = Transcript::from_json(&json)?;
//!
//!     let options = ExportOptions::new()
//!         .with_app_name("Homely")
//!         .with_subject("deal-42")
//!         .with_viewer(Viewer::participant("u1"));
//!     let result = export_transcript(&transcript, options)?;
//!     println!("{} ({} pages)", result.filename, result.page_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Inline markup**: `**bold**`, `*italic*`, `__underline__`, `~~strike~~`
//!   and automatic hyperlinks
//! - **Timeline merge**: messages and calls in one chronological stream with
//!   date dividers
//! - **Media**: images embedded at scaled size, placeholders otherwise
//! - **Pagination**: groups never split, footers carry the final page count
//! - **Surfaces**: JSON draw log or plain text; any backend can implement
//!   [`surface::PageSurface`]
//! - **Parallel processing**: media prefetch and batch export use Rayon

pub mod error;
pub mod export;
pub mod layout;
pub mod media;
pub mod model;
pub mod parser;
pub mod render;
pub mod surface;

// Re-export commonly used types
pub use error::{Error, Result, Warning};
pub use export::{ExportOptions, ExportResult, ExportStats, Exporter, OutputFormat};
pub use layout::{LayoutOptions, TieBreak, Viewer};
pub use media::{DirectoryResolver, MediaResolver, NoMedia};
pub use model::{
    Attachment, AttachmentKind, CallEvent, CallStatus, CallType, Document, InlineRun, Message,
    Metadata, Page, Reaction, Transcript,
};
pub use render::JsonFormat;

/// Export a transcript without media resolution.
///
/// Image attachments fall back to placeholders unless a resolver is given;
/// see [`export_transcript_with`].
///
/// # Example
///
/// ```no_run
/// use chatdoc::{export_transcript, ExportOptions, Transcript};
///
/// let transcript = Transcript::from_json(r#"{"messages": []}"#).unwrap();
/// let result = export_transcript(&transcript, ExportOptions::default()).unwrap();
/// assert_eq!(result.page_count(), 1);
/// ```
pub fn export_transcript(transcript: &Transcript, options: ExportOptions) -> Result<ExportResult> {
    Exporter::new(options).export(transcript)
}

/// Export a transcript, fetching media through `resolver`.
pub fn export_transcript_with(
    transcript: &Transcript,
    options: ExportOptions,
    resolver: &dyn MediaResolver,
) -> Result<ExportResult> {
    Exporter::new(options)
        .with_resolver(resolver)
        .export(transcript)
}

/// Lay out a transcript and dump the result as JSON.
///
/// Useful for inspecting block sizes and page breaks.
pub fn layout_json(transcript: &Transcript, options: ExportOptions, format: JsonFormat) -> Result<String> {
    let (document, _) = Exporter::new(options).build_document(transcript)?;
    render::to_json(&document, format)
}

/// Parse a message body into styled runs.
///
/// # Example
///
/// ```
/// use chatdoc::{parse_markup, InlineRun};
///
/// let runs = parse_markup("**Hello** visit www.example.com");
/// assert_eq!(runs[0], InlineRun::bold("Hello"));
/// ```
pub fn parse_markup(raw: &str) -> Vec<InlineRun> {
    parser::parse(&parser::normalize(raw))
}
