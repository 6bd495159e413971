//! Transcript export pipeline.
//!
//! An export merges the transcript into one timeline, prefetches media,
//! builds and paginates blocks, stamps headers and footers, and paints the
//! result onto a page surface whose bytes become the artifact.
//!
//! # Example
//!
//! ```no_run
//! use chatdoc::export::{ExportOptions, Exporter, OutputFormat};
//! use chatdoc::layout::Viewer;
//! use chatdoc::model::Transcript;
//!
//! fn main() -> chatdoc::Result<()> {
//!     let transcript = Transcript::from_json(&std::fs::read_to_string("chat.json")?)?;
//!     let options = ExportOptions::new()
//!         .with_subject("deal-42")
//!         .with_viewer(Viewer::participant("u1"))
//!         .with_format(OutputFormat::Text);
//!
//!     let result = Exporter::new(options).export(&transcript)?;
//!     result.write_to(".")?;
//!     Ok(())
//! }
//! ```

mod options;
mod result;

pub use options::{parse_utc_offset, ExportOptions, OutputFormat};
pub use result::{ExportResult, ExportStats};

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;

use crate::error::{Result, Warning};
use crate::layout::{
    standard_footer, BlockBuilder, DocumentFinalizer, PaginationEngine, TimelineMerger, Viewer,
};
use crate::media::{MediaCache, MediaResolver, NoMedia};
use crate::model::{Document, LayoutBlock, Metadata, TimelineEntry, TimelineItem, Transcript};
use crate::render::paint;
use crate::surface::{PageSurface, RecordingSurface, TextSurface};

/// Runs exports with fixed options and a media resolver.
pub struct Exporter<'r> {
    options: ExportOptions,
    resolver: &'r dyn MediaResolver,
}

impl Exporter<'static> {
    /// Create an exporter that resolves no media.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            resolver: &NoMedia,
        }
    }
}

impl<'r> Exporter<'r> {
    /// Resolve media through `resolver`.
    pub fn with_resolver<'s>(self, resolver: &'s dyn MediaResolver) -> Exporter<'s> {
        Exporter {
            options: self.options,
            resolver,
        }
    }

    /// Get the export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Lay out a transcript into a finished document.
    ///
    /// Returns the document together with every warning recovered on the
    /// way. Fails only on invalid options.
    pub fn build_document(&self, transcript: &Transcript) -> Result<(Document, Vec<Warning>)> {
        self.build_document_at(transcript, self.options.timestamp())
    }

    fn build_document_at(
        &self,
        transcript: &Transcript,
        exported_at: DateTime<Utc>,
    ) -> Result<(Document, Vec<Warning>)> {
        let opts = &self.options;
        opts.validate()?;
        let layout = &opts.layout;

        let entries = TimelineMerger::new(opts.utc_offset)
            .with_tie_break(opts.tie_break)
            .merge_with_dividers(&transcript.messages, &transcript.calls);

        let cache = if opts.include_media {
            MediaCache::prefetch(image_urls(&entries), self.resolver, opts.parallel_media)
        } else {
            MediaCache::new()
        };

        let mut builder = BlockBuilder::new(layout, transcript, &cache)
            .with_viewer(opts.viewer.clone())
            .with_offset(opts.utc_offset)
            .with_media(opts.include_media)
            .with_forced_downloads(opts.force_download_links);
        let blocks: Vec<LayoutBlock> = entries.iter().map(|e| builder.build_entry(e)).collect();
        let (resources, mut warnings) = builder.into_parts();

        let pagination = PaginationEngine::new(layout).layout(blocks);
        warnings.extend(pagination.warnings);

        let mut metadata = Metadata::new(opts.title(), &opts.app_name, &opts.subject_id, exported_at);
        metadata.perspective = perspective(&opts.viewer);
        metadata.include_media = opts.include_media;
        metadata.message_count = count_items(&entries, TimelineItem::is_message);
        metadata.call_count = count_items(&entries, TimelineItem::is_call);

        let header = vec![opts.title(), self.subtitle(transcript)];
        let exported = exported_at
            .with_timezone(&opts.utc_offset)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let document = DocumentFinalizer::new(layout, metadata)
            .with_resources(resources)
            .finalize(
                pagination.pages,
                &header,
                standard_footer(&opts.app_name, &exported),
            );

        Ok((document, warnings))
    }

    /// Export a transcript into an artifact.
    pub fn export(&self, transcript: &Transcript) -> Result<ExportResult> {
        let exported_at = self.options.timestamp();
        let (document, warnings) = self.build_document_at(transcript, exported_at)?;

        let mut surface = self.surface();
        paint(&document, &self.options.layout, surface.as_mut())?;
        let bytes = surface.finish()?;

        let date = exported_at.with_timezone(&self.options.utc_offset).date_naive();
        let filename = file_name(
            &self.options.app_name,
            &self.options.subject_id,
            self.options.include_media,
            date,
            surface.extension(),
        );

        let mut stats = ExportStats::from_document(&document);
        stats.warning_count = warnings.len() as u32;
        log::debug!(
            "exported {}: {} pages, {} warnings",
            filename,
            stats.page_count,
            stats.warning_count
        );

        Ok(ExportResult {
            filename,
            bytes,
            mime_type: surface.mime_type(),
            metadata: document.metadata,
            stats,
            warnings,
        })
    }

    /// Export several chats in parallel.
    ///
    /// Each job is `(subject_id, transcript)` and gets its own cache,
    /// surface and layout state. Results are in job order.
    pub fn export_batch(&self, jobs: &[(&str, &Transcript)]) -> Vec<Result<ExportResult>> {
        jobs.par_iter()
            .map(|(subject, transcript)| {
                let options = self.options.clone().with_subject(*subject);
                Exporter {
                    options,
                    resolver: self.resolver,
                }
                .export(transcript)
            })
            .collect()
    }

    fn surface(&self) -> Box<dyn PageSurface> {
        match self.options.format {
            OutputFormat::Json => Box::new(RecordingSurface::new()),
            OutputFormat::Text => Box::new(TextSurface::with_column_width(
                self.options.layout.font.column_width(),
            )),
        }
    }

    /// Second header line: viewer and media mode.
    fn subtitle(&self, transcript: &Transcript) -> String {
        let viewer = match &self.options.viewer {
            Viewer::Participant(id) => format!("Viewed by {}", transcript.display_name(id)),
            Viewer::Observer => "Observer view".to_string(),
        };
        let media = if self.options.include_media {
            "images embedded"
        } else {
            "text only"
        };
        format!("{} | {}", viewer, media)
    }
}

/// Artifact file name `<app>_<subject>_<WithMedia|TextOnly>_<YYYY-MM-DD>.<ext>`.
///
/// Characters of the subject outside `[A-Za-z0-9-]` become `_`.
pub fn file_name(app_name: &str, subject_id: &str, with_media: bool, date: NaiveDate, ext: &str) -> String {
    let subject: String = subject_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mode = if with_media { "WithMedia" } else { "TextOnly" };
    format!("{}_{}_{}_{}.{}", app_name, subject, mode, date.format("%Y-%m-%d"), ext)
}

/// Image attachment URLs in timeline order.
fn image_urls(entries: &[TimelineEntry]) -> impl Iterator<Item = &str> {
    entries.iter().filter_map(|entry| match entry.item()? {
        TimelineItem::Message(msg) => msg
            .attachment
            .as_ref()
            .filter(|a| a.is_image())
            .map(|a| a.url.as_str()),
        TimelineItem::Call(_) => None,
    })
}

fn count_items(entries: &[TimelineEntry], pred: fn(&TimelineItem) -> bool) -> u32 {
    entries
        .iter()
        .filter_map(TimelineEntry::item)
        .filter(|item| pred(item))
        .count() as u32
}

fn perspective(viewer: &Viewer) -> String {
    match viewer {
        Viewer::Participant(id) => format!("participant:{}", id),
        Viewer::Observer => "observer".to_string(),
    }
}
