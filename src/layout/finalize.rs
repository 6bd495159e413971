//! Header and footer stamping.
//!
//! Footers report the total page count, so they can only be written once
//! pagination has produced every page. This pass turns the mutable
//! [`PageBuilder`]s into immutable [`Page`]s and assembles the [`Document`].

use std::collections::BTreeMap;

use super::LayoutOptions;
use crate::model::{Band, Document, Metadata, Page, PageBuilder, Resource};

/// Second layout pass: stamps bands and freezes pages.
pub struct DocumentFinalizer<'a> {
    options: &'a LayoutOptions,
    metadata: Metadata,
    resources: BTreeMap<String, Resource>,
}

impl<'a> DocumentFinalizer<'a> {
    /// Create a finalizer for a document described by `metadata`.
    pub fn new(options: &'a LayoutOptions, metadata: Metadata) -> Self {
        Self {
            options,
            metadata,
            resources: BTreeMap::new(),
        }
    }

    /// Attach the embedded image resources.
    pub fn with_resources(mut self, resources: BTreeMap<String, Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// Stamp the header on page 1 and `footer(page, total)` on every page.
    pub fn finalize<F>(self, pages: Vec<PageBuilder>, header: &[String], footer: F) -> Document
    where
        F: Fn(u32, u32) -> String,
    {
        let total = pages.len() as u32;
        let finished: Vec<Page> = pages
            .into_iter()
            .map(|page| {
                let number = page.number();
                let header_band = if number == 1 {
                    self.header_band(header)
                } else {
                    None
                };
                let footer_band = self.footer_band(footer(number, total));
                page.finish(header_band, footer_band)
            })
            .collect();

        log::debug!("finalized {} pages", total);
        Document::new(self.metadata, finished, self.resources)
    }

    fn header_band(&self, lines: &[String]) -> Option<Band> {
        let opts = self.options;
        if opts.header_height <= 0.0 || lines.is_empty() {
            return None;
        }
        Some(Band::new(
            opts.left_margin,
            opts.top_margin,
            opts.content_width(),
            opts.header_height,
            lines.to_vec(),
        ))
    }

    /// Footer band centred vertically in the bottom margin.
    fn footer_band(&self, text: String) -> Option<Band> {
        let opts = self.options;
        if opts.footer_height <= 0.0 {
            return None;
        }
        let y = opts.content_bottom() + (opts.bottom_margin - opts.footer_height) / 2.0;
        Some(Band::new(
            opts.left_margin,
            y,
            opts.content_width(),
            opts.footer_height,
            vec![text],
        ))
    }
}

/// Footer text `Page i of n | <app> | Exported <when>`.
pub fn standard_footer<'s>(app_name: &'s str, exported: &'s str) -> impl Fn(u32, u32) -> String + 's {
    move |page, total| format!("Page {} of {} | {} | Exported {}", page, total, app_name, exported)
}
