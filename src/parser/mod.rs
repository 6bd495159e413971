//! Message text parsing.
//!
//! Raw message bodies carry a small markup dialect plus free-form links.
//! [`MarkupParser`] turns them into flat [`InlineRun`] lists.

mod links;
mod markup;

pub use links::{resolve_url, LinkDetector, LinkMatch};
pub use markup::MarkupParser;

use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

use crate::model::InlineRun;

/// Parse markup with a shared parser instance.
pub fn parse(raw: &str) -> Vec<InlineRun> {
    static PARSER: OnceLock<MarkupParser> = OnceLock::new();
    PARSER.get_or_init(MarkupParser::new).parse(raw)
}

/// NFC-normalize raw text and unify line endings.
pub fn normalize(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").nfc().collect()
}
