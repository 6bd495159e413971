//! Inline markup parsing for message bodies.
//!
//! Recognizes `**bold**`, `*italic*`, `__underline__` and `~~strikethrough~~`,
//! then detects links in the unstyled gaps. Overlapping spans are resolved by
//! position: the span that starts first wins, whatever its style. When two
//! spans start at the same offset, the earlier pattern in the list above wins.

use regex::Regex;

use super::LinkDetector;
use crate::model::{InlineRun, RunStyle};

/// A delimiter pair match before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SpanMatch {
    start: usize,
    end: usize,
    inner: String,
    style: RunStyle,
}

impl SpanMatch {
    fn overlaps(&self, other: &SpanMatch) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Turns a raw message string into styled runs.
pub struct MarkupParser {
    patterns: Vec<(RunStyle, Regex)>,
    links: LinkDetector,
}

impl MarkupParser {
    /// Create a new parser.
    pub fn new() -> Self {
        let patterns = [
            (RunStyle::Bold, r"\*\*(.+?)\*\*"),
            (RunStyle::Italic, r"\*([^\s*](?:[^*]*[^\s*])?)\*"),
            (RunStyle::Underline, r"__(.+?)__"),
            (RunStyle::Strikethrough, r"~~(.+?)~~"),
        ]
        .into_iter()
        .map(|(style, pattern)| (style, Regex::new(pattern).expect("markup pattern is valid")))
        .collect();

        Self {
            patterns,
            links: LinkDetector::new(),
        }
    }

    /// Parse `raw` into runs. Never fails; unmatched delimiters stay literal.
    pub fn parse(&self, raw: &str) -> Vec<InlineRun> {
        if raw.is_empty() {
            return Vec::new();
        }

        let accepted = resolve_overlaps(self.collect_matches(raw));
        let mut runs = Vec::new();
        let mut last = 0;

        for span in accepted {
            if span.start > last {
                runs.extend(self.links.split(&raw[last..span.start]));
            }
            runs.push(InlineRun::styled(span.style, span.inner));
            last = span.end;
        }

        if last < raw.len() {
            runs.extend(self.links.split(&raw[last..]));
        }

        runs
    }

    /// Scan once per pattern, in precedence order.
    fn collect_matches(&self, text: &str) -> Vec<SpanMatch> {
        let mut matches = Vec::new();
        for (style, pattern) in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                matches.push(SpanMatch {
                    start: whole.start(),
                    end: whole.end(),
                    inner: inner.as_str().to_string(),
                    style: *style,
                });
            }
        }
        matches
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep spans in start order, dropping any that overlap an accepted one.
///
/// The sort is stable, so ties keep pattern precedence order.
fn resolve_overlaps(mut matches: Vec<SpanMatch>) -> Vec<SpanMatch> {
    matches.sort_by_key(|m| m.start);

    let mut accepted: Vec<SpanMatch> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if accepted.iter().all(|kept| !kept.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plain_text;

    #[test]
    fn test_bold_then_link() {
        let parser = MarkupParser::new();
        let runs = parser.parse("**Hello** visit www.example.com");
        assert_eq!(
            runs,
            vec![
                InlineRun::bold("Hello"),
                InlineRun::plain(" visit "),
                InlineRun::hyperlink("www.example.com", "https://www.example.com"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(MarkupParser::new().parse("").is_empty());
    }

    #[test]
    fn test_all_styles() {
        let parser = MarkupParser::new();
        let runs = parser.parse("a **b** *c* __d__ ~~e~~");
        assert_eq!(
            runs,
            vec![
                InlineRun::plain("a "),
                InlineRun::bold("b"),
                InlineRun::plain(" "),
                InlineRun::italic("c"),
                InlineRun::plain(" "),
                InlineRun::underline("d"),
                InlineRun::plain(" "),
                InlineRun::strikethrough("e"),
            ]
        );
    }

    #[test]
    fn test_unclosed_delimiter_is_literal() {
        let parser = MarkupParser::new();
        assert_eq!(parser.parse("**open"), vec![InlineRun::plain("**open")]);
        assert_eq!(parser.parse("~~half~"), vec![InlineRun::plain("~~half~")]);
    }

    #[test]
    fn test_earlier_start_wins_over_precedence() {
        let parser = MarkupParser::new();
        // the underline span starts before the bold one and swallows it
        let runs = parser.parse("__x **y__ z**");
        assert_eq!(runs[0], InlineRun::underline("x **y"));
        assert_eq!(runs[1], InlineRun::plain(" z**"));
    }

    #[test]
    fn test_nested_markup_not_split() {
        let parser = MarkupParser::new();
        let runs = parser.parse("**bold *inner* text**");
        assert_eq!(runs, vec![InlineRun::bold("bold *inner* text")]);
    }

    #[test]
    fn test_links_not_scanned_inside_styles() {
        let parser = MarkupParser::new();
        let runs = parser.parse("**www.example.com**");
        assert_eq!(runs, vec![InlineRun::bold("www.example.com")]);
    }

    #[test]
    fn test_arithmetic_is_not_italic() {
        let parser = MarkupParser::new();
        let runs = parser.parse("2 * 3 * 4");
        assert_eq!(runs, vec![InlineRun::plain("2 * 3 * 4")]);
    }

    #[test]
    fn test_content_round_trip() {
        let parser = MarkupParser::new();
        let cases = [
            ("**Hello** visit www.example.com", "Hello visit www.example.com"),
            ("plain words only", "plain words only"),
            ("__u__ and ~~s~~ and *i*", "u and s and i"),
            ("price: **$450k** see zillow.com!", "price: $450k see zillow.com!"),
        ];
        for (input, expected) in cases {
            assert_eq!(plain_text(&parser.parse(input)), expected, "input: {}", input);
        }
    }
}
