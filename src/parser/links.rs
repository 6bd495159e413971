//! Hyperlink detection inside plain text.

use regex::Regex;

use crate::model::InlineRun;

/// Top-level domains accepted for bare `example.com` style links.
const BARE_TLDS: &str = "com|org|net|io|co|dev|app|ai|edu|gov|info|biz|me|ly|us|uk|in|ca|au|de|fr|es|it|nl|xyz|site|online|store|tech|realty|homes|house|estate|properties";

/// Characters trimmed from the end of a detected link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ']', '\'', '"'];

/// A link found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset after the last character
    pub end: usize,
    /// Link text as written
    pub text: String,
    /// Target with a scheme
    pub url: String,
}

/// Finds `http(s)://…`, `www.…` and bare domain links.
pub struct LinkDetector {
    pattern: Regex,
}

impl LinkDetector {
    /// Create a new link detector.
    pub fn new() -> Self {
        let pattern = format!(
            r#"(?i)\b(?:https?://[^\s<>"']+|www\.[^\s<>"']+|(?:[a-z0-9](?:[a-z0-9-]{{0,61}}[a-z0-9])?\.)+(?:{})\b(?:/[^\s<>"']*)?)"#,
            BARE_TLDS
        );
        Self {
            pattern: Regex::new(&pattern).expect("link pattern is valid"),
        }
    }

    /// Find all links in `text`, in order.
    pub fn find_links(&self, text: &str) -> Vec<LinkMatch> {
        let mut links = Vec::new();

        for m in self.pattern.find_iter(text) {
            // user@mail.com is an address, not a link
            if text[..m.start()].ends_with('@') {
                continue;
            }

            let trimmed = trim_trailing_punctuation(m.as_str());
            if trimmed.is_empty() || !trimmed.contains('.') {
                continue;
            }

            links.push(LinkMatch {
                start: m.start(),
                end: m.start() + trimmed.len(),
                text: trimmed.to_string(),
                url: resolve_url(trimmed),
            });
        }

        links
    }

    /// Split plain text into plain and hyperlink runs.
    pub fn split(&self, text: &str) -> Vec<InlineRun> {
        let mut runs = Vec::new();
        let mut last = 0;

        for link in self.find_links(text) {
            if link.start > last {
                runs.push(InlineRun::plain(&text[last..link.start]));
            }
            last = link.end;
            runs.push(InlineRun::hyperlink(link.text, link.url));
        }

        if last < text.len() {
            runs.push(InlineRun::plain(&text[last..]));
        }

        runs
    }
}

impl Default for LinkDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Prepend `https://` unless the link already has a scheme.
pub fn resolve_url(link: &str) -> String {
    let lower = link.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    }
}

/// Drop sentence punctuation glued to the end of a link.
///
/// A closing parenthesis is kept when the link itself opened one.
fn trim_trailing_punctuation(link: &str) -> &str {
    let mut end = link.len();
    loop {
        let current = &link[..end];
        let Some(last) = current.chars().last() else {
            return current;
        };
        let strip = TRAILING_PUNCTUATION.contains(&last) || (last == ')' && !current.contains('('));
        if !strip {
            return current;
        }
        end -= last.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_www_link() {
        let detector = LinkDetector::new();
        let links = detector.find_links("visit www.example.com");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "www.example.com");
        assert_eq!(links[0].url, "https://www.example.com");
        assert_eq!(links[0].start, 6);
    }

    #[test]
    fn test_scheme_link_kept() {
        let detector = LinkDetector::new();
        let links = detector.find_links("see http://listing.test/a?b=1, thanks");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "http://listing.test/a?b=1");
        assert_eq!(links[0].url, "http://listing.test/a?b=1");
    }

    #[test]
    fn test_bare_domain() {
        let detector = LinkDetector::new();
        let links = detector.find_links("Check zillow.com/homes/123 now.");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "zillow.com/homes/123");
        assert_eq!(links[0].url, "https://zillow.com/homes/123");
    }

    #[test]
    fn test_trailing_punctuation() {
        let detector = LinkDetector::new();
        let links = detector.find_links("Go to www.example.com.");
        assert_eq!(links[0].text, "www.example.com");

        let links = detector.find_links("(see https://example.com/x)");
        assert_eq!(links[0].text, "https://example.com/x");

        let links = detector.find_links("https://en.wikipedia.org/wiki/Loft_(housing)");
        assert_eq!(links[0].text, "https://en.wikipedia.org/wiki/Loft_(housing)");
    }

    #[test]
    fn test_email_not_link() {
        let detector = LinkDetector::new();
        assert!(detector.find_links("mail agent@realty.com").is_empty());
    }

    #[test]
    fn test_no_link_in_plain_words() {
        let detector = LinkDetector::new();
        assert!(detector.find_links("the file notes.txt is 2.5 MB").is_empty());
    }

    #[test]
    fn test_split() {
        let detector = LinkDetector::new();
        let runs = detector.split(" visit www.example.com");
        assert_eq!(
            runs,
            vec![
                InlineRun::plain(" visit "),
                InlineRun::hyperlink("www.example.com", "https://www.example.com"),
            ]
        );
    }
}
