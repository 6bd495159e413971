//! Per-export media prefetch.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;

use rayon::prelude::*;

use super::MediaResolver;

/// A fetched image with its probed size.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    /// Encoded image bytes
    pub bytes: Arc<Vec<u8>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// MIME type of the detected format
    pub mime_type: String,
}

/// Outcome of fetching one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEntry {
    /// Bytes fetched and recognized as an image
    Ready(FetchedImage),
    /// Fetch or decode failed
    Failed(String),
}

/// URL to fetched image, resolved before any block is built.
///
/// Each export owns its cache; nothing is shared between exports.
#[derive(Debug, Clone, Default)]
pub struct MediaCache {
    entries: HashMap<String, MediaEntry>,
}

impl MediaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch every distinct URL once.
    pub fn prefetch<'a, I>(urls: I, resolver: &dyn MediaResolver, parallel: bool) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = urls.into_iter().filter(|url| seen.insert(*url)).collect();

        let fetch = |url: &&str| -> (String, MediaEntry) {
            let entry = match resolver.resolve(url) {
                Some(bytes) => match probe(bytes) {
                    Ok(image) => MediaEntry::Ready(image),
                    Err(reason) => MediaEntry::Failed(reason),
                },
                None => MediaEntry::Failed("not available".to_string()),
            };
            (url.to_string(), entry)
        };

        let entries: HashMap<String, MediaEntry> = if parallel {
            unique.par_iter().map(fetch).collect()
        } else {
            unique.iter().map(fetch).collect()
        };

        let cache = Self { entries };
        log::debug!(
            "prefetched {} media urls ({} ready, {} failed)",
            cache.len(),
            cache.ready_count(),
            cache.len() - cache.ready_count()
        );
        cache
    }

    /// Insert an entry directly.
    pub fn insert(&mut self, url: impl Into<String>, entry: MediaEntry) {
        self.entries.insert(url.into(), entry);
    }

    /// Look up a URL.
    pub fn get(&self, url: &str) -> Option<&MediaEntry> {
        self.entries.get(url)
    }

    /// Number of URLs fetched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was fetched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of URLs that produced an image.
    pub fn ready_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, MediaEntry::Ready(_)))
            .count()
    }
}

/// Detect the format and read the dimensions without decoding pixels.
pub fn probe(bytes: Vec<u8>) -> Result<FetchedImage, String> {
    let (width, height, mime_type) = {
        let reader = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| format!("format: {e}"))?;
        let format = reader
            .format()
            .ok_or_else(|| "unrecognized image format".to_string())?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| format!("decode: {e}"))?;
        (width, height, format.to_mime_type().to_string())
    };

    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }

    Ok(FetchedImage {
        bytes: Arc::new(bytes),
        width,
        height,
        mime_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_probe_png() {
        let image = probe(png(40, 20)).unwrap();
        assert_eq!((image.width, image.height), (40, 20));
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_probe_garbage() {
        assert!(probe(b"not an image".to_vec()).is_err());
    }

    #[test]
    fn test_prefetch_dedupes_and_records_failures() {
        let calls = AtomicUsize::new(0);
        let bytes = png(8, 8);
        let resolver = |url: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            (url == "https://x.test/a.png").then(|| bytes.clone())
        };

        let urls = [
            "https://x.test/a.png",
            "https://x.test/a.png",
            "https://x.test/missing.png",
        ];
        for parallel in [false, true] {
            calls.store(0, Ordering::SeqCst);
            let cache = MediaCache::prefetch(urls, &resolver, parallel);
            assert_eq!(calls.load(Ordering::SeqCst), 2);
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.ready_count(), 1);
            assert!(matches!(
                cache.get("https://x.test/missing.png"),
                Some(MediaEntry::Failed(_))
            ));
        }
    }
}
