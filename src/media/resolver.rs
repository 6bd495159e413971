//! Media byte sources.

use std::path::{Path, PathBuf};

/// Turns an attachment URL into raw bytes.
///
/// Returning `None` means the media is unavailable; the export degrades to
/// a placeholder and carries on.
pub trait MediaResolver: Sync {
    /// Fetch the bytes behind `url`.
    fn resolve(&self, url: &str) -> Option<Vec<u8>>;
}

impl<F> MediaResolver for F
where
    F: Fn(&str) -> Option<Vec<u8>> + Sync,
{
    fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        self(url)
    }
}

/// Resolver that never returns media.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMedia;

impl MediaResolver for NoMedia {
    fn resolve(&self, _url: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Looks up media in a local directory by the URL's file name.
///
/// `https://cdn.test/u/42/photo.jpg?sig=abc` resolves to `<root>/photo.jpg`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for `url`, if the URL names a plain file.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = file_name(url)?;
        Some(self.root.join(name))
    }
}

impl MediaResolver for DirectoryResolver {
    fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.path_for(url)?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::debug!("no local media for {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name(url: &str) -> Option<&str> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    let name = path.rsplit('/').next()?;

    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        None
    } else {
        Some(name)
    }
}
