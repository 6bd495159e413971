//! Media resolution for attachments.
//!
//! Image bytes are fetched in a prefetch phase before layout, so block
//! building never waits on I/O.

mod cache;
mod resolver;

pub use cache::{probe, FetchedImage, MediaCache, MediaEntry};
pub use resolver::{DirectoryResolver, MediaResolver, NoMedia};
