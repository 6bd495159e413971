//! Layout pipeline.
//!
//! Timeline entries become sized blocks ([`BlockBuilder`]), blocks are
//! placed onto pages ([`PaginationEngine`]) and the pages are frozen with
//! header and footer bands ([`DocumentFinalizer`]).

mod builder;
mod finalize;
mod merge;
mod metrics;
mod options;
mod paginate;
mod wrap;

pub use builder::{emoji_fallback, force_download_url, summarize_reactions, BlockBuilder, Viewer};
pub use finalize::{standard_footer, DocumentFinalizer};
pub use merge::{TieBreak, TimelineMerger};
pub(crate) use merge::utc;
pub use metrics::{truncate_to_width, FontMetrics, TextMeasure};
pub use options::LayoutOptions;
pub use paginate::{Pagination, PaginationEngine};
pub use wrap::LineWrapper;
