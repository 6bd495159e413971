//! Data model for transcript export.
//!
//! Input records (messages, calls) come from the chat backend; everything
//! else is built once per export and discarded after serialization.

mod block;
mod call;
mod document;
mod message;
mod page;
mod resource;
mod run;
mod timeline;

pub use block::{Alignment, BlockBody, BlockKind, LayoutBlock, MediaDescriptor, MediaRendering};
pub use call::{format_duration, CallEvent, CallStatus, CallType};
pub use document::{Document, Metadata};
pub use message::{Attachment, AttachmentKind, Message, Reaction};
pub use page::{Band, Page, PageBuilder, PlacedBlock};
pub use resource::Resource;
pub use run::{plain_text, InlineRun, RunStyle, WrappedLine};
pub use timeline::{TimelineEntry, TimelineItem, Transcript};
