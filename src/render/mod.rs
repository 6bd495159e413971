//! Rendering a finished document: painting onto a page surface, or a JSON
//! dump of the layout itself.

mod json;
mod paint;

pub use json::{to_json, JsonFormat};
pub use paint::{paint, Painter};
