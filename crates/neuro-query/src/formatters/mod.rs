//! Output formatters for plain text and JSON.

mod json;
mod text;

pub use self::json::*;
pub use text::*;
