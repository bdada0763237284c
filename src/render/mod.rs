//! Rendering module for exporting converted documents.

mod json;

pub use json::{to_json, JsonFormat};
