//! Rendering module for converting imported pages to masks and output formats.

mod json;
pub mod mask;
mod xml;

pub use json::{to_json, JsonFormat};
pub use mask::{image_to_mask, regions_mask, regions_mask_image};
pub use xml::{node_to_xml, to_xml};
