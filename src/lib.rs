//! # pagexml
//!
//! Import PAGE layout XML documents for further layout analysis.
//!
//! This library reads an existing PAGE document, exposes its text regions
//! (geometry, type, text) and metadata, rasterizes the regions into a mask,
//! and matches externally produced polygons against the imported regions.
//! A small counter type mints sequential region and line ids.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagexml::{import_file, IdCounter};
//!
//! fn main() -> pagexml::Result<()> {
//!     let page = import_file("scan.page.xml")?;
//!     println!("{}x{} px, {} regions", page.width(), page.height(), page.region_count());
//!
//!     // Region mask resized for a model input
//!     let mask = page.all_regions_mask(1600, 300);
//!     assert_eq!(mask.shape(), &[300, 1600, 3]);
//!
//!     // Which imported region does a detected polygon belong to?
//!     if let Some(region) = page.find_matching_region("30,35 944,35 944,1575 30,1575")? {
//!         println!("matched {}", region.id);
//!     }
//!
//!     let mut ids = IdCounter::new();
//!     println!("{}", ids.next_region_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Eager import**: regions, page size and metadata are read once
//! - **Provenance**: a note is appended to the metadata comments on import
//! - **Region masks**: 0/1 masks of any size as `ndarray` arrays
//! - **Polygon matching**: first region covering more than 95% of a polygon
//! - **Round trip**: the imported tree can be written back as XML

pub mod counter;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;

pub use counter::IdCounter;
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_page_xml, PageFormat};
pub use error::{Error, Result};
pub use geometry::MATCH_THRESHOLD;
pub use model::{ImportedPage, Metadata, NodeId, Point, Region, XmlElement, XmlTree};
pub use parser::{ErrorMode, ImportOptions, PageParser};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Import a PAGE file.
///
/// # Arguments
///
/// * `path` - Path to the PAGE XML file
///
/// # Example
///
/// ```no_run
/// use pagexml::import_file;
///
/// let page = import_file("scan.page.xml").unwrap();
/// println!("Regions: {}", page.region_count());
/// ```
pub fn import_file<P: AsRef<Path>>(path: P) -> Result<ImportedPage> {
    PageParser::open(path)?.parse()
}

/// Import a PAGE file with custom options.
///
/// # Example
///
/// ```no_run
/// use pagexml::{import_file_with_options, ImportOptions};
///
/// let options = ImportOptions::new().lenient();
/// let page = import_file_with_options("scan.page.xml", options).unwrap();
/// ```
pub fn import_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ImportOptions,
) -> Result<ImportedPage> {
    PageParser::open_with_options(path, options)?.parse()
}

/// Import a PAGE document from XML text.
pub fn import_str(xml: &str) -> Result<ImportedPage> {
    PageParser::from_xml(xml)?.parse()
}

/// Import a PAGE document from XML text with custom options.
pub fn import_str_with_options(xml: &str, options: ImportOptions) -> Result<ImportedPage> {
    PageParser::from_xml_with_options(xml, options)?.parse()
}

/// Import a PAGE document from bytes.
pub fn import_bytes(data: &[u8]) -> Result<ImportedPage> {
    PageParser::from_bytes(data)?.parse()
}

/// Import a PAGE document from a reader.
///
/// # Example
///
/// ```no_run
/// use pagexml::import_reader;
/// use std::fs::File;
///
/// let file = File::open("scan.page.xml").unwrap();
/// let page = import_reader(file).unwrap();
/// ```
pub fn import_reader<R: Read>(reader: R) -> Result<ImportedPage> {
    PageParser::from_reader(reader)?.parse()
}

/// Import a PAGE file and return its regions as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let page = import_file(path)?;
    render::to_json(&page, format)
}
