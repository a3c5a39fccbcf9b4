//! Data model for imported PAGE documents.
//!
//! The element tree owns the parsed document; regions and metadata are
//! typed views derived from it at load time and refer back to their source
//! elements by [`NodeId`].

mod metadata;
mod page;
mod region;
mod tree;

pub use metadata::{
    append_provenance, parse_page_date, Metadata, PROVENANCE_NOTE, PROVENANCE_SEPARATOR,
};
pub use page::ImportedPage;
pub use region::{Point, Region};
pub use tree::{NodeId, XmlElement, XmlNode, XmlTree};
