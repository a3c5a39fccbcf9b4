//! PAGE parsing module.

mod options;
mod page_parser;
mod xml_reader;

pub use options::{ErrorMode, ImportOptions};
pub use page_parser::{PageParser, MEMORY_SOURCE};
pub use xml_reader::read_tree;
