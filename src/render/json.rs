//! JSON rendering for imported pages.

use serde::Serialize;

use crate::detect::PageFormat;
use crate::error::{Error, Result};
use crate::model::{ImportedPage, Metadata, Region};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct PageView<'a> {
    source: &'a str,
    format: &'a PageFormat,
    width: u32,
    height: u32,
    metadata: &'a Metadata,
    regions: &'a [Region],
}

/// Convert an imported page to JSON.
pub fn to_json(page: &ImportedPage, format: JsonFormat) -> Result<String> {
    let view = PageView {
        source: page.source(),
        format: page.format(),
        width: page.width(),
        height: page.height(),
        metadata: page.metadata(),
        regions: page.regions(),
    };

    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&view),
        JsonFormat::Compact => serde_json::to_string(&view),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
