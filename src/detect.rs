//! PAGE format detection and validation.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// Namespace URI prefix shared by all PAGE schema versions.
pub const PAGE_NAMESPACE_PREFIX: &str = "http://schema.primaresearch.org/PAGE/gts/pagecontent/";

/// Namespace of the 2013-07-15 PAGE schema.
pub const PAGE_NAMESPACE_2013: &str =
    "http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15";

/// Local name of the PAGE document element.
pub const ROOT_ELEMENT: &str = "PcGts";

/// PAGE format information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFormat {
    /// Namespace URI of the document
    pub namespace: String,
    /// Schema version (e.g., "2013-07-15")
    pub version: String,
}

impl std::fmt::Display for PageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PAGE {}", self.version)
    }
}

impl PageFormat {
    /// Identify the format from the document element's name and namespace.
    pub fn from_root(local_name: &str, namespace: Option<&str>) -> Result<Self> {
        if local_name != ROOT_ELEMENT {
            return Err(Error::UnknownFormat);
        }
        let namespace = namespace.ok_or(Error::UnknownFormat)?;
        if !namespace.starts_with(PAGE_NAMESPACE_PREFIX) {
            return Err(Error::UnknownFormat);
        }

        let version = version_pattern()
            .captures(namespace)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(Error::UnknownFormat)?;

        Ok(Self {
            namespace: namespace.to_string(),
            version,
        })
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/pagecontent/(\d{4}-\d{2}-\d{2})/?$").expect("valid version pattern")
    })
}

/// Detect the PAGE format of a file.
///
/// # Example
/// ```no_run
/// use pagexml::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("page.xml").unwrap();
/// println!("PAGE schema: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PageFormat> {
    let data = std::fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the PAGE format from raw bytes (UTF-8).
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PageFormat> {
    let xml = std::str::from_utf8(data).map_err(|e| Error::Encoding(e.to_string()))?;
    detect_format_from_str(xml)
}

/// Detect the PAGE format from XML text.
///
/// Only reads up to the document element.
pub fn detect_format_from_str(xml: &str) -> Result<PageFormat> {
    let mut reader = NsReader::from_str(xml);

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) | Ok((ns, Event::Empty(e))) => {
                let namespace = match ns {
                    ResolveResult::Bound(Namespace(uri)) => {
                        Some(String::from_utf8_lossy(uri).into_owned())
                    }
                    _ => None,
                };
                let local_name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                return PageFormat::from_root(&local_name, namespace.as_deref());
            }
            Ok((_, Event::Eof)) => return Err(Error::UnknownFormat),
            Ok(_) => {}
            Err(_) => return Err(Error::UnknownFormat),
        }
    }
}

/// Quick check whether bytes look like a PAGE document.
pub fn is_page_xml_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Quick check whether a file looks like a PAGE document.
pub fn is_page_xml<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}
