//! Error types for pagexml library.

use std::io;
use thiserror::Error;

/// Result type alias for pagexml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while importing and querying PAGE documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The root element is not a PAGE `PcGts` element.
    #[error("Unknown file format: not a PAGE XML document")]
    UnknownFormat,

    /// The input is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A required element is missing.
    #[error("Missing required element: {0}")]
    MissingElement(String),

    /// A required attribute is missing on an element.
    #[error("Missing attribute '{attribute}' on element {element}")]
    MissingAttribute {
        /// Element local name
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// An attribute value could not be interpreted.
    #[error("Invalid value '{value}' for attribute '{attribute}' on element {element}")]
    InvalidAttribute {
        /// Element local name
        element: String,
        /// Attribute name
        attribute: String,
        /// Offending value
        value: String,
    },

    /// A coordinate string is not a list of `x,y` integer pairs.
    #[error("Invalid coordinates: {0}")]
    InvalidCoords(String),

    /// A query polygon has zero area, so no overlap ratio exists.
    #[error("Degenerate polygon: query area is zero")]
    DegeneratePolygon,

    /// Error while writing output (XML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// An error raised while importing a specific document.
    #[error("{document}: {source}")]
    Document {
        /// Path of the offending document, or `<memory>`
        document: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the name of the document being imported.
    pub fn in_document(self, document: impl Into<String>) -> Self {
        match self {
            Error::Document { .. } => self,
            other => Error::Document {
                document: document.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without document context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Document { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
