//! Error handling for the WXX codec
//!
//! The codec distinguishes two strata of failure. Structural problems —
//! the container is not gzip, the payload is not UTF-16 text, the XML is
//! malformed, or the root `<map>` element is missing — abort parsing with
//! a [`WxxError`]. Everything below the structural level (missing
//! sections, malformed tile records, unparseable numeric fields) degrades
//! to documented defaults and is only reported through the `log` facade:
//! the wire format is produced by external tooling with inconsistent
//! adherence to its own spec, and strict validation would make the parser
//! too brittle to interoperate.

use std::io;
use thiserror::Error;

/// Errors that can occur when working with WXX files
#[derive(Debug, Error)]
pub enum WxxError {
    /// An I/O error occurred (file helpers, compression streams)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer is not a valid gzip stream
    #[error("not a gzip stream: {0}")]
    Gzip(String),

    /// The decompressed payload is not decodable as UTF-16
    #[error("payload is not valid UTF-16: {0}")]
    Utf16(String),

    /// The decoded payload is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An XML attribute could not be read
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Text content could not be decoded
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// An element or attribute name is not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document has no root `<map>` element
    #[error("missing root <map> element")]
    MissingRoot,
}

/// Type alias for Results from WXX operations
pub type Result<T> = std::result::Result<T, WxxError>;
