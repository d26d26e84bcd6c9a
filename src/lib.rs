//! Codec and editor core for Worldographer WXX map files
//!
//! This crate reads and writes the `.wxx` container used by the
//! Worldographer cartography tool — a gzip-compressed, UTF-16LE-encoded
//! XML document describing multi-scale hex/square-grid maps — and
//! provides a library of geometry-aware editing operations over the
//! in-memory model.
//!
//! ## Components
//!
//! - [`parse`] decodes a `.wxx` buffer into a [`WxxFile`]
//! - [`export`] serializes a [`WxxFile`] back into a `.wxx` buffer
//! - [`create_map`] builds a blank map from [`MapOptions`]
//! - the [`editor`] module mutates maps in place (fills, lines, flood
//!   fill, region transforms, procedural terrain, queries)
//! - [`validate`] audits a map without ever rejecting it
//!
//! The parser is deliberately tolerant below the structural level: the
//! wire format is produced by external tooling with inconsistent
//! adherence to its own spec, so missing sections, malformed tile records
//! and unparseable fields degrade to documented defaults instead of
//! failing. Round trips preserve the semantic model, not the exact bytes.
//!
//! ## Example
//!
//! ```
//! use wxx::editor::{self, Rect};
//! use wxx::{MapOptions, ViewLevel, create_map, export, parse};
//!
//! # fn main() -> Result<(), wxx::WxxError> {
//! let mut map = create_map(&MapOptions::new(ViewLevel::Kingdom, 32, 24));
//! editor::fill_rect(&mut map, &Rect::new(4, 4, 8, 6), "Forest", ViewLevel::Kingdom);
//! editor::paint_line(&mut map, 0, 0, 31, 23, "Road", 1, ViewLevel::Kingdom);
//!
//! let bytes = export(&map, &Default::default())?;
//! let reparsed = parse(&bytes)?;
//! assert_eq!(reparsed.tiles, map.tiles);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Everything here is synchronous, pure-data and lock-free. Distinct
//! [`WxxFile`] values never interact; sharing one instance across threads
//! must be serialized by the caller.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod builder;
pub mod editor;
mod error;
mod parser;
mod types;
mod validator;
mod writer;

pub use builder::{MapBuilder, MapOptions, create_map};
pub use error::{Result, WxxError};
pub use parser::parse;
pub use types::{
    Background, DEFAULT_TERRAIN, Feature, Fill, Font, HexOrientation, Label, Layer, MapProjection,
    Metadata, Note, NoteCategory, NotePosition, Outline, Point, Resources, ScalePositions, Shadow,
    Shape, Stroke, TerrainDef, Tile, TileKey, ViewLevel, VisibilityFlags, WxxFile,
};
pub use validator::{ValidationLevel, ValidationReport, validate};
pub use writer::{ExportOptions, export};
