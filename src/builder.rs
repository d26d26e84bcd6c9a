//! Blank-map factory
//!
//! [`create_map`] is the programmatic entry point for new maps; the
//! fluent [`MapBuilder`] wraps it for call sites that prefer chained
//! construction.

use crate::types::*;

/// Options for [`create_map`].
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// The map's native view level
    pub map_type: ViewLevel,
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Hex stacking orientation
    pub hex_orientation: HexOrientation,
    /// Hex cell width in pixels
    pub hex_width: f64,
    /// Hex cell height in pixels
    pub hex_height: f64,
    /// World projection
    pub projection: MapProjection,
    /// Terrain to pre-fill the grid with. `"Ocean"` stays implicit (the
    /// sparse store treats absent cells as blank Ocean already).
    pub default_terrain: Option<String>,
}

impl MapOptions {
    /// Options for a `width` x `height` map at the given level, everything
    /// else defaulted.
    pub fn new(map_type: ViewLevel, width: u32, height: u32) -> Self {
        Self {
            map_type,
            width,
            height,
            hex_orientation: HexOrientation::default(),
            hex_width: 300.0,
            hex_height: 300.0,
            projection: MapProjection::default(),
            default_terrain: None,
        }
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::new(ViewLevel::World, 0, 0)
    }
}

/// Creates a blank map from the given options.
///
/// # Examples
///
/// ```
/// use wxx::{MapOptions, ViewLevel, create_map};
///
/// let map = create_map(&MapOptions::new(ViewLevel::Kingdom, 20, 15));
/// assert_eq!(map.metadata.width, 20);
/// assert_eq!(map.tile_count(), 0);
/// ```
pub fn create_map(options: &MapOptions) -> WxxFile {
    let mut map = WxxFile::new();
    map.metadata = Metadata {
        map_type: options.map_type,
        width: options.width,
        height: options.height,
        hex_width: options.hex_width,
        hex_height: options.hex_height,
        hex_orientation: options.hex_orientation,
        projection: options.projection,
        ..Metadata::default()
    };

    if let Some(terrain) = options
        .default_terrain
        .as_deref()
        .filter(|t| *t != DEFAULT_TERRAIN)
    {
        for row in 0..options.height as i32 {
            for col in 0..options.width as i32 {
                map.set_tile(col, row, options.map_type, Tile::with_terrain(terrain));
            }
        }
    }

    map
}

/// Fluent construction of blank maps.
///
/// # Examples
///
/// ```
/// use wxx::{HexOrientation, MapBuilder, ViewLevel};
///
/// let map = MapBuilder::new(ViewLevel::Province, 30, 20)
///     .hex_orientation(HexOrientation::Rows)
///     .default_terrain("Grassland")
///     .build();
/// assert_eq!(map.tile_count(), 600);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    options: MapOptions,
}

impl MapBuilder {
    /// Starts a builder for a `width` x `height` map at the given level.
    pub fn new(map_type: ViewLevel, width: u32, height: u32) -> Self {
        Self {
            options: MapOptions::new(map_type, width, height),
        }
    }

    /// Sets the hex stacking orientation.
    pub fn hex_orientation(mut self, orientation: HexOrientation) -> Self {
        self.options.hex_orientation = orientation;
        self
    }

    /// Sets the hex cell pixel dimensions.
    pub fn hex_size(mut self, width: f64, height: f64) -> Self {
        self.options.hex_width = width;
        self.options.hex_height = height;
        self
    }

    /// Sets the world projection.
    pub fn projection(mut self, projection: MapProjection) -> Self {
        self.options.projection = projection;
        self
    }

    /// Pre-fills the grid with the given terrain.
    pub fn default_terrain(mut self, terrain: impl Into<String>) -> Self {
        self.options.default_terrain = Some(terrain.into());
        self
    }

    /// Builds the map.
    pub fn build(self) -> WxxFile {
        create_map(&self.options)
    }
}
