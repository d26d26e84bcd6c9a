//! Core types for the WXX map format
//!
//! The [`WxxFile`] struct is the shared contract between the parser, the
//! generator and the editor: everything a `.wxx` container can describe is
//! representable here, and the codec round-trips it at the data level.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Terrain assigned to grid cells that carry no explicit record.
pub const DEFAULT_TERRAIN: &str = "Ocean";

/// The seven nested zoom scales a Worldographer map can address.
///
/// Tiles exist at exactly one level; features and labels may carry an
/// independent position per level (see [`ScalePositions`]). The declaration
/// order here is also the serialization order of tile sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewLevel {
    /// Whole-world scale
    #[default]
    World,
    /// Continent scale
    Continent,
    /// Kingdom scale
    Kingdom,
    /// Province scale
    Province,
    /// Battlemat (encounter) scale
    Battlemat,
    /// Settlement scale
    Settlement,
    /// Cosmic (space) scale
    Cosmic,
}

impl ViewLevel {
    /// All levels in declaration (and serialization) order.
    pub const ALL: [ViewLevel; 7] = [
        ViewLevel::World,
        ViewLevel::Continent,
        ViewLevel::Kingdom,
        ViewLevel::Province,
        ViewLevel::Battlemat,
        ViewLevel::Settlement,
        ViewLevel::Cosmic,
    ];

    /// Wire name used in `level`/`type` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewLevel::World => "WORLD",
            ViewLevel::Continent => "CONTINENT",
            ViewLevel::Kingdom => "KINGDOM",
            ViewLevel::Province => "PROVINCE",
            ViewLevel::Battlemat => "BATTLEMAT",
            ViewLevel::Settlement => "SETTLEMENT",
            ViewLevel::Cosmic => "COSMIC",
        }
    }

    /// Attribute prefix for sparse positions (`worldX`, `kingdomY`, ...).
    pub fn prefix(self) -> &'static str {
        match self {
            ViewLevel::World => "world",
            ViewLevel::Continent => "continent",
            ViewLevel::Kingdom => "kingdom",
            ViewLevel::Province => "province",
            ViewLevel::Battlemat => "battlemat",
            ViewLevel::Settlement => "settlement",
            ViewLevel::Cosmic => "cosmic",
        }
    }

    /// Slot index into the fixed-size per-level arrays.
    pub fn index(self) -> usize {
        match self {
            ViewLevel::World => 0,
            ViewLevel::Continent => 1,
            ViewLevel::Kingdom => 2,
            ViewLevel::Province => 3,
            ViewLevel::Battlemat => 4,
            ViewLevel::Settlement => 5,
            ViewLevel::Cosmic => 6,
        }
    }

    /// Parses a wire name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        ViewLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex grid orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HexOrientation {
    /// Flat-top hexes stacked in columns
    #[default]
    Columns,
    /// Pointy-top hexes stacked in rows
    Rows,
}

impl HexOrientation {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            HexOrientation::Columns => "COLUMNS",
            HexOrientation::Rows => "ROWS",
        }
    }

    /// Parses a wire name, case-insensitively. Unknown values map to the
    /// default (tolerant read).
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("ROWS") {
            HexOrientation::Rows
        } else {
            HexOrientation::Columns
        }
    }
}

/// Map projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapProjection {
    /// Flat rectangular grid
    #[default]
    Flat,
    /// Icosahedral world projection
    Icosahedral,
}

impl MapProjection {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            MapProjection::Flat => "FLAT",
            MapProjection::Icosahedral => "ICOSAHEDRAL",
        }
    }

    /// Parses a wire name, case-insensitively. Unknown values map to the
    /// default (tolerant read).
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("ICOSAHEDRAL") {
            MapProjection::Icosahedral
        } else {
            MapProjection::Flat
        }
    }
}

/// Map-level singleton carried as attributes of the root `<map>` element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// The map's native view level
    pub map_type: ViewLevel,
    /// Writer version string, preserved verbatim
    pub version: String,
    /// Schema version string, preserved verbatim
    pub schema_version: String,
    /// Grid extent in cells (columns)
    pub width: u32,
    /// Grid extent in cells (rows)
    pub height: u32,
    /// Hex cell width in pixels
    pub hex_width: f64,
    /// Hex cell height in pixels
    pub hex_height: f64,
    /// Hex stacking orientation
    pub hex_orientation: HexOrientation,
    /// World projection
    pub projection: MapProjection,
    /// Fog-of-war mask color, when the map carries one
    pub fog_of_war_color: Option<String>,
}

impl Metadata {
    /// Creates metadata for a `width` x `height` grid at the given level.
    pub fn new(map_type: ViewLevel, width: u32, height: u32) -> Self {
        Self {
            map_type,
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            map_type: ViewLevel::World,
            version: "1.10".to_string(),
            schema_version: "1.0".to_string(),
            width: 0,
            height: 0,
            hex_width: 300.0,
            hex_height: 300.0,
            hex_orientation: HexOrientation::default(),
            projection: MapProjection::default(),
            fog_of_war_color: None,
        }
    }
}

/// The seven per-tile resource counters.
///
/// Values are nominally 0-7 but the model does not range-enforce them; the
/// wire format is produced by external tooling and must round-trip as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    /// Animal resources
    pub animals: i32,
    /// Brick/clay resources
    pub brick: i32,
    /// Crop resources
    pub crops: i32,
    /// Gem resources
    pub gems: i32,
    /// Lumber resources
    pub lumber: i32,
    /// Metal resources
    pub metals: i32,
    /// Rock/stone resources
    pub rock: i32,
}

impl Resources {
    /// True when every counter is zero.
    pub fn is_empty(&self) -> bool {
        *self == Resources::default()
    }
}

/// One grid cell's state at a specific view level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Terrain type key into the map's terrain definitions. Undefined keys
    /// are legal and round-trip.
    pub terrain: String,
    /// Elevation in map units
    pub elevation: i32,
    /// Ice overlay flag
    pub icy: bool,
    /// Hidden from players
    pub gm_only: bool,
    /// Resource counters
    pub resources: Resources,
}

impl Tile {
    /// Creates a tile of the given terrain with all other fields defaulted.
    pub fn with_terrain(terrain: impl Into<String>) -> Self {
        Self {
            terrain: terrain.into(),
            ..Self::default()
        }
    }

    /// True when this record equals the implicit default of an absent cell.
    ///
    /// Blank records are the sparse/dense pivot: the generator synthesizes
    /// them to pad rows to full width, and the parser drops them again.
    pub fn is_blank(&self) -> bool {
        self.terrain == DEFAULT_TERRAIN
            && self.elevation == 0
            && !self.icy
            && !self.gm_only
            && self.resources.is_empty()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            terrain: DEFAULT_TERRAIN.to_string(),
            elevation: 0,
            icy: false,
            gm_only: false,
            resources: Resources::default(),
        }
    }
}

/// Composite tile key: `(col, row, view_level)`.
pub type TileKey = (i32, i32, ViewLevel);

/// Sparse multi-scale coordinates for features and labels.
///
/// Each of the seven levels has an independently optional X and Y slot (14
/// optionals total), because the wire format allows either half to appear
/// alone. Absence is meaningful: the generator must be able to reproduce
/// "no position at scale S" rather than "position 0 at scale S".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalePositions {
    /// Per-level X coordinates
    pub xs: [Option<f64>; 7],
    /// Per-level Y coordinates
    pub ys: [Option<f64>; 7],
}

impl ScalePositions {
    /// Empty record: no position at any scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record positioned at a single scale.
    pub fn at(level: ViewLevel, x: f64, y: f64) -> Self {
        let mut positions = Self::default();
        positions.set(level, x, y);
        positions
    }

    /// Full position at `level`, when both halves are present.
    pub fn get(&self, level: ViewLevel) -> Option<(f64, f64)> {
        let i = level.index();
        Some((self.xs[i]?, self.ys[i]?))
    }

    /// X coordinate at `level`.
    pub fn x(&self, level: ViewLevel) -> Option<f64> {
        self.xs[level.index()]
    }

    /// Y coordinate at `level`.
    pub fn y(&self, level: ViewLevel) -> Option<f64> {
        self.ys[level.index()]
    }

    /// Sets both halves at `level`.
    pub fn set(&mut self, level: ViewLevel, x: f64, y: f64) {
        self.xs[level.index()] = Some(x);
        self.ys[level.index()] = Some(y);
    }

    /// Removes the position at `level`.
    pub fn clear(&mut self, level: ViewLevel) {
        self.xs[level.index()] = None;
        self.ys[level.index()] = None;
    }

    /// True when no scale carries any coordinate.
    pub fn is_empty(&self) -> bool {
        self.xs.iter().all(Option::is_none) && self.ys.iter().all(Option::is_none)
    }
}

/// Per-scale visibility flags for features and labels.
///
/// The wire default is visible: an entity is hidden at a scale only when
/// the attribute is the literal string `"false"` (fail-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityFlags([bool; 7]);

impl VisibilityFlags {
    /// Visible at every scale.
    pub fn all_visible() -> Self {
        Self([true; 7])
    }

    /// Visibility at `level`.
    pub fn is_visible(&self, level: ViewLevel) -> bool {
        self.0[level.index()]
    }

    /// Sets visibility at `level`.
    pub fn set_visible(&mut self, level: ViewLevel, visible: bool) {
        self.0[level.index()] = visible;
    }

    /// True when at least one scale is hidden.
    pub fn any_hidden(&self) -> bool {
        self.0.iter().any(|v| !v)
    }
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self::all_visible()
    }
}

/// A positioned icon / point of interest.
///
/// Features have no identity key beyond list membership; duplicates are
/// permitted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Icon type key
    pub feature_type: String,
    /// Sparse per-scale positions
    pub positions: ScalePositions,
    /// Rotation in degrees
    pub rotation: f64,
    /// Scale multiplier
    pub scale: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    /// Per-scale visibility
    pub visibility: VisibilityFlags,
    /// Hidden from players
    pub gm_only: bool,
}

impl Feature {
    /// Creates an unpositioned feature of the given type.
    pub fn new(feature_type: impl Into<String>) -> Self {
        Self {
            feature_type: feature_type.into(),
            ..Self::default()
        }
    }
}

impl Default for Feature {
    fn default() -> Self {
        Self {
            feature_type: String::new(),
            positions: ScalePositions::default(),
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            visibility: VisibilityFlags::default(),
            gm_only: false,
        }
    }
}

/// Label font settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    /// Font family name
    pub face: String,
    /// Point size
    pub size: f64,
    /// Text color
    pub color: String,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            face: "Arial".to_string(),
            size: 12.0,
            color: "#000000".to_string(),
            bold: false,
            italic: false,
        }
    }
}

/// Optional label outline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    /// Outline color
    pub color: String,
    /// Outline width in pixels
    pub width: f64,
}

/// Optional label background box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Background {
    /// Background color
    pub color: String,
    /// Background opacity in `[0, 1]`
    pub opacity: f64,
}

/// A text overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    /// Displayed text
    pub text: String,
    /// Sparse per-scale positions
    pub positions: ScalePositions,
    /// Font settings
    pub font: Font,
    /// Optional outline
    pub outline: Option<Outline>,
    /// Optional background box
    pub background: Option<Background>,
    /// Per-scale visibility
    pub visibility: VisibilityFlags,
    /// Hidden from players
    pub gm_only: bool,
}

impl Label {
    /// Creates an unpositioned label with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            positions: ScalePositions::default(),
            font: Font::default(),
            outline: None,
            background: None,
            visibility: VisibilityFlags::default(),
            gm_only: false,
        }
    }
}

/// A 2D point in map pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Shape stroke settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    /// Stroke color
    pub color: String,
    /// Stroke width in pixels
    pub width: f64,
    /// Stroke style key (solid, dashed, ...)
    pub style: String,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
            style: "solid".to_string(),
        }
    }
}

/// Shape fill settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fill {
    /// Fill color
    pub color: String,
    /// Fill opacity in `[0, 1]`
    pub opacity: f64,
    /// Optional texture reference
    pub texture: Option<String>,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            opacity: 1.0,
            texture: None,
        }
    }
}

/// Optional shape drop shadow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shadow {
    /// Shadow color
    pub color: String,
    /// Horizontal offset in pixels
    pub dx: f64,
    /// Vertical offset in pixels
    pub dy: f64,
}

/// A polygon, curve or line tied to exactly one view level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    /// Shape kind (polygon, curve, line)
    pub shape_type: String,
    /// The single view level this shape exists at
    pub view_level: ViewLevel,
    /// Ordered vertex list
    pub points: Vec<Point>,
    /// Stroke settings
    pub stroke: Stroke,
    /// Fill settings
    pub fill: Fill,
    /// Optional drop shadow
    pub shadow: Option<Shadow>,
    /// Hidden from players
    pub gm_only: bool,
}

impl Shape {
    /// Creates an empty polygon at the given level.
    pub fn new(view_level: ViewLevel) -> Self {
        Self {
            shape_type: "polygon".to_string(),
            view_level,
            points: Vec::new(),
            stroke: Stroke::default(),
            fill: Fill::default(),
            shadow: None,
            gm_only: false,
        }
    }
}

/// Category of a GM note.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteCategory {
    /// Nation / political entity
    Nation,
    /// Religion
    Religion,
    /// Timeline / historical event
    Timeline,
    /// Any other user-defined category
    Custom(String),
}

impl NoteCategory {
    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            NoteCategory::Nation => "nation",
            NoteCategory::Religion => "religion",
            NoteCategory::Timeline => "timeline",
            NoteCategory::Custom(name) => name,
        }
    }

    /// Parses a wire name; anything unrecognized becomes [`Custom`].
    ///
    /// [`Custom`]: NoteCategory::Custom
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "nation" => NoteCategory::Nation,
            "religion" => NoteCategory::Religion,
            "timeline" => NoteCategory::Timeline,
            _ => NoteCategory::Custom(name.to_string()),
        }
    }
}

/// Optional single-scale anchor of a note.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NotePosition {
    /// Anchoring view level
    pub level: ViewLevel,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// A GM-authored annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// UUID identity, preserved verbatim from the wire
    pub id: String,
    /// Note title
    pub title: String,
    /// Optional category
    pub category: Option<NoteCategory>,
    /// Free text / HTML content
    pub content: String,
    /// Optional single-scale anchor
    pub position: Option<NotePosition>,
    /// Hidden from players; notes default to GM-only
    pub gm_only: bool,
}

impl Note {
    /// Creates a note with a fresh v4 UUID. Notes are GM-only unless
    /// explicitly made visible.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            category: None,
            content: String::new(),
            position: None,
            gm_only: true,
        }
    }
}

/// Ordering and visibility metadata for a drawing layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Visible flag
    pub visible: bool,
    /// Locked against editing
    pub locked: bool,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    /// Z-order; higher draws on top
    pub z_order: i32,
}

impl Layer {
    /// Creates a visible, unlocked, fully opaque layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            locked: false,
            opacity: 1.0,
            z_order: 0,
        }
    }
}

/// A custom terrain type definition.
///
/// Terrain defs are a lookup key space for [`Tile::terrain`]; the model
/// does not enforce referential integrity, so tiles may reference terrain
/// that is never defined.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainDef {
    /// Terrain key, referenced by tiles
    pub name: String,
    /// Human-readable display name
    pub display_name: String,
    /// Base color
    pub color: String,
    /// Optional texture reference
    pub texture: Option<String>,
    /// Movement cost
    pub movement_cost: i32,
    /// Defense bonus
    pub defense_bonus: i32,
    /// Optional description
    pub description: Option<String>,
}

impl TerrainDef {
    /// Creates a terrain def with neutral stats.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            color: color.into(),
            texture: None,
            movement_cost: 1,
            defense_bonus: 0,
            description: None,
        }
    }
}

/// In-memory representation of one `.wxx` map file.
///
/// Created by [`crate::parse`] or [`crate::create_map`], mutated in place
/// by the editor operations, serialized by [`crate::export`]. The tile
/// store is sparse: absent cells are implicitly blank Ocean.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WxxFile {
    /// Map-level metadata
    pub metadata: Metadata,
    /// Sparse tile store keyed by `(col, row, view_level)`
    pub tiles: HashMap<TileKey, Tile>,
    /// Positioned icons, in file order
    pub features: Vec<Feature>,
    /// Text overlays, in file order
    pub labels: Vec<Label>,
    /// Vector shapes, in file order
    pub shapes: Vec<Shape>,
    /// GM notes, in file order
    pub notes: Vec<Note>,
    /// Drawing layers, in file order
    pub layers: Vec<Layer>,
    /// Custom terrain definitions, in file order
    pub terrain_defs: Vec<TerrainDef>,
}

impl WxxFile {
    /// Creates an empty map with default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the tile at `(col, row)` on `level`.
    pub fn tile(&self, col: i32, row: i32, level: ViewLevel) -> Option<&Tile> {
        self.tiles.get(&(col, row, level))
    }

    /// Mutable lookup of the tile at `(col, row)` on `level`.
    pub fn tile_mut(&mut self, col: i32, row: i32, level: ViewLevel) -> Option<&mut Tile> {
        self.tiles.get_mut(&(col, row, level))
    }

    /// Upserts a full tile record. Re-setting an existing key overwrites in
    /// place rather than duplicating.
    pub fn set_tile(&mut self, col: i32, row: i32, level: ViewLevel, tile: Tile) {
        self.tiles.insert((col, row, level), tile);
    }

    /// Upserts the terrain of a cell, preserving the rest of an existing
    /// record; absent cells are created lazily.
    pub fn replace_tile(&mut self, col: i32, row: i32, level: ViewLevel, terrain: &str) {
        self.tiles
            .entry((col, row, level))
            .and_modify(|tile| tile.terrain = terrain.to_string())
            .or_insert_with(|| Tile::with_terrain(terrain));
    }

    /// Removes the tile at `(col, row)` on `level`, returning it.
    pub fn remove_tile(&mut self, col: i32, row: i32, level: ViewLevel) -> Option<Tile> {
        self.tiles.remove(&(col, row, level))
    }

    /// Number of stored (non-blank) tiles across all levels.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Parses a `.wxx` file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        crate::parser::parse(&bytes)
    }

    /// Serializes this map to disk as a compressed `.wxx` file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = crate::writer::export(self, &crate::writer::ExportOptions::default())?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
