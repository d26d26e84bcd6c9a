//! Parser for `.wxx` containers
//!
//! The pipeline is gzip-decompress, UTF-16 decode, then a single pass over
//! the XML event stream extracting each section independently. Failures
//! above the structural level abort with a [`WxxError`]; everything below
//! it is tolerated with documented defaults, because real `.wxx` files are
//! produced by external tooling and hand edits. A missing section yields
//! an empty collection, a malformed tile record is skipped, an
//! unparseable number becomes `0`.

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, WxxError};
use crate::types::*;

/// Parses a `.wxx` buffer into a [`WxxFile`].
///
/// Fails with [`WxxError::Gzip`] when the buffer is not a gzip stream,
/// [`WxxError::Utf16`] when the payload is not UTF-16 text,
/// [`WxxError::Xml`] on malformed XML and [`WxxError::MissingRoot`] when
/// no `<map>` root element is present (accepted case-insensitively).
///
/// # Examples
///
/// ```
/// use wxx::{MapOptions, ViewLevel, create_map, export, parse};
///
/// let map = create_map(&MapOptions::new(ViewLevel::Kingdom, 8, 6));
/// let bytes = export(&map, &Default::default()).unwrap();
/// let reparsed = parse(&bytes).unwrap();
/// assert_eq!(reparsed.metadata.width, 8);
/// ```
pub fn parse(bytes: &[u8]) -> Result<WxxFile> {
    let xml = decode_payload(bytes)?;
    parse_document(&xml)
}

/// Decompresses and decodes the container down to the XML text.
fn decode_payload(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| WxxError::Gzip(e.to_string()))?;
    decode_utf16(&decompressed)
}

/// Decodes UTF-16 text, honoring an optional BOM and defaulting to
/// little-endian when none is present. Unpaired surrogates degrade
/// lossily; an odd byte count is a structural failure.
fn decode_utf16(bytes: &[u8]) -> Result<String> {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        return Err(WxxError::Utf16(format!(
            "odd payload length {} cannot be UTF-16",
            body.len()
        )));
    }

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    Ok(String::from_utf16_lossy(&units))
}

/// The sibling sections a `<map>` document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Tiles,
    Features,
    Labels,
    Shapes,
    Information,
    Layers,
    TerrainDefs,
}

impl Section {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "tiles" => Some(Section::Tiles),
            "features" => Some(Section::Features),
            "labels" => Some(Section::Labels),
            "shapes" => Some(Section::Shapes),
            "information" => Some(Section::Information),
            "layers" => Some(Section::Layers),
            "terraindefs" => Some(Section::TerrainDefs),
            _ => None,
        }
    }
}

fn parse_document(xml: &str) -> Result<WxxFile> {
    let mut reader = Reader::from_str(xml);
    // No global text trimming: tile row bodies are whitespace-structured.

    let mut map = WxxFile::new();
    let mut root_found = false;
    let mut section = Section::None;

    // Row ordinals are counted per view level.
    let mut row_counters: HashMap<ViewLevel, usize> = HashMap::new();
    let mut current_row: Option<ViewLevel> = None;
    let mut row_body = String::new();

    let mut current_shape: Option<Shape> = None;
    let mut current_note: Option<Note> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                if !root_found {
                    if name == "map" {
                        root_found = true;
                        map.metadata = parse_metadata(&e)?;
                    }
                    continue;
                }

                if let Some(s) = Section::from_name(&name) {
                    section = s;
                    continue;
                }

                match (section, name.as_str()) {
                    (Section::Tiles, "row") => {
                        let attrs = attrs_to_map(&e)?;
                        current_row = attrs.get("level").and_then(|v| ViewLevel::from_name(v));
                        if current_row.is_none() {
                            warn!("tile row without a recognizable level attribute, skipping");
                        }
                        row_body.clear();
                    }
                    (Section::Features, "feature") => map.features.push(parse_feature(&e)?),
                    (Section::Labels, "label") => map.labels.push(parse_label(&e)?),
                    (Section::Shapes, "shape") => current_shape = Some(parse_shape(&e)?),
                    (Section::Shapes, "point") => {
                        if let Some(shape) = current_shape.as_mut() {
                            shape.points.push(parse_point(&e)?);
                        }
                    }
                    (Section::Information, "note") => current_note = Some(parse_note(&e)?),
                    (Section::Layers, "layer") => map.layers.push(parse_layer(&e)?),
                    (Section::TerrainDefs, "terraindef") => {
                        map.terrain_defs.push(parse_terrain_def(&e)?);
                    }
                    _ => debug!("skipping unknown element <{name}>"),
                }
            }

            Event::Empty(e) => {
                let name = local_name(&e)?;
                if !root_found {
                    if name == "map" {
                        root_found = true;
                        map.metadata = parse_metadata(&e)?;
                    }
                    continue;
                }
                match (section, name.as_str()) {
                    (Section::Tiles, "row") => {
                        // A self-closing row holds no records but still
                        // occupies its level's row ordinal.
                        let attrs = attrs_to_map(&e)?;
                        if let Some(level) = attrs.get("level").and_then(|v| ViewLevel::from_name(v))
                        {
                            *row_counters.entry(level).or_insert(0) += 1;
                        }
                    }
                    (Section::Features, "feature") => map.features.push(parse_feature(&e)?),
                    (Section::Labels, "label") => map.labels.push(parse_label(&e)?),
                    (Section::Shapes, "shape") => map.shapes.push(parse_shape(&e)?),
                    (Section::Shapes, "point") => {
                        if let Some(shape) = current_shape.as_mut() {
                            shape.points.push(parse_point(&e)?);
                        }
                    }
                    (Section::Information, "note") => map.notes.push(parse_note(&e)?),
                    (Section::Layers, "layer") => map.layers.push(parse_layer(&e)?),
                    (Section::TerrainDefs, "terraindef") => {
                        map.terrain_defs.push(parse_terrain_def(&e)?);
                    }
                    _ => debug!("skipping unknown element <{name}>"),
                }
            }

            Event::Text(t) => {
                if current_row.is_some() || current_note.is_some() {
                    let raw = t.decode()?;
                    let text = quick_xml::escape::unescape(&raw)
                        .map(|cow| cow.into_owned())
                        .unwrap_or_else(|_| raw.into_owned());
                    if current_row.is_some() {
                        row_body.push_str(&text);
                    } else if let Some(note) = current_note.as_mut() {
                        note.content.push_str(&text);
                    }
                }
            }

            Event::CData(c) => {
                if let Some(note) = current_note.as_mut() {
                    note.content.push_str(&c.decode()?);
                }
            }

            Event::End(e) => {
                let name = str::from_utf8(e.name().as_ref())?.to_ascii_lowercase();
                match name.as_str() {
                    "row" => {
                        if let Some(level) = current_row.take() {
                            let row = row_counters.entry(level).or_insert(0);
                            parse_tile_row(&mut map, level, *row as i32, &row_body);
                            *row += 1;
                        }
                        row_body.clear();
                    }
                    "shape" => {
                        if let Some(shape) = current_shape.take() {
                            map.shapes.push(shape);
                        }
                    }
                    "note" => {
                        if let Some(note) = current_note.take() {
                            map.notes.push(note);
                        }
                    }
                    _ => {
                        if Section::from_name(&name).is_some() {
                            section = Section::None;
                        }
                    }
                }
            }

            Event::Eof => break,
            _ => {}
        }
    }

    if !root_found {
        return Err(WxxError::MissingRoot);
    }

    Ok(map)
}

/// Decodes one tile row body: newline-separated per-column records, each a
/// tab-delimited field list. Records with fewer than 4 fields are skipped
/// but still consume their column index; blank Ocean records are the
/// generator's row padding and are not stored.
fn parse_tile_row(map: &mut WxxFile, level: ViewLevel, row: i32, body: &str) {
    for (col, line) in body.lines().enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            if !line.trim().is_empty() {
                debug!("skipping malformed tile record at ({col}, {row}, {level}): {line:?}");
            }
            continue;
        }

        let tile = Tile {
            terrain: fields[0].to_string(),
            elevation: int_field(fields.get(1)),
            icy: bool_field(fields.get(2)),
            gm_only: bool_field(fields.get(3)),
            resources: Resources {
                animals: int_field(fields.get(4)),
                brick: int_field(fields.get(5)),
                crops: int_field(fields.get(6)),
                gems: int_field(fields.get(7)),
                lumber: int_field(fields.get(8)),
                metals: int_field(fields.get(9)),
                rock: int_field(fields.get(10)),
            },
        };

        if tile.is_blank() {
            continue;
        }
        map.set_tile(col as i32, row, level, tile);
    }
}

fn parse_metadata(e: &BytesStart<'_>) -> Result<Metadata> {
    let attrs = attrs_to_map(e)?;
    let mut meta = Metadata::default();

    if let Some(v) = attrs.get("type") {
        meta.map_type = ViewLevel::from_name(v).unwrap_or_default();
    }
    if let Some(v) = attrs.get("version") {
        meta.version = v.clone();
    }
    if let Some(v) = attrs.get("schemaversion") {
        meta.schema_version = v.clone();
    }
    meta.width = attrs.get("width").map(|v| num(v) as u32).unwrap_or(0);
    meta.height = attrs.get("height").map(|v| num(v) as u32).unwrap_or(0);
    if let Some(v) = attrs.get("hexwidth") {
        meta.hex_width = num(v);
    }
    if let Some(v) = attrs.get("hexheight") {
        meta.hex_height = num(v);
    }
    if let Some(v) = attrs.get("hexorientation") {
        meta.hex_orientation = HexOrientation::from_name(v);
    }
    if let Some(v) = attrs.get("mapprojection") {
        meta.projection = MapProjection::from_name(v);
    }
    meta.fog_of_war_color = attrs.get("fogofwarcolor").cloned();

    Ok(meta)
}

fn parse_feature(e: &BytesStart<'_>) -> Result<Feature> {
    let attrs = attrs_to_map(e)?;
    Ok(Feature {
        feature_type: attrs.get("type").cloned().unwrap_or_default(),
        positions: parse_positions(&attrs),
        rotation: attrs.get("rotation").map(|v| num(v)).unwrap_or(0.0),
        scale: attrs.get("scale").map(|v| num(v)).unwrap_or(1.0),
        opacity: attrs.get("opacity").map(|v| num(v)).unwrap_or(1.0),
        visibility: parse_visibility(&attrs),
        gm_only: is_true(attrs.get("gmonly")),
    })
}

fn parse_label(e: &BytesStart<'_>) -> Result<Label> {
    let attrs = attrs_to_map(e)?;
    let mut font = Font::default();
    if let Some(v) = attrs.get("fontface") {
        font.face = v.clone();
    }
    if let Some(v) = attrs.get("fontsize") {
        font.size = num(v);
    }
    if let Some(v) = attrs.get("fontcolor") {
        font.color = v.clone();
    }
    font.bold = is_true(attrs.get("bold"));
    font.italic = is_true(attrs.get("italic"));

    let outline = attrs.get("outlinecolor").map(|color| Outline {
        color: color.clone(),
        width: attrs.get("outlinewidth").map(|v| num(v)).unwrap_or(1.0),
    });
    let background = attrs.get("backgroundcolor").map(|color| Background {
        color: color.clone(),
        opacity: attrs.get("backgroundopacity").map(|v| num(v)).unwrap_or(1.0),
    });

    Ok(Label {
        text: attrs.get("text").cloned().unwrap_or_default(),
        positions: parse_positions(&attrs),
        font,
        outline,
        background,
        visibility: parse_visibility(&attrs),
        gm_only: is_true(attrs.get("gmonly")),
    })
}

fn parse_shape(e: &BytesStart<'_>) -> Result<Shape> {
    let attrs = attrs_to_map(e)?;
    let mut shape = Shape::new(
        attrs
            .get("viewlevel")
            .and_then(|v| ViewLevel::from_name(v))
            .unwrap_or_default(),
    );

    if let Some(v) = attrs.get("type") {
        shape.shape_type = v.clone();
    }
    if let Some(v) = attrs.get("strokecolor") {
        shape.stroke.color = v.clone();
    }
    if let Some(v) = attrs.get("strokewidth") {
        shape.stroke.width = num(v);
    }
    if let Some(v) = attrs.get("strokestyle") {
        shape.stroke.style = v.clone();
    }
    if let Some(v) = attrs.get("fillcolor") {
        shape.fill.color = v.clone();
    }
    if let Some(v) = attrs.get("fillopacity") {
        shape.fill.opacity = num(v);
    }
    shape.fill.texture = attrs.get("filltexture").cloned();
    shape.shadow = attrs.get("shadowcolor").map(|color| Shadow {
        color: color.clone(),
        dx: attrs.get("shadowoffsetx").map(|v| num(v)).unwrap_or(0.0),
        dy: attrs.get("shadowoffsety").map(|v| num(v)).unwrap_or(0.0),
    });
    shape.gm_only = is_true(attrs.get("gmonly"));

    Ok(shape)
}

fn parse_point(e: &BytesStart<'_>) -> Result<Point> {
    let attrs = attrs_to_map(e)?;
    Ok(Point::new(
        attrs.get("x").map(|v| num(v)).unwrap_or(0.0),
        attrs.get("y").map(|v| num(v)).unwrap_or(0.0),
    ))
}

fn parse_note(e: &BytesStart<'_>) -> Result<Note> {
    let attrs = attrs_to_map(e)?;
    let position = attrs
        .get("viewlevel")
        .and_then(|v| ViewLevel::from_name(v))
        .map(|level| NotePosition {
            level,
            x: attrs.get("x").map(|v| num(v)).unwrap_or(0.0),
            y: attrs.get("y").map(|v| num(v)).unwrap_or(0.0),
        });

    Ok(Note {
        id: attrs.get("id").cloned().unwrap_or_default(),
        title: attrs.get("title").cloned().unwrap_or_default(),
        category: attrs.get("category").map(|v| NoteCategory::from_name(v)),
        content: String::new(),
        position,
        // Notes fail closed: hidden from players unless explicitly opened.
        gm_only: !is_false(attrs.get("gmonly")),
    })
}

fn parse_layer(e: &BytesStart<'_>) -> Result<Layer> {
    let attrs = attrs_to_map(e)?;
    let mut layer = Layer::new(attrs.get("name").cloned().unwrap_or_default());
    layer.visible = !is_false(attrs.get("visible"));
    layer.locked = is_true(attrs.get("locked"));
    if let Some(v) = attrs.get("opacity") {
        layer.opacity = num(v);
    }
    layer.z_order = attrs.get("zorder").map(|v| num(v) as i32).unwrap_or(0);
    Ok(layer)
}

fn parse_terrain_def(e: &BytesStart<'_>) -> Result<TerrainDef> {
    let attrs = attrs_to_map(e)?;
    let name = attrs.get("name").cloned().unwrap_or_default();
    let mut def = TerrainDef::new(name, attrs.get("color").cloned().unwrap_or_default());
    if let Some(v) = attrs.get("displayname") {
        def.display_name = v.clone();
    }
    def.texture = attrs.get("texture").cloned();
    if let Some(v) = attrs.get("movementcost") {
        def.movement_cost = num(v) as i32;
    }
    if let Some(v) = attrs.get("defensebonus") {
        def.defense_bonus = num(v) as i32;
    }
    def.description = attrs.get("description").cloned();
    Ok(def)
}

/// Probes all 14 scale-prefixed coordinate attributes, keeping only those
/// present. Absent attributes stay absent; they must not collapse to zero.
fn parse_positions(attrs: &HashMap<String, String>) -> ScalePositions {
    let mut positions = ScalePositions::new();
    for level in ViewLevel::ALL {
        let i = level.index();
        if let Some(v) = attrs.get(&format!("{}x", level.prefix())) {
            positions.xs[i] = Some(num(v));
        }
        if let Some(v) = attrs.get(&format!("{}y", level.prefix())) {
            positions.ys[i] = Some(num(v));
        }
    }
    positions
}

/// Visibility fails open: a scale is hidden only when the attribute is the
/// literal string `"false"`.
fn parse_visibility(attrs: &HashMap<String, String>) -> VisibilityFlags {
    let mut flags = VisibilityFlags::all_visible();
    for level in ViewLevel::ALL {
        if is_false(attrs.get(&format!("{}visible", level.prefix()))) {
            flags.set_visible(level, false);
        }
    }
    flags
}

/// Collects an element's attributes, lower-casing keys for case-tolerant
/// lookup. Unreadable attributes are skipped rather than fatal.
fn attrs_to_map(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut out = HashMap::new();
    for a in e.attributes().with_checks(false) {
        let a = match a {
            Ok(a) => a,
            Err(err) => {
                warn!("skipping unreadable attribute: {err}");
                continue;
            }
        };
        let key = str::from_utf8(a.key.as_ref())?.to_ascii_lowercase();
        let val = a.unescape_value()?.to_string();
        out.insert(key, val);
    }
    Ok(out)
}

fn local_name(e: &BytesStart<'_>) -> Result<String> {
    Ok(str::from_utf8(e.name().as_ref())?.to_ascii_lowercase())
}

/// Numeric wire field: parse failure falls back to zero.
fn num(v: &str) -> f64 {
    v.trim().parse().unwrap_or(0.0)
}

fn int_field(v: Option<&&str>) -> i32 {
    v.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Boolean wire field: true only for the literal string `"true"`.
fn bool_field(v: Option<&&str>) -> bool {
    v.is_some_and(|s| s.trim() == "true")
}

fn is_true(v: Option<&String>) -> bool {
    v.is_some_and(|s| s.trim() == "true")
}

fn is_false(v: Option<&String>) -> bool {
    v.is_some_and(|s| s.trim() == "false")
}
