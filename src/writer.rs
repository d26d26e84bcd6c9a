//! Generator for `.wxx` containers
//!
//! The inverse of the parser: build the XML event stream from the model,
//! serialize it behind a UTF-16 declaration, encode as UTF-16LE with a
//! byte-order mark, then gzip-compress. The generator's core correctness
//! obligation is the sparse-to-dense tile expansion: every emitted row
//! carries a record for every column, with absent cells synthesized as the
//! blank Ocean record, so the parser's dense-to-sparse read is its exact
//! left inverse.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::types::*;

/// Options for [`export`].
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Gzip-compress the output. Disable to inspect the raw UTF-16 XML.
    pub compress: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

/// Serializes a [`WxxFile`] into a `.wxx` byte buffer.
///
/// # Examples
///
/// ```
/// use wxx::{ExportOptions, MapOptions, ViewLevel, create_map, export};
///
/// let map = create_map(&MapOptions::new(ViewLevel::World, 4, 4));
/// let bytes = export(&map, &ExportOptions::default()).unwrap();
/// assert!(!bytes.is_empty());
/// ```
pub fn export(map: &WxxFile, options: &ExportOptions) -> Result<Vec<u8>> {
    let xml = build_xml(map)?;
    let encoded = encode_utf16_le(&xml);

    if !options.compress {
        return Ok(encoded);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&encoded)?;
    Ok(encoder.finish()?)
}

/// Encodes text as UTF-16LE behind a byte-order mark.
fn encode_utf16_le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

fn build_xml(map: &WxxFile) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-16"), None)))?;

    let root = map_element(&map.metadata);
    writer.write_event(Event::Start(root))?;

    write_tiles(&mut writer, map)?;
    write_features(&mut writer, map)?;
    write_labels(&mut writer, map)?;
    write_shapes(&mut writer, map)?;
    write_notes(&mut writer, map)?;
    write_layers(&mut writer, map)?;
    write_terrain_defs(&mut writer, map)?;

    writer.write_event(Event::End(BytesEnd::new("map")))?;

    // The writer only ever receives valid UTF-8 from the event API.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn map_element(meta: &Metadata) -> BytesStart<'static> {
    let mut e = BytesStart::new("map");
    e.push_attribute(("type", meta.map_type.as_str()));
    e.push_attribute(("version", meta.version.as_str()));
    e.push_attribute(("schemaVersion", meta.schema_version.as_str()));
    e.push_attribute(("width", meta.width.to_string().as_str()));
    e.push_attribute(("height", meta.height.to_string().as_str()));
    e.push_attribute(("hexWidth", fmt_f64(meta.hex_width).as_str()));
    e.push_attribute(("hexHeight", fmt_f64(meta.hex_height).as_str()));
    e.push_attribute(("hexOrientation", meta.hex_orientation.as_str()));
    e.push_attribute(("mapProjection", meta.projection.as_str()));
    if let Some(color) = &meta.fog_of_war_color {
        e.push_attribute(("fogOfWarColor", color.as_str()));
    }
    e
}

/// Emits the `<tiles>` section, expanding the sparse tile store into dense
/// rows. Levels serialize in declaration order; the map's native level
/// always emits its full declared grid, other levels emit only when they
/// hold tiles. Row and column extents grow past the declared grid when
/// out-of-range tiles are stored, so tolerant reads survive a round trip.
fn write_tiles(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    let meta = &map.metadata;
    let native_grid = meta.width > 0 && meta.height > 0;
    let has_any = !map.tiles.is_empty() || native_grid;
    if !has_any {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("tiles")))?;

    let blank = Tile::default();
    for level in ViewLevel::ALL {
        let mut max_col: i64 = -1;
        let mut max_row: i64 = -1;
        for &(col, row, tile_level) in map.tiles.keys() {
            if tile_level == level {
                max_col = max_col.max(col as i64);
                max_row = max_row.max(row as i64);
            }
        }

        let is_native = native_grid && level == meta.map_type;
        if max_row < 0 && !is_native {
            continue;
        }

        let rows = if is_native {
            (meta.height as i64).max(max_row + 1)
        } else {
            max_row + 1
        };
        let cols = if is_native {
            (meta.width as i64).max(max_col + 1)
        } else {
            (meta.width as i64).max(max_col + 1).max(1)
        };

        for row in 0..rows {
            let mut lines = Vec::with_capacity(cols as usize);
            for col in 0..cols {
                let tile = map
                    .tile(col as i32, row as i32, level)
                    .unwrap_or(&blank);
                lines.push(tile_record(tile));
            }
            let body = lines.join("\n");

            let mut row_elem = BytesStart::new("row");
            row_elem.push_attribute(("level", level.as_str()));
            writer.write_event(Event::Start(row_elem))?;
            writer.write_event(Event::Text(BytesText::new(&body)))?;
            writer.write_event(Event::End(BytesEnd::new("row")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("tiles")))?;
    Ok(())
}

/// One tab-delimited per-column record.
fn tile_record(tile: &Tile) -> String {
    let r = &tile.resources;
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        tile.terrain,
        tile.elevation,
        tile.icy,
        tile.gm_only,
        r.animals,
        r.brick,
        r.crops,
        r.gems,
        r.lumber,
        r.metals,
        r.rock
    )
}

fn write_features(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.features.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("features")))?;
    for feature in &map.features {
        let mut e = BytesStart::new("feature");
        e.push_attribute(("type", feature.feature_type.as_str()));
        e.push_attribute(("rotation", fmt_f64(feature.rotation).as_str()));
        e.push_attribute(("scale", fmt_f64(feature.scale).as_str()));
        e.push_attribute(("opacity", fmt_f64(feature.opacity).as_str()));
        push_positions(&mut e, &feature.positions);
        push_visibility(&mut e, &feature.visibility);
        push_bool(&mut e, "gmOnly", feature.gm_only);
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(BytesEnd::new("features")))?;
    Ok(())
}

fn write_labels(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.labels.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("labels")))?;
    for label in &map.labels {
        let mut e = BytesStart::new("label");
        e.push_attribute(("text", label.text.as_str()));
        e.push_attribute(("fontFace", label.font.face.as_str()));
        e.push_attribute(("fontSize", fmt_f64(label.font.size).as_str()));
        e.push_attribute(("fontColor", label.font.color.as_str()));
        push_bool(&mut e, "bold", label.font.bold);
        push_bool(&mut e, "italic", label.font.italic);
        if let Some(outline) = &label.outline {
            e.push_attribute(("outlineColor", outline.color.as_str()));
            e.push_attribute(("outlineWidth", fmt_f64(outline.width).as_str()));
        }
        if let Some(background) = &label.background {
            e.push_attribute(("backgroundColor", background.color.as_str()));
            e.push_attribute(("backgroundOpacity", fmt_f64(background.opacity).as_str()));
        }
        push_positions(&mut e, &label.positions);
        push_visibility(&mut e, &label.visibility);
        push_bool(&mut e, "gmOnly", label.gm_only);
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(BytesEnd::new("labels")))?;
    Ok(())
}

fn write_shapes(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.shapes.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("shapes")))?;
    for shape in &map.shapes {
        let mut e = BytesStart::new("shape");
        e.push_attribute(("type", shape.shape_type.as_str()));
        e.push_attribute(("viewLevel", shape.view_level.as_str()));
        e.push_attribute(("strokeColor", shape.stroke.color.as_str()));
        e.push_attribute(("strokeWidth", fmt_f64(shape.stroke.width).as_str()));
        e.push_attribute(("strokeStyle", shape.stroke.style.as_str()));
        e.push_attribute(("fillColor", shape.fill.color.as_str()));
        e.push_attribute(("fillOpacity", fmt_f64(shape.fill.opacity).as_str()));
        if let Some(texture) = &shape.fill.texture {
            e.push_attribute(("fillTexture", texture.as_str()));
        }
        if let Some(shadow) = &shape.shadow {
            e.push_attribute(("shadowColor", shadow.color.as_str()));
            e.push_attribute(("shadowOffsetX", fmt_f64(shadow.dx).as_str()));
            e.push_attribute(("shadowOffsetY", fmt_f64(shadow.dy).as_str()));
        }
        push_bool(&mut e, "gmOnly", shape.gm_only);

        if shape.points.is_empty() {
            writer.write_event(Event::Empty(e))?;
        } else {
            writer.write_event(Event::Start(e))?;
            for point in &shape.points {
                let mut p = BytesStart::new("point");
                p.push_attribute(("x", fmt_f64(point.x).as_str()));
                p.push_attribute(("y", fmt_f64(point.y).as_str()));
                writer.write_event(Event::Empty(p))?;
            }
            writer.write_event(Event::End(BytesEnd::new("shape")))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("shapes")))?;
    Ok(())
}

fn write_notes(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.notes.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("information")))?;
    for note in &map.notes {
        let mut e = BytesStart::new("note");
        e.push_attribute(("id", note.id.as_str()));
        e.push_attribute(("title", note.title.as_str()));
        if let Some(category) = &note.category {
            e.push_attribute(("category", category.as_str()));
        }
        if let Some(position) = &note.position {
            e.push_attribute(("viewLevel", position.level.as_str()));
            e.push_attribute(("x", fmt_f64(position.x).as_str()));
            e.push_attribute(("y", fmt_f64(position.y).as_str()));
        }
        push_bool(&mut e, "gmOnly", note.gm_only);

        if note.content.is_empty() {
            writer.write_event(Event::Empty(e))?;
        } else {
            writer.write_event(Event::Start(e))?;
            writer.write_event(Event::Text(BytesText::new(&note.content)))?;
            writer.write_event(Event::End(BytesEnd::new("note")))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("information")))?;
    Ok(())
}

fn write_layers(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.layers.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("layers")))?;
    for layer in &map.layers {
        let mut e = BytesStart::new("layer");
        e.push_attribute(("name", layer.name.as_str()));
        push_bool(&mut e, "visible", layer.visible);
        push_bool(&mut e, "locked", layer.locked);
        e.push_attribute(("opacity", fmt_f64(layer.opacity).as_str()));
        e.push_attribute(("zOrder", layer.z_order.to_string().as_str()));
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(BytesEnd::new("layers")))?;
    Ok(())
}

fn write_terrain_defs(writer: &mut Writer<Vec<u8>>, map: &WxxFile) -> Result<()> {
    if map.terrain_defs.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("terrainDefs")))?;
    for def in &map.terrain_defs {
        let mut e = BytesStart::new("terrainDef");
        e.push_attribute(("name", def.name.as_str()));
        e.push_attribute(("displayName", def.display_name.as_str()));
        e.push_attribute(("color", def.color.as_str()));
        if let Some(texture) = &def.texture {
            e.push_attribute(("texture", texture.as_str()));
        }
        e.push_attribute(("movementCost", def.movement_cost.to_string().as_str()));
        e.push_attribute(("defenseBonus", def.defense_bonus.to_string().as_str()));
        if let Some(description) = &def.description {
            e.push_attribute(("description", description.as_str()));
        }
        writer.write_event(Event::Empty(e))?;
    }
    writer.write_event(Event::End(BytesEnd::new("terrainDefs")))?;
    Ok(())
}

/// Sparse positions emit only the slots actually present; absence is
/// absence, never zero.
fn push_positions(e: &mut BytesStart<'_>, positions: &ScalePositions) {
    for level in ViewLevel::ALL {
        let i = level.index();
        if let Some(x) = positions.xs[i] {
            e.push_attribute((format!("{}X", level.prefix()).as_str(), fmt_f64(x).as_str()));
        }
        if let Some(y) = positions.ys[i] {
            e.push_attribute((format!("{}Y", level.prefix()).as_str(), fmt_f64(y).as_str()));
        }
    }
}

/// Visibility emits only the hidden scales; the parse default is visible.
fn push_visibility(e: &mut BytesStart<'_>, flags: &VisibilityFlags) {
    for level in ViewLevel::ALL {
        if !flags.is_visible(level) {
            e.push_attribute((format!("{}Visible", level.prefix()).as_str(), "false"));
        }
    }
}

fn push_bool(e: &mut BytesStart<'_>, key: &str, value: bool) {
    e.push_attribute((key, if value { "true" } else { "false" }));
}

fn fmt_f64(value: f64) -> String {
    value.to_string()
}
