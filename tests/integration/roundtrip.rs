//! Round-trip fidelity: parse(export(M)) must reproduce the semantic
//! model — same tiles (modulo synthesized blank padding), same entities
//! in the same order.

use pretty_assertions::assert_eq;

use wxx::editor::{self, Rect};
use wxx::{
    Background, ExportOptions, Feature, Label, Layer, MapOptions, Note, NoteCategory,
    NotePosition, Outline, Point, ScalePositions, Shadow, Shape, TerrainDef, Tile, ViewLevel,
    create_map, export, parse,
};

fn roundtrip(map: &wxx::WxxFile) -> wxx::WxxFile {
    let bytes = export(map, &ExportOptions::default()).unwrap();
    parse(&bytes).unwrap()
}

#[test]
fn populated_map_round_trips_semantically() {
    let mut map = create_map(&MapOptions::new(ViewLevel::Kingdom, 12, 10));

    editor::fill_rect(&mut map, &Rect::new(1, 1, 4, 3), "Forest", ViewLevel::Kingdom);
    editor::paint_line(&mut map, 0, 0, 11, 9, "Road", 1, ViewLevel::Kingdom);
    let mut hills = Tile::with_terrain("Hills");
    hills.elevation = 420;
    hills.icy = true;
    hills.resources.metals = 3;
    map.set_tile(7, 2, ViewLevel::Kingdom, hills);

    let mut feature = Feature::new("castle");
    feature.positions.set(ViewLevel::Kingdom, 210.5, 95.25);
    feature.rotation = 45.0;
    feature.gm_only = true;
    feature.visibility.set_visible(ViewLevel::World, false);
    map.features.push(feature);

    let mut label = Label::new("Port Vael");
    label.positions.set(ViewLevel::Kingdom, 300.0, 140.0);
    label.font.size = 18.0;
    label.font.bold = true;
    label.outline = Some(Outline {
        color: "#FFFFFF".to_string(),
        width: 2.0,
    });
    label.background = Some(Background {
        color: "#102030".to_string(),
        opacity: 0.5,
    });
    map.labels.push(label);

    let mut shape = Shape::new(ViewLevel::Kingdom);
    shape.shape_type = "line".to_string();
    shape.points = vec![Point::new(0.0, 0.0), Point::new(50.5, 60.25)];
    shape.stroke.width = 3.0;
    shape.shadow = Some(Shadow {
        color: "#00000080".to_string(),
        dx: 2.0,
        dy: 2.0,
    });
    map.shapes.push(shape);

    let mut note = Note::new("The Sunken Vault");
    note.category = Some(NoteCategory::Timeline);
    note.content = "Opened in <b>the third age</b> & never resealed.".to_string();
    note.position = Some(NotePosition {
        level: ViewLevel::Kingdom,
        x: 210.0,
        y: 95.0,
    });
    map.notes.push(note);

    map.layers.push(Layer::new("Political"));
    let mut hidden = Layer::new("GM Overlay");
    hidden.visible = false;
    hidden.locked = true;
    hidden.opacity = 0.35;
    hidden.z_order = 5;
    map.layers.push(hidden);

    let mut lava = TerrainDef::new("Lava", "#FF4500");
    lava.movement_cost = 9;
    lava.description = Some("Impassable molten rock".to_string());
    map.terrain_defs.push(lava);

    let reparsed = roundtrip(&map);

    assert_eq!(reparsed.metadata, map.metadata);
    assert_eq!(reparsed.tiles, map.tiles);
    assert_eq!(reparsed.features, map.features);
    assert_eq!(reparsed.labels, map.labels);
    assert_eq!(reparsed.shapes, map.shapes);
    assert_eq!(reparsed.notes, map.notes);
    assert_eq!(reparsed.layers, map.layers);
    assert_eq!(reparsed.terrain_defs, map.terrain_defs);
}

#[test]
fn multi_level_tiles_round_trip() {
    let mut map = create_map(&MapOptions::new(ViewLevel::World, 6, 6));
    map.set_tile(0, 0, ViewLevel::World, Tile::with_terrain("Forest"));
    map.set_tile(0, 0, ViewLevel::Continent, Tile::with_terrain("Desert"));
    map.set_tile(5, 5, ViewLevel::Cosmic, Tile::with_terrain("Nebula"));

    let reparsed = roundtrip(&map);
    assert_eq!(reparsed.tiles, map.tiles);
}

#[test]
fn explicit_blank_tile_is_dropped_as_padding() {
    // An all-default Ocean record is indistinguishable from the
    // generator's row padding, so it does not survive a round trip.
    let mut map = create_map(&MapOptions::new(ViewLevel::World, 4, 4));
    map.set_tile(1, 1, ViewLevel::World, Tile::default());
    map.set_tile(2, 2, ViewLevel::World, Tile::with_terrain("Forest"));

    let reparsed = roundtrip(&map);
    assert_eq!(reparsed.tile_count(), 1);
    assert!(reparsed.tile(2, 2, ViewLevel::World).is_some());
}

#[test]
fn out_of_range_tiles_survive_round_trips() {
    let mut map = create_map(&MapOptions::new(ViewLevel::World, 4, 4));
    map.set_tile(9, 7, ViewLevel::World, Tile::with_terrain("Reef"));

    let reparsed = roundtrip(&map);
    assert_eq!(
        reparsed.tile(9, 7, ViewLevel::World).map(|t| t.terrain.as_str()),
        Some("Reef")
    );
}

#[test]
fn entity_order_is_preserved() {
    let mut map = create_map(&MapOptions::new(ViewLevel::World, 2, 2));
    for name in ["alpha", "beta", "gamma"] {
        let mut feature = Feature::new(name);
        feature.positions = ScalePositions::at(ViewLevel::World, 1.0, 1.0);
        map.features.push(feature);
        map.layers.push(Layer::new(name));
    }

    let reparsed = roundtrip(&map);
    let types: Vec<&str> = reparsed
        .features
        .iter()
        .map(|f| f.feature_type.as_str())
        .collect();
    assert_eq!(types, vec!["alpha", "beta", "gamma"]);
    let names: Vec<&str> = reparsed.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn uncompressed_export_is_not_a_wxx_container() {
    let map = create_map(&MapOptions::new(ViewLevel::World, 2, 2));
    let raw = export(&map, &ExportOptions { compress: false }).unwrap();
    assert!(matches!(parse(&raw), Err(wxx::WxxError::Gzip(_))));
}

#[test]
fn save_and_reload_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("island.wxx");

    let mut map = create_map(&MapOptions::new(ViewLevel::Province, 8, 8));
    editor::fill_circle(&mut map, 4, 4, 2.0, "Island", ViewLevel::Province);
    map.save_to_path(&path).unwrap();

    let reloaded = wxx::WxxFile::from_path(&path).unwrap();
    assert_eq!(reloaded.tiles, map.tiles);
}
