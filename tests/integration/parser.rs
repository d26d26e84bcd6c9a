//! Structural parsing behavior against hand-crafted containers

use crate::common::wxx_bytes;
use wxx::{ViewLevel, WxxError, parse};

#[test]
fn rejects_non_gzip_input() {
    assert!(matches!(parse(b"plain bytes"), Err(WxxError::Gzip(_))));
    assert!(matches!(parse(&[]), Err(WxxError::Gzip(_))));
}

#[test]
fn rejects_document_without_map_root() {
    let bytes = wxx_bytes(r#"<?xml version="1.0" encoding="UTF-16"?><atlas width="4"/>"#);
    assert!(matches!(parse(&bytes), Err(WxxError::MissingRoot)));
}

#[test]
fn accepts_case_insensitive_map_root() {
    for root in ["map", "Map", "MAP"] {
        let bytes = wxx_bytes(&format!(
            r#"<?xml version="1.0" encoding="UTF-16"?><{root} type="KINGDOM" width="7" height="5"></{root}>"#
        ));
        let map = parse(&bytes).unwrap();
        assert_eq!(map.metadata.map_type, ViewLevel::Kingdom);
        assert_eq!(map.metadata.width, 7);
        assert_eq!(map.metadata.height, 5);
    }
}

#[test]
fn missing_sections_yield_empty_collections() {
    let bytes = wxx_bytes(r#"<?xml version="1.0" encoding="UTF-16"?><map width="3" height="3"/>"#);
    let map = parse(&bytes).unwrap();

    assert_eq!(map.tile_count(), 0);
    assert!(map.features.is_empty());
    assert!(map.labels.is_empty());
    assert!(map.shapes.is_empty());
    assert!(map.notes.is_empty());
    assert!(map.layers.is_empty());
    assert!(map.terrain_defs.is_empty());
}

#[test]
fn unknown_elements_and_attributes_are_skipped() {
    let bytes = wxx_bytes(
        r#"<?xml version="1.0" encoding="UTF-16"?>
<map width="2" height="1" futureFlag="yes">
  <hologram intensity="11"/>
  <features>
    <feature type="tower" worldX="1" worldY="2" chrome="shiny"/>
  </features>
</map>"#,
    );
    let map = parse(&bytes).unwrap();
    assert_eq!(map.features.len(), 1);
    assert_eq!(map.features[0].feature_type, "tower");
}

#[test]
fn tile_rows_decode_levels_independently() {
    let bytes = wxx_bytes(
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<map type=\"WORLD\" width=\"2\" height=\"2\">\
<tiles>\
<row level=\"WORLD\">Forest\t10\tfalse\tfalse\nDesert\t0\ttrue\tfalse</row>\
<row level=\"CONTINENT\">Steppe\t5\tfalse\tfalse</row>\
<row level=\"WORLD\">Ocean\t0\tfalse\tfalse\nSwamp\t-3\tfalse\ttrue</row>\
</tiles>\
</map>",
    );
    let map = parse(&bytes).unwrap();

    let forest = map.tile(0, 0, ViewLevel::World).unwrap();
    assert_eq!(forest.terrain, "Forest");
    assert_eq!(forest.elevation, 10);

    let desert = map.tile(1, 0, ViewLevel::World).unwrap();
    assert!(desert.icy);

    // The CONTINENT row does not advance WORLD's row ordinal.
    let swamp = map.tile(1, 1, ViewLevel::World).unwrap();
    assert_eq!(swamp.terrain, "Swamp");
    assert_eq!(swamp.elevation, -3);
    assert!(swamp.gm_only);

    let steppe = map.tile(0, 0, ViewLevel::Continent).unwrap();
    assert_eq!(steppe.terrain, "Steppe");

    // The blank Ocean record at WORLD (0, 1) is padding, not data.
    assert!(map.tile(0, 1, ViewLevel::World).is_none());
}

#[test]
fn tile_resource_counters_parse_positionally() {
    let bytes = wxx_bytes(
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<map width=\"1\" height=\"1\">\
<tiles><row level=\"WORLD\">Hills\t100\tfalse\tfalse\t1\t2\t3\t4\t5\t6\t7</row></tiles>\
</map>",
    );
    let map = parse(&bytes).unwrap();
    let resources = map.tile(0, 0, ViewLevel::World).unwrap().resources;

    assert_eq!(resources.animals, 1);
    assert_eq!(resources.brick, 2);
    assert_eq!(resources.crops, 3);
    assert_eq!(resources.gems, 4);
    assert_eq!(resources.lumber, 5);
    assert_eq!(resources.metals, 6);
    assert_eq!(resources.rock, 7);
}

#[test]
fn note_content_collects_element_text() {
    let bytes = wxx_bytes(
        r#"<?xml version="1.0" encoding="UTF-16"?>
<map width="1" height="1"><information>
<note id="0a" title="Rumors" category="religion">The cult &amp; its door</note>
</information></map>"#,
    );
    let map = parse(&bytes).unwrap();
    assert_eq!(map.notes.len(), 1);
    assert_eq!(map.notes[0].content, "The cult & its door");
    assert!(map.notes[0].gm_only);
}
