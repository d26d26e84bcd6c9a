//! Tolerance scenarios: real `.wxx` files are messy, and everything below
//! the structural level must degrade to defaults instead of failing.

use crate::common::wxx_bytes;
use wxx::{ExportOptions, Label, MapOptions, ScalePositions, ViewLevel, create_map, export, parse};

#[test]
fn sparse_label_position_absence_survives_round_trips() {
    let mut map = create_map(&MapOptions::new(ViewLevel::World, 4, 4));
    let mut label = Label::new("Lonely Peak");
    label.positions = ScalePositions::at(ViewLevel::World, 120.0, 80.0);
    map.labels.push(label);

    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();

    let positions = &reparsed.labels[0].positions;
    assert_eq!(positions.get(ViewLevel::World), Some((120.0, 80.0)));
    for level in [
        ViewLevel::Continent,
        ViewLevel::Kingdom,
        ViewLevel::Province,
        ViewLevel::Battlemat,
        ViewLevel::Settlement,
        ViewLevel::Cosmic,
    ] {
        assert_eq!(positions.x(level), None, "{level} X should be absent");
        assert_eq!(positions.y(level), None, "{level} Y should be absent");
    }
}

#[test]
fn malformed_tile_record_is_skipped_without_shifting_the_row() {
    let bytes = wxx_bytes(
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<map type=\"WORLD\" width=\"3\" height=\"1\">\
<tiles><row level=\"WORLD\">Forest\t0\tfalse\tfalse\nBroken\t1\nDesert\t2\tfalse\tfalse</row></tiles>\
</map>",
    );
    let map = parse(&bytes).unwrap();

    assert_eq!(map.tile_count(), 2);
    assert_eq!(
        map.tile(0, 0, ViewLevel::World).map(|t| t.terrain.as_str()),
        Some("Forest")
    );
    // The two-field record is dropped but still holds its column slot.
    assert!(map.tile(1, 0, ViewLevel::World).is_none());
    assert_eq!(
        map.tile(2, 0, ViewLevel::World).map(|t| t.terrain.as_str()),
        Some("Desert")
    );
}

#[test]
fn unparseable_numbers_fall_back_to_zero() {
    let bytes = wxx_bytes(
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<map width=\"oops\" height=\"2\">\
<tiles><row level=\"WORLD\">Hills\televen\tmaybe\tfalse\tx\t2\tx\tx\tx\tx\tx</row></tiles>\
</map>",
    );
    let map = parse(&bytes).unwrap();

    assert_eq!(map.metadata.width, 0);
    let tile = map.tile(0, 0, ViewLevel::World).unwrap();
    assert_eq!(tile.elevation, 0);
    assert!(!tile.icy, "booleans are true only for the literal \"true\"");
    assert_eq!(tile.resources.animals, 0);
    assert_eq!(tile.resources.brick, 2);
}

#[test]
fn visibility_fails_open() {
    let bytes = wxx_bytes(
        r#"<?xml version="1.0" encoding="UTF-16"?>
<map width="2" height="2"><features>
<feature type="keep" worldVisible="false" kingdomVisible="yes" cosmicVisible="TRUE"/>
</features></map>"#,
    );
    let map = parse(&bytes).unwrap();
    let visibility = &map.features[0].visibility;

    assert!(!visibility.is_visible(ViewLevel::World));
    // Anything but the literal "false" is visible.
    assert!(visibility.is_visible(ViewLevel::Kingdom));
    assert!(visibility.is_visible(ViewLevel::Cosmic));
    assert!(visibility.is_visible(ViewLevel::Settlement));
}

#[test]
fn note_gm_only_fails_closed() {
    let bytes = wxx_bytes(
        r#"<?xml version="1.0" encoding="UTF-16"?>
<map width="2" height="2"><information>
<note id="a" title="Implicit"/>
<note id="b" title="Opened" gmOnly="false"/>
<note id="c" title="Garbled" gmOnly="whatever"/>
</information></map>"#,
    );
    let map = parse(&bytes).unwrap();

    assert!(map.notes[0].gm_only);
    assert!(!map.notes[1].gm_only);
    assert!(map.notes[2].gm_only);
}

#[test]
fn half_defined_position_round_trips_half_defined() {
    let bytes = wxx_bytes(
        r#"<?xml version="1.0" encoding="UTF-16"?>
<map width="2" height="2"><labels>
<label text="Adrift" continentX="42.5"/>
</labels></map>"#,
    );
    let map = parse(&bytes).unwrap();
    let positions = &map.labels[0].positions;
    assert_eq!(positions.x(ViewLevel::Continent), Some(42.5));
    assert_eq!(positions.y(ViewLevel::Continent), None);
    assert_eq!(positions.get(ViewLevel::Continent), None);

    // And the absence of the Y half survives another trip.
    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();
    assert_eq!(reparsed.labels[0].positions, map.labels[0].positions);
}

#[test]
fn rows_with_unknown_levels_are_ignored() {
    let bytes = wxx_bytes(
        "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\
<map width=\"2\" height=\"2\">\
<tiles>\
<row level=\"UNDERDARK\">Cavern\t0\tfalse\tfalse</row>\
<row level=\"WORLD\">Forest\t0\tfalse\tfalse</row>\
</tiles>\
</map>",
    );
    let map = parse(&bytes).unwrap();
    assert_eq!(map.tile_count(), 1);
    // The skipped row does not advance WORLD's row ordinal.
    assert!(map.tile(0, 0, ViewLevel::World).is_some());
}
