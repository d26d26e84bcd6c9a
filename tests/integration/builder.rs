//! Blank-map factory through the full pipeline

use pretty_assertions::assert_eq;

use wxx::{
    ExportOptions, HexOrientation, MapBuilder, MapOptions, MapProjection, ViewLevel, create_map,
    export, parse,
};

#[test]
fn blank_map_survives_the_pipeline() {
    let mut options = MapOptions::new(ViewLevel::Continent, 16, 12);
    options.hex_orientation = HexOrientation::Rows;
    options.projection = MapProjection::Icosahedral;
    options.hex_width = 72.0;
    options.hex_height = 64.5;
    let map = create_map(&options);

    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();

    assert_eq!(reparsed.metadata, map.metadata);
    assert_eq!(reparsed.tile_count(), 0);
}

#[test]
fn prefilled_map_round_trips_every_cell() {
    let map = MapBuilder::new(ViewLevel::Kingdom, 5, 4)
        .default_terrain("Grassland")
        .build();
    assert_eq!(map.tile_count(), 20);

    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();

    assert_eq!(reparsed.tile_count(), 20);
    for row in 0..4 {
        for col in 0..5 {
            assert_eq!(
                reparsed
                    .tile(col, row, ViewLevel::Kingdom)
                    .map(|t| t.terrain.as_str()),
                Some("Grassland")
            );
        }
    }
}
