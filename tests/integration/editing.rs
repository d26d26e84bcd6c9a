//! Editor operations composed with the codec

use wxx::editor::{self, MirrorAxis, Rect};
use wxx::{ExportOptions, MapOptions, ViewLevel, create_map, export, parse};

const L: ViewLevel = ViewLevel::Kingdom;

#[test]
fn edited_map_round_trips() {
    let mut map = create_map(&MapOptions::new(L, 20, 20));

    editor::fill_rect(&mut map, &Rect::new(2, 2, 6, 6), "Forest", L);
    editor::fill_circle(&mut map, 14, 14, 3.0, "Lake", L);
    editor::paint_line(&mut map, 1, 18, 18, 1, "Road", 2, L);
    editor::flood_fill(&mut map, 3, 3, "Jungle", L);
    editor::mirror_region(&mut map, &Rect::new(2, 2, 6, 6), MirrorAxis::Vertical, L);
    editor::clone_region(&mut map, &Rect::new(2, 2, 3, 3), 10, 0, L);

    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();
    assert_eq!(reparsed.tiles, map.tiles);
}

#[test]
fn flood_fill_changes_exactly_the_connected_region() {
    let mut map = create_map(&MapOptions::new(L, 10, 10));
    // Two grass pools separated by a stone wall.
    editor::fill_rect(&mut map, &Rect::new(0, 0, 3, 3), "Grass", L);
    editor::fill_rect(&mut map, &Rect::new(3, 0, 1, 10), "Stone", L);
    editor::fill_rect(&mut map, &Rect::new(4, 0, 3, 3), "Grass", L);

    let changed = editor::flood_fill(&mut map, 0, 0, "Mud", L);

    assert_eq!(changed, 9);
    assert_eq!(editor::find_tiles_by_terrain(&map, "Mud", L).len(), 9);
    // The far pool is untouched.
    assert_eq!(editor::find_tiles_by_terrain(&map, "Grass", L).len(), 9);
}

#[test]
fn noise_generation_is_reproducible_per_seed() {
    let rect = Rect::new(0, 0, 12, 12);
    let pairs = [(0.0, "Water"), (0.35, "Plains"), (0.75, "Peaks")];

    let mut first = create_map(&MapOptions::new(L, 12, 12));
    editor::generate_noise_terrain(&mut first, &rect, &pairs, L, 99.0);
    let mut second = create_map(&MapOptions::new(L, 12, 12));
    editor::generate_noise_terrain(&mut second, &rect, &pairs, L, 99.0);

    assert_eq!(first.tiles, second.tiles);

    let mut other_seed = create_map(&MapOptions::new(L, 12, 12));
    editor::generate_noise_terrain(&mut other_seed, &rect, &pairs, L, 100.0);
    assert_ne!(first.tiles, other_seed.tiles);
}

#[test]
fn statistics_reflect_pipeline_results() {
    let mut map = create_map(&MapOptions::new(L, 8, 8));
    editor::fill_rect(&mut map, &Rect::new(0, 0, 4, 4), "Forest", L);

    let bytes = export(&map, &ExportOptions::default()).unwrap();
    let reparsed = parse(&bytes).unwrap();

    let stats = editor::statistics(&reparsed);
    assert_eq!(stats.tile_count, 16);
    assert_eq!(stats.terrain_distribution.get("Forest"), Some(&16));
    assert_eq!(stats.tiles_by_level.get(&L), Some(&16));
}
