//! Geometry-aware editing operations
//!
//! A library of pure in-memory transformations over [`WxxFile`]: region
//! fills, line rasterization, flood fill, affine region transforms,
//! procedural terrain and spatial queries. Nothing here touches I/O.
//!
//! Failure semantics are uniformly forgiving: absent tiles short-circuit
//! to no-ops, queries on missing scales return empty results, and
//! degenerate geometry (zero radius, inverted rectangles) is the caller's
//! responsibility rather than validated here.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::types::{Feature, Tile, ViewLevel, WxxFile};

/// An axis-aligned cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left column
    pub x: i32,
    /// Top row
    pub y: i32,
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Iterates the rectangle's cells in row-major order.
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let Rect {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| (col, row)))
    }
}

/// Mirror axis for [`mirror_region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAxis {
    /// Reflect columns across the region's vertical center line
    Horizontal,
    /// Reflect rows across the region's horizontal center line
    Vertical,
}

/// Map-wide aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapStatistics {
    /// Stored (non-blank) tiles across all levels
    pub tile_count: usize,
    /// Stored tiles per view level
    pub tiles_by_level: HashMap<ViewLevel, usize>,
    /// Stored tiles per terrain type
    pub terrain_distribution: HashMap<String, usize>,
    /// Feature count
    pub feature_count: usize,
    /// Label count
    pub label_count: usize,
    /// Shape count
    pub shape_count: usize,
    /// Note count
    pub note_count: usize,
    /// Layer count
    pub layer_count: usize,
}

/// Paints every cell of `rect` with `terrain`. O(area).
pub fn fill_rect(map: &mut WxxFile, rect: &Rect, terrain: &str, level: ViewLevel) {
    for (col, row) in rect.cells() {
        map.replace_tile(col, row, level, terrain);
    }
}

/// Paints the closed disk of `radius` around `(cx, cy)` with `terrain`.
///
/// Membership is the squared-distance test `dx^2 + dy^2 <= r^2`; no
/// anti-aliasing.
pub fn fill_circle(
    map: &mut WxxFile,
    cx: i32,
    cy: i32,
    radius: f64,
    terrain: &str,
    level: ViewLevel,
) {
    let bound = radius.ceil() as i32;
    let r2 = radius * radius;
    for dy in -bound..=bound {
        for dx in -bound..=bound {
            if f64::from(dx * dx + dy * dy) <= r2 {
                map.replace_tile(cx + dx, cy + dy, level, terrain);
            }
        }
    }
}

/// Rasterizes a line from `(x1, y1)` to `(x2, y2)` with `terrain`.
///
/// The point sequence is integer Bresenham. Width 1 paints single cells;
/// wider lines stamp a [`fill_circle`] of radius `width / 2` at every
/// line point, so thick lines are a composition of the circle primitive.
pub fn paint_line(
    map: &mut WxxFile,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    terrain: &str,
    width: u32,
    level: ViewLevel,
) {
    let dx = (x2 - x1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let dy = -(y2 - y1).abs();
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        if width <= 1 {
            map.replace_tile(x, y, level, terrain);
        } else {
            fill_circle(map, x, y, f64::from(width) / 2.0, terrain, level);
        }

        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Flood-fills the 4-connected region of uniform terrain containing
/// `(x, y)` with `new_terrain`, returning the number of cells changed.
///
/// The fill is bounded by the terrain sampled at the start cell and never
/// crosses a differing-terrain boundary or an absent cell. A no-op when
/// the start cell is absent or already carries `new_terrain`.
pub fn flood_fill(
    map: &mut WxxFile,
    x: i32,
    y: i32,
    new_terrain: &str,
    level: ViewLevel,
) -> usize {
    let Some(start) = map.tile(x, y, level) else {
        debug!("flood fill at absent cell ({x}, {y}), nothing to do");
        return 0;
    };
    let old_terrain = start.terrain.clone();
    if old_terrain == new_terrain {
        return 0;
    }

    let mut visited: HashSet<(i32, i32)> = HashSet::new();
    let mut queue: VecDeque<(i32, i32)> = VecDeque::new();
    visited.insert((x, y));
    queue.push_back((x, y));
    let mut changed = 0;

    while let Some((cx, cy)) = queue.pop_front() {
        match map.tile(cx, cy, level) {
            Some(tile) if tile.terrain == old_terrain => {}
            _ => continue,
        }
        map.replace_tile(cx, cy, level, new_terrain);
        changed += 1;

        for neighbor in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    changed
}

/// Copies every stored tile of `rect` to `(col + dx, row + dy)`.
///
/// The source is snapshotted before any write, so source and destination
/// ranges may overlap. Absent source cells leave the destination alone.
pub fn clone_region(map: &mut WxxFile, rect: &Rect, dx: i32, dy: i32, level: ViewLevel) {
    let snapshot: Vec<((i32, i32), Tile)> = region_snapshot(map, rect, level);
    for ((col, row), tile) in snapshot {
        map.set_tile(col + dx, row + dy, level, tile);
    }
}

/// Reflects `rect` across its own center line.
///
/// This is a dense region transform: every destination cell takes the
/// snapshot value of its mirror source, and an absent source clears the
/// destination. Applying the same mirror twice restores the layout
/// exactly.
pub fn mirror_region(map: &mut WxxFile, rect: &Rect, axis: MirrorAxis, level: ViewLevel) {
    let snapshot: HashMap<(i32, i32), Tile> =
        region_snapshot(map, rect, level).into_iter().collect();

    for (col, row) in rect.cells() {
        let source = match axis {
            MirrorAxis::Horizontal => (rect.x + rect.width - 1 - (col - rect.x), row),
            MirrorAxis::Vertical => (col, rect.y + rect.height - 1 - (row - rect.y)),
        };
        match snapshot.get(&source) {
            Some(tile) => map.set_tile(col, row, level, tile.clone()),
            None => {
                map.remove_tile(col, row, level);
            }
        }
    }
}

/// Rotates `rect` 90 degrees clockwise about its center, rounding each
/// destination to the nearest cell.
///
/// The full source region is read (and cleared) before any write. Four
/// applications restore a square region; non-square regions lose cells to
/// rounding, which is an accepted limitation.
pub fn rotate_region(map: &mut WxxFile, rect: &Rect, level: ViewLevel) {
    let snapshot = region_snapshot(map, rect, level);
    for ((col, row), _) in &snapshot {
        map.remove_tile(*col, *row, level);
    }

    let cx = f64::from(rect.x) + (f64::from(rect.width) - 1.0) / 2.0;
    let cy = f64::from(rect.y) + (f64::from(rect.height) - 1.0) / 2.0;

    for ((col, row), tile) in snapshot {
        let rx = f64::from(col) - cx;
        let ry = f64::from(row) - cy;
        // 90 degrees clockwise in row/col space: (rx, ry) -> (-ry, rx)
        let dest_col = (cx - ry).round() as i32;
        let dest_row = (cy + rx).round() as i32;
        map.set_tile(dest_col, dest_row, level, tile);
    }
}

/// Deterministic value noise in `[0, 1)`.
///
/// The classic `frac(sin(dot(p, k)) * 43758.5453)` hash; placeholder
/// quality by design, not gradient noise. Use [`generate_terrain_with`]
/// to substitute a better generator.
pub fn value_noise(x: i32, y: i32, seed: f64) -> f64 {
    let v = (f64::from(x) * 12.9898 + f64::from(y) * 78.233 + seed).sin() * 43758.5453;
    v - v.floor()
}

/// Assigns terrain across `rect` from the built-in value noise.
///
/// `terrain_map` is an ordered low-to-high list of `(threshold, terrain)`
/// pairs; for each cell the last pair whose threshold does not exceed the
/// sampled noise wins. Cells below every threshold are left untouched.
pub fn generate_noise_terrain(
    map: &mut WxxFile,
    rect: &Rect,
    terrain_map: &[(f64, &str)],
    level: ViewLevel,
    seed: f64,
) {
    generate_terrain_with(map, rect, terrain_map, level, |x, y| {
        value_noise(x, y, seed)
    });
}

/// [`generate_noise_terrain`] with a caller-provided noise function.
pub fn generate_terrain_with(
    map: &mut WxxFile,
    rect: &Rect,
    terrain_map: &[(f64, &str)],
    level: ViewLevel,
    noise: impl Fn(i32, i32) -> f64,
) {
    for (col, row) in rect.cells() {
        let sample = noise(col, row);
        let mut selected = None;
        for (threshold, terrain) in terrain_map {
            if sample >= *threshold {
                selected = Some(*terrain);
            }
        }
        if let Some(terrain) = selected {
            map.replace_tile(col, row, level, terrain);
        }
    }
}

/// Coordinates of every stored tile with the given terrain at `level`.
pub fn find_tiles_by_terrain(map: &WxxFile, terrain: &str, level: ViewLevel) -> Vec<(i32, i32)> {
    let mut found: Vec<(i32, i32)> = map
        .tiles
        .iter()
        .filter(|&(&(_, _, tile_level), ref tile)| tile_level == level && tile.terrain == terrain)
        .map(|(&(col, row, _), _)| (col, row))
        .collect();
    found.sort_unstable();
    found
}

/// Rewrites every `from` tile at `level` to `to`, returning the count.
pub fn replace_terrain(map: &mut WxxFile, from: &str, to: &str, level: ViewLevel) -> usize {
    let mut replaced = 0;
    for (&(_, _, tile_level), tile) in map.tiles.iter_mut() {
        if tile_level == level && tile.terrain == from {
            tile.terrain = to.to_string();
            replaced += 1;
        }
    }
    replaced
}

/// Drops every feature of the given type, returning the count removed.
pub fn remove_features_by_type(map: &mut WxxFile, feature_type: &str) -> usize {
    let before = map.features.len();
    map.features.retain(|f| f.feature_type != feature_type);
    before - map.features.len()
}

/// Features within Euclidean `radius` of `(x, y)` at `level`.
///
/// Only the queried level's coordinate pair is considered; features with
/// no position at that scale are excluded.
pub fn find_features_near(
    map: &WxxFile,
    x: f64,
    y: f64,
    radius: f64,
    level: ViewLevel,
) -> Vec<&Feature> {
    map.features
        .iter()
        .filter(|feature| {
            feature.positions.get(level).is_some_and(|(fx, fy)| {
                let dx = fx - x;
                let dy = fy - y;
                (dx * dx + dy * dy).sqrt() <= radius
            })
        })
        .collect()
}

/// Aggregates map-wide counts.
pub fn statistics(map: &WxxFile) -> MapStatistics {
    let mut stats = MapStatistics {
        tile_count: map.tiles.len(),
        feature_count: map.features.len(),
        label_count: map.labels.len(),
        shape_count: map.shapes.len(),
        note_count: map.notes.len(),
        layer_count: map.layers.len(),
        ..MapStatistics::default()
    };

    for (&(_, _, level), tile) in &map.tiles {
        *stats.tiles_by_level.entry(level).or_insert(0) += 1;
        *stats
            .terrain_distribution
            .entry(tile.terrain.clone())
            .or_insert(0) += 1;
    }

    stats
}

fn region_snapshot(map: &WxxFile, rect: &Rect, level: ViewLevel) -> Vec<((i32, i32), Tile)> {
    rect.cells()
        .filter_map(|(col, row)| {
            map.tile(col, row, level)
                .map(|tile| ((col, row), tile.clone()))
        })
        .collect()
}
