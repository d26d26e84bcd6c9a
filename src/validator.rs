//! Structural audit of parsed maps
//!
//! The wire format is tolerant by contract, so validation never rejects a
//! map: it produces a [`ValidationReport`] of warnings a hosting
//! application can surface to the user. Dangling terrain references,
//! out-of-range tiles and duplicate layer names are all legal data that a
//! careful editor may still want to know about.

use std::collections::HashSet;

use crate::types::{DEFAULT_TERRAIN, WxxFile};

/// Validation levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationLevel {
    /// Grid-extent checks only
    Basic,
    /// Extent plus cross-reference checks
    #[default]
    Standard,
    /// Everything, including cosmetic checks
    Strict,
}

/// Outcome of a validation pass. Warnings only; tolerant data never fails.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Human-readable warnings, in discovery order
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Audits a map, returning the collected warnings.
pub fn validate(map: &WxxFile, level: ValidationLevel) -> ValidationReport {
    let mut report = ValidationReport::new();

    extent_checks(map, &mut report);
    if level == ValidationLevel::Basic {
        return report;
    }

    reference_checks(map, &mut report);
    if level == ValidationLevel::Strict {
        strict_checks(map, &mut report);
    }

    report
}

fn extent_checks(map: &WxxFile, report: &mut ValidationReport) {
    let meta = &map.metadata;
    if meta.width == 0 || meta.height == 0 {
        report.warn(format!(
            "declared grid is degenerate: {}x{}",
            meta.width, meta.height
        ));
    }

    let out_of_range = map
        .tiles
        .keys()
        .filter(|&&(col, row, _)| {
            col < 0 || row < 0 || col >= meta.width as i32 || row >= meta.height as i32
        })
        .count();
    if out_of_range > 0 {
        report.warn(format!(
            "{out_of_range} tile(s) outside the declared {}x{} grid",
            meta.width, meta.height
        ));
    }
}

fn reference_checks(map: &WxxFile, report: &mut ValidationReport) {
    if map.terrain_defs.is_empty() {
        return;
    }

    let defined: HashSet<&str> = map.terrain_defs.iter().map(|d| d.name.as_str()).collect();
    let mut dangling: Vec<&str> = map
        .tiles
        .values()
        .map(|tile| tile.terrain.as_str())
        .filter(|terrain| *terrain != DEFAULT_TERRAIN && !defined.contains(terrain))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    dangling.sort_unstable();

    for terrain in dangling {
        report.warn(format!("tiles reference undefined terrain {terrain:?}"));
    }
}

fn strict_checks(map: &WxxFile, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for layer in &map.layers {
        if !seen.insert(layer.name.as_str()) {
            report.warn(format!("duplicate layer name {:?}", layer.name));
        }
    }

    for (index, note) in map.notes.iter().enumerate() {
        if note.id.is_empty() {
            report.warn(format!("note #{index} ({:?}) has no id", note.title));
        }
    }
}
