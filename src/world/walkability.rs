//! Static walkability index over grid cells.

use crate::config::WorldConfig;

/// Inclusive rectangle of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl CellRect {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Immutable once built; answers `is_walkable(cell)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkabilityIndex {
    rects: Vec<CellRect>,
    cells: Vec<(i32, i32)>,
    cell_size: f64,
}

impl WalkabilityIndex {
    pub fn new(rects: Vec<CellRect>, cells: Vec<(i32, i32)>, cell_size: f64) -> Self {
        Self { rects, cells, cell_size }
    }

    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self::new(cfg.walkable_rects.clone(), cfg.walkable_cells.clone(), cfg.cell_size)
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y)) || self.cells.contains(&(x, y))
    }

    /// Grid cell containing a world-space point.
    pub fn cell_of(&self, px: f64, py: f64) -> (i32, i32) {
        ((px / self.cell_size).floor() as i32, (py / self.cell_size).floor() as i32)
    }
}
