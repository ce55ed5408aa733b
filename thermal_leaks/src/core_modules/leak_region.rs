// THEORY:
// A `LeakRegion` is what the region detector hands back for each connected group
// of too-hot or too-cold cells. Like a blob in any spatial grouping layer it is a
// "dumb" summary: a classification, a fixed confidence and the smallest
// axis-aligned box that encloses every member cell. It has no identity beyond
// its position in the output list; the group id it carries is only there to
// tell hot from cold.
//
// Boxes follow image convention: x runs along columns, y along rows.

use crate::core_modules::grid::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every leak region is reported with full confidence; the detector is
/// threshold-based, not probabilistic.
pub const LEAK_CONFIDENCE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeakKind {
    #[serde(rename = "hot leak")]
    Hot,
    #[serde(rename = "cold leak")]
    Cold,
}

impl LeakKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            LeakKind::Hot => "hot leak",
            LeakKind::Cold => "cold leak",
        }
    }
}

impl fmt::Display for LeakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Inclusive pixel bounds of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Smallest box enclosing all `coords`. `None` for an empty slice.
    pub fn enclosing(coords: &[Coord]) -> Option<Self> {
        let first = coords.first()?;
        let (mut min_row, mut max_row) = (first.row, first.row);
        let (mut min_col, mut max_col) = (first.col, first.col);
        for c in &coords[1..] {
            min_row = min_row.min(c.row);
            max_row = max_row.max(c.row);
            min_col = min_col.min(c.col);
            max_col = max_col.max(c.col);
        }
        Some(Self {
            xmin: min_col as f64,
            ymin: min_row as f64,
            xmax: max_col as f64,
            ymax: max_row as f64,
        })
    }

    pub fn contains(&self, coord: Coord) -> bool {
        let (x, y) = (coord.col as f64, coord.row as f64);
        self.xmin <= x && x <= self.xmax && self.ymin <= y && y <= self.ymax
    }
}

/// One connected group of classified cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LeakRegion {
    /// Group id: hot groups take `0..hot_count`, cold groups continue after.
    pub id: usize,
    pub kind: LeakKind,
    pub confidence: u32,
    pub bounding_box: BoundingBox,
    /// Number of classified cells in the group.
    pub cell_count: usize,
}
