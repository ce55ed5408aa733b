// THEORY:
// Absolute temperatures are not comparable between captures taken in different
// weather. What is stable is how far a spot deviates from the rest of its own
// scene. The `RelativeField` expresses exactly that: every cell minus the
// field's arithmetic mean. It is derived once and never mutated.

use crate::core_modules::grid::Grid;
use crate::core_modules::temperature_field::TemperatureField;

/// A temperature field expressed as deviation from its own mean.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeField {
    grid: Grid<f64>,
    baseline: f64,
}

impl RelativeField {
    pub fn grid(&self) -> &Grid<f64> {
        &self.grid
    }

    /// The mean that was subtracted from every cell.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Wraps a grid that is already relative, e.g. when the baseline was
    /// computed elsewhere.
    pub fn from_deviations(grid: Grid<f64>) -> Self {
        Self { grid, baseline: 0.0 }
    }
}

/// Subtracts the field's mean from every cell. A uniform field yields all zeros.
pub fn to_relative(field: &TemperatureField) -> RelativeField {
    let baseline = field.stats().mean;
    let grid = field.grid().map(|_, &t| t - baseline);
    RelativeField { grid, baseline }
}
