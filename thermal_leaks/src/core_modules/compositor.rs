// THEORY:
// The compositor burns the detector's verdict into a picture an inspector can
// read at a glance. Too-hot cells are painted solid red, too-cold cells solid
// blue, and every other cell keeps the color of the view it was given. It also
// emits the plain boolean mask of "any leak here" for downstream consumers.
//
// It never paints over its input: both outputs are freshly allocated.

use crate::core_modules::color_image::ColorImage;
use crate::core_modules::grid::Grid;
use crate::core_modules::rgb::rgb::Rgb;
use crate::error::{InspectionError, Result};

pub const HOT_MARKER: Rgb = Rgb::new(255, 0, 0);
pub const COLD_MARKER: Rgb = Rgb::new(0, 0, 255);

/// Per-cell classification produced by thresholding a relative field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellClass {
    #[default]
    Normal,
    Hot,
    Cold,
}

/// True wherever a cell is hot or cold.
#[derive(Debug, Clone, PartialEq)]
pub struct LeakMask {
    grid: Grid<bool>,
}

impl LeakMask {
    pub fn from_classes(classes: &Grid<CellClass>) -> Self {
        Self {
            grid: classes.map(|_, &class| class != CellClass::Normal),
        }
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    pub fn leak_cell_count(&self) -> usize {
        self.grid.count(&true)
    }
}

/// Overlays hot/cold markers on `view`. `classes` must have the view's shape.
pub fn composite(view: &ColorImage, classes: &Grid<CellClass>) -> Result<ColorImage> {
    if classes.shape() != view.grid().shape() {
        return Err(InspectionError::DimensionMismatch {
            field_rows: classes.rows(),
            field_cols: classes.cols(),
            image_rows: view.height(),
            image_cols: view.width(),
        });
    }
    let painted = view.grid().map(|coord, &original| match classes[coord] {
        CellClass::Hot => HOT_MARKER,
        CellClass::Cold => COLD_MARKER,
        CellClass::Normal => original,
    });
    ColorImage::from_grid(painted)
}
