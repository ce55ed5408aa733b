// THEORY:
// The `TemperatureField` is the scalar heart of an inspection: one temperature
// per sample, independent of whatever image it was decoded from. There are two
// ways to get one and they are kept as two named constructors on purpose:
//
// 1.  **`from_palette_image`** (lossy): every pixel of a rendered capture is
//     snapped to its nearest palette swatch. The field takes the swatch's
//     temperature, so true temperature is bucketed into as many levels as the
//     palette has entries. A parallel image of the snapped colors is produced
//     for display.
// 2.  **`from_samples`** (lossless): a raw sensor grid is taken as-is. Its
//     display image is synthesized through the magma ramp.
//
// Both return a `DecodedCapture`: the field that feeds analysis plus the view
// that is only ever shown to people.

use crate::core_modules::color_image::ColorImage;
use crate::core_modules::color_ramp;
use crate::core_modules::grid::Grid;
use crate::core_modules::palette::Palette;
use crate::error::{InspectionError, Result};
use serde::Serialize;

/// Mean, minimum and maximum temperature of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// A grid of temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField {
    grid: Grid<f64>,
}

/// A temperature field together with the image an inspector would look at.
#[derive(Debug, Clone)]
pub struct DecodedCapture {
    /// Display image: snapped palette colors or the synthesized ramp.
    pub view: ColorImage,
    /// Temperatures used for analysis.
    pub field: TemperatureField,
}

impl TemperatureField {
    pub fn from_grid(grid: Grid<f64>) -> Result<Self> {
        if grid.is_empty() {
            return Err(InspectionError::EmptyGrid);
        }
        Ok(Self { grid })
    }

    /// Decodes a palette-rendered capture. Lossy: each cell becomes the
    /// temperature of its nearest swatch.
    pub fn from_palette_image(image: &ColorImage, palette: &Palette) -> Result<DecodedCapture> {
        let matches = image.grid().map(|_, rgb| palette.closest_by_color(rgb));
        let view = ColorImage::from_grid(matches.map(|_, entry| entry.rgb))?;
        let field = Self::from_grid(matches.map(|_, entry| entry.temperature))?;

        tracing::debug!(
            rows = field.rows(),
            cols = field.cols(),
            levels = palette.len(),
            "decoded palette image into temperature field"
        );
        Ok(DecodedCapture { view, field })
    }

    /// Ingests a raw sensor grid at its native resolution.
    pub fn from_samples<T>(samples: Vec<Vec<T>>) -> Result<DecodedCapture>
    where
        T: Into<f64>,
    {
        let rows: Vec<Vec<f64>> = samples
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let grid = Grid::from_rows(rows)?;
        if grid.values().any(|v| !v.is_finite()) {
            return Err(InspectionError::InvalidConfig(
                "sample grid contains non-finite values".to_string(),
            ));
        }

        let view = ColorImage::from_grid(color_ramp::render(&grid))?;
        let field = Self::from_grid(grid)?;

        tracing::debug!(
            rows = field.rows(),
            cols = field.cols(),
            "ingested raw temperature samples"
        );
        Ok(DecodedCapture { view, field })
    }

    pub fn grid(&self) -> &Grid<f64> {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    pub fn stats(&self) -> TemperatureStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in self.grid.values() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        // A flat field's mean is its value exactly, with no summation drift.
        let mean = if min == max {
            min
        } else {
            sum / self.grid.len() as f64
        };
        TemperatureStats { mean, min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::grid::Coord;
    use crate::core_modules::rgb::rgb::Rgb;
    use approx::assert_relative_eq;

    #[test]
    fn palette_decoding_snaps_colors_and_temperatures() {
        let palette = Palette::default();
        let exact = palette.entries()[10].rgb;
        let near = Rgb::new(16, 17, 20);
        let grid = Grid::from_rows(vec![vec![exact, near]]).unwrap();
        let image = ColorImage::from_grid(grid).unwrap();

        let decoded = TemperatureField::from_palette_image(&image, &palette).unwrap();
        assert_eq!(decoded.field.grid()[Coord::new(0, 0)], 10.0);
        assert_eq!(decoded.field.grid()[Coord::new(0, 1)], 0.0);
        assert_eq!(decoded.view.pixel(Coord::new(0, 1)), Some(palette.entries()[0].rgb));
        assert_eq!(decoded.view.pixel(Coord::new(0, 0)), Some(exact));
    }

    #[test]
    fn samples_are_kept_lossless() {
        let decoded = TemperatureField::from_samples(vec![vec![20.25, 21.75], vec![19.5, 30.0]]).unwrap();
        assert_eq!(decoded.field.grid()[Coord::new(0, 1)], 21.75);
        assert_eq!(decoded.view.width(), 2);
        assert_eq!(decoded.view.height(), 2);
        assert_eq!(decoded.view.pixel(Coord::new(1, 1)), Some(color_ramp::magma(255)));
        assert_eq!(decoded.view.pixel(Coord::new(1, 0)), Some(color_ramp::magma(0)));
    }

    #[test]
    fn integer_samples_are_accepted() {
        let decoded = TemperatureField::from_samples(vec![vec![1i32, 2, 3]]).unwrap();
        assert_eq!(decoded.field.shape(), (1, 3));
    }

    #[test]
    fn bad_sample_grids_are_rejected() {
        assert!(matches!(
            TemperatureField::from_samples(Vec::<Vec<f64>>::new()),
            Err(InspectionError::EmptyGrid)
        ));
        assert!(matches!(
            TemperatureField::from_samples(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(InspectionError::RaggedRows { .. })
        ));
        assert!(TemperatureField::from_samples(vec![vec![f64::NAN]]).is_err());
    }

    #[test]
    fn stats_report_mean_min_max() {
        let field = TemperatureField::from_grid(Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 6.0]]).unwrap()).unwrap();
        let stats = field.stats();
        assert_relative_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
    }

    #[test]
    fn flat_field_mean_is_exact() {
        let field = TemperatureField::from_grid(Grid::from_value(7, 3, 0.1)).unwrap();
        assert_eq!(field.stats().mean, 0.1);
    }
}
