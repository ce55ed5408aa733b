// THEORY:
// A `ColorImage` is a grid of `Rgb` samples. It is the bridge between the
// outside world (decoded PNG/JPEG captures from the `image` crate) and the
// grid-based analysis layers. Everything is (row, column) addressed, so the
// image width is the number of columns and the height the number of rows.
//
// Once built, a `ColorImage` is never mutated; the compositor produces new
// images rather than painting over old ones.

use crate::core_modules::grid::{Coord, Grid};
use crate::core_modules::rgb::rgb::Rgb;
use crate::error::{InspectionError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Target resolution captures are resized to before palette decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSize {
    pub width: u32,
    pub height: u32,
}

impl WorkingSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for WorkingSize {
    fn default() -> Self {
        Self::new(250, 200)
    }
}

impl std::str::FromStr for WorkingSize {
    type Err = InspectionError;

    /// Parses `"WIDTHxHEIGHT"`, e.g. `"250x200"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || InspectionError::InvalidConfig(format!("invalid working size '{s}', expected WIDTHxHEIGHT"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(width, height))
    }
}

/// Resampling filter used when resizing to the working resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// An immutable grid of RGB samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    grid: Grid<Rgb>,
}

impl ColorImage {
    /// Wraps an existing grid. Fails if the grid has no cells.
    pub fn from_grid(grid: Grid<Rgb>) -> Result<Self> {
        if grid.is_empty() {
            return Err(InspectionError::EmptyGrid);
        }
        Ok(Self { grid })
    }

    /// Converts a decoded capture to RGB, optionally resizing it first.
    pub fn from_dynamic_image(
        img: &DynamicImage,
        size: Option<WorkingSize>,
        filter: ResizeFilter,
    ) -> Result<Self> {
        let mut rgb = img.to_rgb8();
        if let Some(size) = size {
            if size.width == 0 || size.height == 0 {
                return Err(InspectionError::InvalidConfig(
                    "working size must be non-zero".to_string(),
                ));
            }
            if rgb.dimensions() != (size.width, size.height) {
                rgb = image::imageops::resize(&rgb, size.width, size.height, filter.into());
            }
        }
        Self::from_rgb_image(&rgb)
    }

    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let grid = Grid::from_fn(height as usize, width as usize, |c| {
            Rgb::from(*img.get_pixel(c.col as u32, c.row as u32))
        });
        Self::from_grid(grid)
    }

    pub fn open(path: impl AsRef<Path>, size: Option<WorkingSize>, filter: ResizeFilter) -> Result<Self> {
        let img = image::open(path)?;
        Self::from_dynamic_image(&img, size, filter)
    }

    pub fn grid(&self) -> &Grid<Rgb> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<Rgb> {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    pub fn height(&self) -> usize {
        self.grid.rows()
    }

    pub fn pixel(&self, coord: Coord) -> Option<Rgb> {
        self.grid.get(coord).copied()
    }

    /// Renders back into an `image` buffer, x = column, y = row.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.grid[Coord::new(y as usize, x as usize)].into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_three() -> RgbImage {
        RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]))
    }

    #[test]
    fn rows_are_image_height_and_cols_are_width() {
        let img = ColorImage::from_rgb_image(&two_by_three()).unwrap();
        assert_eq!(img.height(), 2);
        assert_eq!(img.width(), 3);
        assert_eq!(img.pixel(Coord::new(1, 2)), Some(Rgb::new(2, 1, 7)));
    }

    #[test]
    fn round_trips_through_image_buffer() {
        let source = two_by_three();
        let img = ColorImage::from_rgb_image(&source).unwrap();
        assert_eq!(img.to_rgb_image(), source);
    }

    #[test]
    fn resizes_to_working_size() {
        let dynamic = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, image::Rgb([9, 9, 9])));
        let img = ColorImage::from_dynamic_image(
            &dynamic,
            Some(WorkingSize::new(25, 20)),
            ResizeFilter::Nearest,
        )
        .unwrap();
        assert_eq!((img.width(), img.height()), (25, 20));
        assert!(img.grid().values().all(|&p| p == Rgb::new(9, 9, 9)));
    }

    #[test]
    fn rejects_zero_sizes_and_empty_images() {
        let dynamic = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(matches!(
            ColorImage::from_dynamic_image(&dynamic, Some(WorkingSize::new(0, 4)), ResizeFilter::Nearest),
            Err(InspectionError::InvalidConfig(_))
        ));
        assert!(matches!(
            ColorImage::from_rgb_image(&RgbImage::new(0, 0)),
            Err(InspectionError::EmptyGrid)
        ));
    }

    #[test]
    fn parses_working_size() {
        assert_eq!("250x200".parse::<WorkingSize>().unwrap(), WorkingSize::new(250, 200));
        assert_eq!(" 8 X 6 ".parse::<WorkingSize>().unwrap(), WorkingSize::new(8, 6));
        assert!("250".parse::<WorkingSize>().is_err());
        assert!("ax2".parse::<WorkingSize>().is_err());
    }
}
