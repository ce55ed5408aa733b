pub mod image_helper {
    use crate::core_modules::color_image::ColorImage;
    use crate::error::Result;
    use image::ImageEncoder;
    use std::path::Path;

    /// Writes a color image as an 8-bit RGB PNG.
    pub fn save(path: impl AsRef<Path>, img: &ColorImage) -> Result<()> {
        let output = std::io::BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);
        let buffer = img.to_rgb_image();

        encoder.write_image(
            buffer.as_raw(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::core_modules::color_image::{ColorImage, ResizeFilter};
    use crate::core_modules::grid::{Coord, Grid};
    use crate::core_modules::rgb::rgb::Rgb;

    fn gradient(width: usize, height: usize) -> ColorImage {
        let grid = Grid::from_fn(height, width, |c| {
            Rgb::new((c.col % 256) as u8, (c.row % 256) as u8, 128)
        });
        ColorImage::from_grid(grid).unwrap()
    }

    #[test]
    fn saved_file_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let img = gradient(50, 20);

        save(&path, &img).expect("Error Saving File.");
        let reloaded = ColorImage::open(&path, None, ResizeFilter::Nearest).unwrap();

        assert_eq!(reloaded, img);
        assert_eq!(reloaded.pixel(Coord::new(19, 49)), Some(Rgb::new(49, 19, 128)));
    }

    #[test]
    fn saving_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.png");
        assert!(save(&path, &gradient(2, 2)).is_err());
    }
}
