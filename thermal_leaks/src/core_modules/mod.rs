pub mod baseline;
pub mod color_image;
pub mod color_ramp;
pub mod compositor;
pub mod grid;
pub mod leak_region;
pub mod palette;
pub mod prediction;
pub mod region_detector;
pub mod rgb;
pub mod structural;
pub mod temperature_field;
pub mod utils;
