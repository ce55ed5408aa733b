// THEORY:
// `Rgb` is the smallest unit of a color capture: one 8-bit red, green and blue
// sample. Like any pixel-level data container it knows nothing about its
// neighbors. Its one piece of behavior is comparison: triplets are never
// ordered, only measured against each other.
//
// The distance used everywhere is the Rec. 601 luma weighting applied to the
// absolute per-channel differences:
//
//     d = 0.299·|Δr| + 0.587·|Δg| + 0.114·|Δb|
//
// Thermal palettes are authored to be monotonic in perceived brightness, so a
// luminance-weighted distance lets brightness dominate and hue shifts count for
// less.

pub mod rgb {
    pub type Channel = u8;
    pub type Luminance = f64;

    const RED_WEIGHT: f64 = 0.299;
    const GREEN_WEIGHT: f64 = 0.587;
    const BLUE_WEIGHT: f64 = 0.114;

    /// A "dumb" data container for a single RGB sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rgb {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Rgb {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Rgb { red, green, blue }
        }

        /// Luminance estimate (Rec. 601 luma), 0..255.
        pub fn luminance(&self) -> Luminance {
            RED_WEIGHT * self.red as f64
                + GREEN_WEIGHT * self.green as f64
                + BLUE_WEIGHT * self.blue as f64
        }

        /// Luma-weighted absolute difference between two triplets.
        /// Zero iff both triplets are identical.
        pub fn luma_distance(&self, other: &Rgb) -> Luminance {
            RED_WEIGHT * (self.red as f64 - other.red as f64).abs()
                + GREEN_WEIGHT * (self.green as f64 - other.green as f64).abs()
                + BLUE_WEIGHT * (self.blue as f64 - other.blue as f64).abs()
        }

        pub fn to_array(self) -> [Channel; 3] {
            [self.red, self.green, self.blue]
        }
    }

    impl From<[Channel; 3]> for Rgb {
        fn from([red, green, blue]: [Channel; 3]) -> Self {
            Rgb::new(red, green, blue)
        }
    }

    impl From<Rgb> for [Channel; 3] {
        fn from(rgb: Rgb) -> Self {
            rgb.to_array()
        }
    }

    impl From<image::Rgb<Channel>> for Rgb {
        fn from(pixel: image::Rgb<Channel>) -> Self {
            Rgb::from(pixel.0)
        }
    }

    impl From<Rgb> for image::Rgb<Channel> {
        fn from(rgb: Rgb) -> Self {
            image::Rgb(rgb.to_array())
        }
    }
}
