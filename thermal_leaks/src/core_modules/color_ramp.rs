// THEORY:
// Raw sensor grids arrive without any picture attached. To give the inspector
// something to look at, the values are min-max scaled into 0..=255 and pushed
// through a perceptually ordered color ramp (dark purple → red → pale yellow,
// the "magma" look). This image is for people only and never feeds back into
// the analysis.

use crate::core_modules::grid::Grid;
use crate::core_modules::rgb::rgb::Rgb;

/// Magma-like color stops, evenly spaced over 0..=255.
pub(crate) const MAGMA_STOPS: [(f64, f64, f64); 9] = [
    (0.0, 0.0, 4.0),       // black
    (28.0, 16.0, 68.0),    // deep indigo
    (79.0, 18.0, 123.0),   // purple
    (129.0, 37.0, 129.0),  // plum
    (181.0, 54.0, 122.0),  // magenta
    (229.0, 80.0, 100.0),  // rose
    (251.0, 135.0, 97.0),  // salmon
    (254.0, 194.0, 135.0), // peach
    (252.0, 253.0, 191.0), // pale yellow
];

/// Looks up the ramp color for an intensity in 0..=255.
pub fn magma(intensity: u8) -> Rgb {
    let segments = (MAGMA_STOPS.len() - 1) as f64;
    let seg = intensity as f64 / 255.0 * segments;
    let i = (seg as usize).min(MAGMA_STOPS.len() - 2);
    let s = seg - i as f64;

    let (r0, g0, b0) = MAGMA_STOPS[i];
    let (r1, g1, b1) = MAGMA_STOPS[i + 1];

    Rgb::new(
        (r0 + s * (r1 - r0)).round() as u8,
        (g0 + s * (g1 - g0)).round() as u8,
        (b0 + s * (b1 - b0)).round() as u8,
    )
}

/// Min-max scales `values` into 0..=255. A flat grid maps to all zeros.
pub fn normalize_to_intensity(values: &Grid<f64>) -> Grid<u8> {
    let (min, max) = values
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = max - min;

    values.map(|_, &v| {
        if span > 0.0 && span.is_finite() {
            ((v - min) / span * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            0
        }
    })
}

/// Renders a scalar grid through the magma ramp.
pub fn render(values: &Grid<f64>) -> Grid<Rgb> {
    normalize_to_intensity(values).map(|_, &i| magma(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::grid::Coord;

    #[test]
    fn ends_of_the_ramp() {
        assert_eq!(magma(0), Rgb::new(0, 0, 4));
        assert_eq!(magma(255), Rgb::new(252, 253, 191));
    }

    #[test]
    fn ramp_brightens_monotonically() {
        let mut last = magma(0).luminance();
        for i in 1..=255u8 {
            let lum = magma(i).luminance();
            assert!(lum + 1.0 >= last, "luminance dropped at {i}");
            last = lum;
        }
    }

    #[test]
    fn ramp_is_continuous() {
        for i in 1..=255u8 {
            let a = magma(i - 1).to_array();
            let b = magma(i).to_array();
            for ch in 0..3 {
                let diff = (a[ch] as i32 - b[ch] as i32).abs();
                assert!(diff <= 8, "channel {ch} jumped by {diff} at {i}");
            }
        }
    }

    #[test]
    fn normalization_spans_full_range() {
        let grid = Grid::from_rows(vec![vec![10.0, 15.0], vec![20.0, 10.0]]).unwrap();
        let scaled = normalize_to_intensity(&grid);
        assert_eq!(scaled[Coord::new(0, 0)], 0);
        assert_eq!(scaled[Coord::new(0, 1)], 128);
        assert_eq!(scaled[Coord::new(1, 0)], 255);
    }

    #[test]
    fn flat_grid_renders_as_ramp_start() {
        let grid = Grid::from_value(3, 3, 21.5);
        assert!(render(&grid).values().all(|&c| c == magma(0)));
    }
}
