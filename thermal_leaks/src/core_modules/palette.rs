// THEORY:
// A thermal camera that only hands out a rendered image has already thrown the
// temperatures away. The `Palette` is how we get them back: an ordered list of
// swatches, each pairing the color the camera paints with the temperature that
// color stands for. Decoding a pixel is a nearest-neighbor search over that list.
//
// Key architectural principles:
// 1.  **Configuration as Data**: The palette is an immutable list of records, not
//     a chain of branches. Deployments may load their own from JSON.
// 2.  **Never Empty**: A `Palette` value always holds at least one entry, so the
//     matching methods on it cannot fail. The free functions over raw slices
//     still report an empty list as a configuration error.
// 3.  **Deterministic Ties**: When two swatches sit at the same distance, the one
//     that comes FIRST in palette order wins.

use crate::core_modules::rgb::rgb::Rgb;
use crate::error::{InspectionError, Result};
use serde::{Deserialize, Serialize};

/// One swatch: a rendered color, a human-readable label and its temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    #[serde(with = "rgb_triplet")]
    pub rgb: Rgb,
    #[serde(rename = "color")]
    pub label: String,
    pub temperature: f64,
}

impl PaletteEntry {
    pub fn new(rgb: Rgb, label: impl Into<String>, temperature: f64) -> Self {
        Self {
            rgb,
            label: label.into(),
            temperature,
        }
    }
}

/// Returns the entry nearest to `rgb` under the luma-weighted distance.
pub fn closest_by_color<'a>(palette: &'a [PaletteEntry], rgb: &Rgb) -> Result<&'a PaletteEntry> {
    first_minimum(palette, |entry| entry.rgb.luma_distance(rgb))
}

/// Reverse lookup: the entry whose temperature is nearest to `temperature`.
pub fn closest_by_temperature(palette: &[PaletteEntry], temperature: f64) -> Result<&PaletteEntry> {
    first_minimum(palette, |entry| (entry.temperature - temperature).abs())
}

// Strict `<` keeps the earliest entry on ties.
fn first_minimum<F>(palette: &[PaletteEntry], distance: F) -> Result<&PaletteEntry>
where
    F: Fn(&PaletteEntry) -> f64,
{
    let mut entries = palette.iter();
    let mut best = entries.next().ok_or(InspectionError::EmptyPalette)?;
    let mut best_distance = distance(best);
    for entry in entries {
        let d = distance(entry);
        if d < best_distance {
            best = entry;
            best_distance = d;
        }
    }
    Ok(best)
}

/// An ordered, non-empty list of swatches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(InspectionError::EmptyPalette);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn closest_by_color(&self, rgb: &Rgb) -> &PaletteEntry {
        // Non-empty by construction.
        closest_by_color(&self.entries, rgb).unwrap_or(&self.entries[0])
    }

    pub fn closest_by_temperature(&self, temperature: f64) -> &PaletteEntry {
        closest_by_temperature(&self.entries, temperature).unwrap_or(&self.entries[0])
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<PaletteEntry>::deserialize(deserializer)?;
        Palette::new(entries).map_err(serde::de::Error::custom)
    }
}

impl Default for Palette {
    /// The 16-step black → violet → pink → orange → beige ramp the inspection
    /// cameras render with, one degree per step.
    fn default() -> Self {
        const SWATCHES: [((u8, u8, u8), &str); 16] = [
            ((15, 16, 19), "Rich Black FOGRA 39"),
            ((40, 15, 87), "Russian Violet"),
            ((71, 12, 119), "Indigo"),
            ((95, 16, 144), "Blue Violet Color Wheel"),
            ((121, 12, 156), "Violet RYB"),
            ((147, 16, 167), "Violet RYB"),
            ((188, 18, 161), "Byzantine"),
            ((216, 39, 135), "Barbie Pink"),
            ((238, 58, 107), "Paradise Pink"),
            ((230, 82, 62), "Fire Opal"),
            ((228, 129, 18), "Fulvous"),
            ((230, 168, 15), "Goldenrod"),
            ((231, 193, 11), "Jonquil"),
            ((231, 221, 52), "Titanium Yellow"),
            ((223, 229, 149), "Green Yellow Crayola"),
            ((227, 230, 202), "Beige"),
        ];

        let entries = SWATCHES
            .iter()
            .enumerate()
            .map(|(i, &((r, g, b), label))| PaletteEntry::new(Rgb::new(r, g, b), label, i as f64))
            .collect();
        Self { entries }
    }
}

/// Serializes an `Rgb` as a `[r, g, b]` array.
mod rgb_triplet {
    use crate::core_modules::rgb::rgb::Rgb;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(rgb: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        rgb.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        <[u8; 3]>::deserialize(deserializer).map(Rgb::from)
    }
}
