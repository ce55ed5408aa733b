// THEORY:
// Structural issues (cracks, spalling, mold...) are found by a separate,
// pretrained object detector run on normal-light photographs. That detector is
// not part of this crate. It is consumed through the `StructuralIssueDetector`
// trait, which only promises what the report layer needs: a rendered image and
// a list of `Prediction`s in the same shape the leak detector emits.
//
// `PrecomputedDetections` is the one implementation shipped here. It replays
// predictions produced elsewhere (for example a JSON file written by the model
// runner), which is how the CLI merges both detectors into one list.

use crate::core_modules::color_image::ColorImage;
use crate::core_modules::prediction::Prediction;
use crate::error::{InspectionError, Result};
use std::path::Path;

/// Output of a structural detector run on one photograph.
#[derive(Debug, Clone)]
pub struct StructuralDetection {
    /// The photograph with the detector's own boxes drawn on it.
    pub rendered: ColorImage,
    pub predictions: Vec<Prediction>,
}

pub trait StructuralIssueDetector: Send + Sync {
    fn detect(&self, image: &ColorImage) -> Result<StructuralDetection>;
}

/// Replays a fixed list of predictions; the image passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetections {
    predictions: Vec<Prediction>,
}

impl PrecomputedDetections {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    /// Loads a JSON array of `{confidence, class, box}` records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let predictions = serde_json::from_str(&text).map_err(|source| InspectionError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { predictions })
    }
}

impl StructuralIssueDetector for PrecomputedDetections {
    fn detect(&self, image: &ColorImage) -> Result<StructuralDetection> {
        if let Some(bad) = self.predictions.iter().find(|p| p.confidence > 100) {
            return Err(InspectionError::StructuralDetector(format!(
                "confidence {} for '{}' is outside 0..=100",
                bad.confidence, bad.class_name
            )));
        }
        Ok(StructuralDetection {
            rendered: image.clone(),
            predictions: self.predictions.clone(),
        })
    }
}
