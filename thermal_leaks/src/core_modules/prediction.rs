// THEORY:
// The reporting layer does not care whether a finding came from the thermal leak
// detector or from the structural-issue detector run on normal-light photos. Both
// speak the same `Prediction` record: `{confidence, class, box}`. That shared
// shape is what lets the two lists be merged into one and counted by class.

use crate::core_modules::leak_region::{BoundingBox, LeakRegion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One detection, in the shape shared by every detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 0..=100.
    pub confidence: u32,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
}

impl From<&LeakRegion> for Prediction {
    fn from(region: &LeakRegion) -> Self {
        Self {
            confidence: region.confidence,
            class_name: region.kind.class_name().to_string(),
            bounding_box: region.bounding_box,
        }
    }
}

/// Leak predictions first, then structural ones.
pub fn merge_predictions(leaks: &[LeakRegion], structural: Vec<Prediction>) -> Vec<Prediction> {
    let mut merged: Vec<Prediction> = leaks.iter().map(Prediction::from).collect();
    merged.extend(structural);
    merged
}

/// How often each class appears across a set of predictions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassSummary {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub frequencies: BTreeMap<String, f64>,
}

impl ClassSummary {
    pub fn from_predictions<'a, I>(predictions: I) -> Self
    where
        I: IntoIterator<Item = &'a Prediction>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for p in predictions {
            *counts.entry(p.class_name.clone()).or_default() += 1;
        }
        let total: usize = counts.values().sum();
        let frequencies = counts
            .iter()
            .map(|(class, &n)| (class.clone(), n as f64 / total as f64))
            .collect();
        Self {
            total,
            counts,
            frequencies,
        }
    }

    pub fn count(&self, class_name: &str) -> usize {
        self.counts.get(class_name).copied().unwrap_or(0)
    }
}
