// THEORY:
// The `pipeline` module is the top-level API of the inspection engine. It wires
// the layers together into the two entry points a reporting tool needs:
//
//   palette image → ColorImage → TemperatureField (palette decode) ┐
//   raw samples   → TemperatureField (+ synthesized ramp view)     ┴→ RelativeField
//       → RegionDetector → { regions, mask, visualization }
//
// The visualization paints markers on the capture as it arrived (after the
// resize), so everything that is not a leak keeps its true color. The snapped
// palette image is reported separately as `thermal_view`. Raw samples have no
// such image, so their markers go on the ramp rendering.
//
// `ThermalInspector` is stateless between calls: it holds only the validated
// configuration, and every inspection allocates its own grids. One inspector can
// therefore be shared across threads as-is (see `parallel_pipeline`).

use crate::config::InspectionConfig;
use crate::core_modules::baseline::{self, RelativeField};
use crate::core_modules::color_image::ColorImage;
use crate::core_modules::compositor::LeakMask;
use crate::core_modules::leak_region::{LeakKind, LeakRegion};
use crate::core_modules::prediction::{self, ClassSummary, Prediction};
use crate::core_modules::region_detector::region_detector;
use crate::core_modules::structural::StructuralIssueDetector;
use crate::core_modules::temperature_field::{DecodedCapture, TemperatureField, TemperatureStats};
use crate::error::Result;
use image::DynamicImage;
use std::path::Path;

/// The full result of inspecting one thermal capture.
#[derive(Debug, Clone)]
pub struct InspectionReport {
    /// What the camera "saw": snapped palette colors, or the ramp rendering of
    /// raw samples.
    pub thermal_view: ColorImage,
    /// The analyzed capture with hot cells red and cold cells blue: the
    /// resized input for palette images, the ramp rendering for raw samples.
    pub visualization: ColorImage,
    pub mask: LeakMask,
    /// Hot regions in discovery order, then cold regions.
    pub regions: Vec<LeakRegion>,
    pub stats: TemperatureStats,
    /// Mean subtracted to build the relative field.
    pub baseline: f64,
}

impl InspectionReport {
    pub fn predictions(&self) -> Vec<Prediction> {
        self.regions.iter().map(Prediction::from).collect()
    }

    pub fn count(&self, kind: LeakKind) -> usize {
        self.regions.iter().filter(|r| r.kind == kind).count()
    }
}

/// Leak and structural findings for one inspected wall cell.
#[derive(Debug, Clone)]
pub struct CellReport {
    pub thermal: InspectionReport,
    /// Photo with the structural detector's boxes drawn on it.
    pub structural_image: ColorImage,
    /// Leak predictions followed by structural predictions.
    pub predictions: Vec<Prediction>,
    pub summary: ClassSummary,
}

#[derive(Default)]
pub struct ThermalInspector {
    config: InspectionConfig,
}

impl ThermalInspector {
    pub fn new(config: InspectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    /// Inspects a palette-rendered capture, resized to the working resolution.
    pub fn detect_from_image(&self, img: &DynamicImage) -> Result<InspectionReport> {
        let color = ColorImage::from_dynamic_image(
            img,
            Some(self.config.working_size),
            self.config.resize_filter,
        )?;
        let decoded = TemperatureField::from_palette_image(&color, &self.config.palette)?;
        // Markers go on the capture's own colors, not the snapped swatches.
        self.analyze(decoded, Some(&color))
    }

    /// Loads and inspects a palette-rendered capture from disk.
    pub fn detect_from_path(&self, path: impl AsRef<Path>) -> Result<InspectionReport> {
        let img = image::open(path)?;
        self.detect_from_image(&img)
    }

    /// Inspects a raw sensor grid at its native resolution.
    pub fn detect_from_samples<T>(&self, samples: Vec<Vec<T>>) -> Result<InspectionReport>
    where
        T: Into<f64>,
    {
        let decoded = TemperatureField::from_samples(samples)?;
        self.analyze(decoded, None)
    }

    /// Runs the thermal inspection and the structural detector on the matching
    /// photograph, and merges both into one prediction list.
    pub fn inspect_cell(
        &self,
        thermal: &DynamicImage,
        photo: &DynamicImage,
        structural: &dyn StructuralIssueDetector,
    ) -> Result<CellReport> {
        let report = self.detect_from_image(thermal)?;
        let photo = ColorImage::from_dynamic_image(photo, None, self.config.resize_filter)?;
        let detection = structural.detect(&photo)?;

        let predictions = prediction::merge_predictions(&report.regions, detection.predictions);
        let summary = ClassSummary::from_predictions(&predictions);
        Ok(CellReport {
            thermal: report,
            structural_image: detection.rendered,
            predictions,
            summary,
        })
    }

    /// `overlay_base` is what the leak markers are painted on; `None` paints
    /// them on the decoded view.
    fn analyze(&self, decoded: DecodedCapture, overlay_base: Option<&ColorImage>) -> Result<InspectionReport> {
        let DecodedCapture { view, field } = decoded;
        let stats = field.stats();
        let relative: RelativeField = baseline::to_relative(&field);

        let base = overlay_base.unwrap_or(&view);
        let detection = region_detector::find_leaks(&relative, base, self.config.leak_offset)?;

        tracing::info!(
            rows = field.rows(),
            cols = field.cols(),
            mean = stats.mean,
            min = stats.min,
            max = stats.max,
            leaks = detection.regions.len(),
            "thermal inspection complete"
        );

        Ok(InspectionReport {
            thermal_view: view,
            visualization: detection.visualization,
            mask: detection.mask,
            regions: detection.regions,
            stats,
            baseline: relative.baseline(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color_image::WorkingSize;
    use crate::core_modules::compositor::HOT_MARKER;
    use crate::core_modules::grid::Coord;
    use crate::core_modules::rgb::rgb::Rgb;
    use image::RgbImage;

    #[test]
    fn samples_with_one_hot_spot() {
        let mut samples = vec![vec![20.0f64; 6]; 5];
        samples[3][4] = 40.0;
        let report = ThermalInspector::default().detect_from_samples(samples).unwrap();

        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.count(LeakKind::Hot), 1);
        let p = &report.predictions()[0];
        assert_eq!(p.class_name, "hot leak");
        assert_eq!((p.bounding_box.xmin, p.bounding_box.ymin), (4.0, 3.0));
        assert_eq!(report.thermal_view.width(), 6);
        assert_eq!(report.stats.max, 40.0);
    }

    #[test]
    fn uniform_samples_have_no_leaks() {
        let report = ThermalInspector::default()
            .detect_from_samples(vec![vec![12.5f64; 8]; 8])
            .unwrap();
        assert!(report.regions.is_empty());
        assert_eq!(report.visualization, report.thermal_view);
        assert_eq!(report.baseline, 12.5);
    }

    #[test]
    fn palette_image_is_resized_and_decoded() {
        let config = InspectionConfig {
            working_size: WorkingSize::new(10, 8),
            ..InspectionConfig::default()
        };
        let inspector = ThermalInspector::new(config).unwrap();
        let cold = inspector.config().palette.entries()[0].rgb;
        let hot = inspector.config().palette.entries()[15].rgb;
        let warm = inspector.config().palette.entries()[7].rgb;

        // Already at working size, so no resampling blurs the swatches.
        let img = RgbImage::from_fn(10, 8, |x, y| {
            if x == 2 && y == 1 {
                hot.into()
            } else if x == 8 && y == 6 {
                cold.into()
            } else {
                warm.into()
            }
        });
        let report = inspector.detect_from_image(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(report.visualization.height(), 8);
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.regions[0].kind, LeakKind::Hot);
        assert_eq!(report.regions[1].kind, LeakKind::Cold);
        assert!(report.mask.grid()[Coord::new(1, 2)]);
        assert!(report.mask.grid()[Coord::new(6, 8)]);
    }

    #[test]
    fn markers_are_painted_on_the_capture_colors() {
        let config = InspectionConfig {
            working_size: WorkingSize::new(10, 8),
            ..InspectionConfig::default()
        };
        let inspector = ThermalInspector::new(config).unwrap();
        let hot = inspector.config().palette.entries()[15].rgb;
        let swatch = inspector.config().palette.entries()[7].rgb;
        // Slightly off the Barbie Pink swatch, still nearest to it.
        let wall = Rgb::new(swatch.red - 4, swatch.green + 3, swatch.blue - 2);

        let img = RgbImage::from_fn(10, 8, |x, y| {
            if x == 2 && y == 1 { hot.into() } else { wall.into() }
        });
        let report = inspector.detect_from_image(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.visualization.pixel(Coord::new(5, 5)), Some(wall));
        assert_eq!(report.visualization.pixel(Coord::new(1, 2)), Some(HOT_MARKER));
        assert_eq!(report.thermal_view.pixel(Coord::new(5, 5)), Some(swatch));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = InspectionConfig {
            leak_offset: 0.0,
            ..InspectionConfig::default()
        };
        assert!(ThermalInspector::new(config).is_err());
    }
}
