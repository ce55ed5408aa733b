//! Inspection configuration: palette, thresholds and working resolution.
//!
//! Values come from `Default`, optionally a JSON file, then environment
//! overrides, and are checked once by [`InspectionConfig::validate`] before any
//! capture is touched.

use crate::core_modules::color_image::{ResizeFilter, WorkingSize};
use crate::core_modules::palette::Palette;
use crate::core_modules::region_detector::region_detector::{
    DEFAULT_LEAK_OFFSET, validate_leak_offset,
};
use crate::error::{InspectionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`InspectionConfig::leak_offset`].
pub const LEAK_OFFSET_ENV: &str = "THERMAL_LEAK_OFFSET";
/// Environment variable overriding [`InspectionConfig::working_size`], as `WIDTHxHEIGHT`.
pub const WORKING_SIZE_ENV: &str = "THERMAL_WORKING_SIZE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    /// Deviation from the scene mean (in palette degrees) that marks a leak.
    pub leak_offset: f64,
    /// Resolution palette-rendered captures are resized to before decoding.
    pub working_size: WorkingSize,
    /// Resampling filter used for that resize.
    pub resize_filter: ResizeFilter,
    /// Ordered color → temperature swatches.
    pub palette: Palette,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            leak_offset: DEFAULT_LEAK_OFFSET,
            working_size: WorkingSize::default(),
            resize_filter: ResizeFilter::default(),
            palette: Palette::default(),
        }
    }
}

impl InspectionConfig {
    /// Reads a JSON config; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| InspectionError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Applies `THERMAL_LEAK_OFFSET` and `THERMAL_WORKING_SIZE` if set.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            std::env::var(LEAK_OFFSET_ENV).ok().as_deref(),
            std::env::var(WORKING_SIZE_ENV).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, leak_offset: Option<&str>, working_size: Option<&str>) -> Result<Self> {
        if let Some(raw) = leak_offset.filter(|s| !s.trim().is_empty()) {
            self.leak_offset = raw.trim().parse().map_err(|_| {
                InspectionError::InvalidConfig(format!("{LEAK_OFFSET_ENV}='{raw}' is not a number"))
            })?;
        }
        if let Some(raw) = working_size.filter(|s| !s.trim().is_empty()) {
            self.working_size = raw.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        validate_leak_offset(self.leak_offset)?;
        if self.working_size.width == 0 || self.working_size.height == 0 {
            return Err(InspectionError::InvalidConfig(
                "working size must be non-zero".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(InspectionError::EmptyPalette);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_deployment() {
        let config = InspectionConfig::default();
        assert_eq!(config.leak_offset, 5.0);
        assert_eq!(config.working_size, WorkingSize::new(250, 200));
        assert_eq!(config.palette.len(), 16);
        config.validate().unwrap();
    }

    #[test]
    fn overrides_apply_and_validate() {
        let config = InspectionConfig::default()
            .with_overrides(Some(" 3.5 "), Some("200x200"))
            .unwrap();
        assert_eq!(config.leak_offset, 3.5);
        assert_eq!(config.working_size, WorkingSize::new(200, 200));

        let unchanged = InspectionConfig::default().with_overrides(None, Some("")).unwrap();
        assert_eq!(unchanged, InspectionConfig::default());

        assert!(InspectionConfig::default().with_overrides(Some("hot"), None).is_err());
        assert!(InspectionConfig::default().with_overrides(Some("-2"), None).is_err());
        assert!(InspectionConfig::default().with_overrides(None, Some("0x10")).is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"leak_offset": 2.5, "resize_filter": "nearest"}}"#).unwrap();
        let config = InspectionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.leak_offset, 2.5);
        assert_eq!(config.resize_filter, ResizeFilter::Nearest);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn json_with_empty_palette_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"palette": []}}"#).unwrap();
        assert!(matches!(
            InspectionConfig::from_json_file(file.path()),
            Err(InspectionError::JsonParse { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = serde_json::to_string(&InspectionConfig::default()).unwrap();
        let back: InspectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InspectionConfig::default());
    }
}
