// THEORY:
// This file is the main entry point for the `thermal_leaks` library crate.
//
// The high-level interface is `ThermalInspector` (one capture at a time) and
// `BatchInspector` (many captures concurrently), configured by
// `InspectionConfig` and reporting through `InspectionReport` and the shared
// `Prediction` record. The building blocks (grid, palette, temperature field,
// baseline, region detector, compositor) live under `core_modules` and stay
// public for callers that want to run a single stage on its own.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::InspectionConfig;
pub use core_modules::color_image::{ColorImage, ResizeFilter, WorkingSize};
pub use core_modules::leak_region::{BoundingBox, LeakKind, LeakRegion};
pub use core_modules::prediction::{ClassSummary, Prediction};
pub use error::{InspectionError, Result};
pub use parallel_pipeline::{BatchInspector, BatchItem};
pub use pipeline::{CellReport, InspectionReport, ThermalInspector};
