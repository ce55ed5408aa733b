use std::path::PathBuf;
use thiserror::Error;

/// Every way a single inspection can fail. Failures are terminal for the call
/// that produced them; no partial report is ever returned.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("Invalid input: grid has no cells")]
    EmptyGrid,

    #[error("Invalid input: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Coordinate ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(
        "Invalid input: field is {field_rows}x{field_cols} but visualization is {image_rows}x{image_cols}"
    )]
    DimensionMismatch {
        field_rows: usize,
        field_cols: usize,
        image_rows: usize,
        image_cols: usize,
    },

    #[error("Configuration error: palette has no entries")]
    EmptyPalette,

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Structural detector failed: {0}")]
    StructuralDetector(String),

    #[error("Inspection worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, InspectionError>;
