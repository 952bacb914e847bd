use thiserror::Error;

/// Per-image failure kinds
///
/// Every variant is fatal for the image it occurred on and for that image
/// only; the batch runner records it and moves on.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("surface not found: column {column} of the smoothed threshold has no foreground pixel")]
    SurfaceNotFound { column: u32 },

    #[error("extracted sample silhouette has zero area")]
    DegenerateMask,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
