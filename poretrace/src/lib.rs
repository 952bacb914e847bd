//! Cross-sectional porosity analysis for samples imaged above a flat
//! substrate.
//!
//! Per image the pipeline detects the substrate surface line, isolates the
//! sample silhouette above it, re-thresholds the original to expose pores,
//! traces the contour hierarchy and reports body area, pore area and their
//! ratio in physical units. Images are independent units of work; the
//! batch runner isolates per-image failures and keeps input order.

pub mod annotate;
pub mod batch;
pub mod contours;
pub mod error;
pub mod export;
pub mod mask;
pub mod measure;
pub mod pipeline;
pub mod surface;
pub mod threshold;

pub use error::{AnalysisError, Result};
pub use pipeline::{analyze, analyze_gray, measure_masked, Analysis};
