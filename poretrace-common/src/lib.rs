//! Shared types for the PoreTrace analyzer.

mod types;

pub use types::*;
