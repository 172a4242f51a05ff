//! Domain module - Core record types
//!
//! This module contains the immutable records delivered by the extraction
//! engine together with their value enums.

pub mod product;

// Re-export commonly used items for convenience
pub use product::{Confidence, ExtractedProduct, Measure, StructuredProduct};
