//! Catalog Extractor - Product record extraction from retailer listing pages
//!
//! Listing pages are consumed as a stream of markup events. A nested state
//! machine collects the text of each product card and interprets price, pack
//! size, promotion badge, and validity window into typed records, each with a
//! confidence level and diagnostics for anything it could not interpret.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the main entry points for easier access
pub use application::{ListingPage, ListingPageCollector, PageExtraction};
pub use domain::{Confidence, ExtractedProduct, Measure, StructuredProduct};
pub use infrastructure::{ExtractorConfig, ParseSummary, ProductListParser};
