//! Application layer module
//!
//! This module contains the caller-side services that drive the extraction
//! engine over listing pages.

pub mod page_collector;

pub use page_collector::{ListingPage, ListingPageCollector, PageExtraction};
