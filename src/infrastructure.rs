//! Infrastructure layer for configuration, logging, and listing parsing
//!
//! This module provides the event-driven extraction engine together with
//! its configuration, error types, and logging setup.

pub mod config; // Marker and logging configuration
pub mod logging; // Logging infrastructure
pub mod parsing; // Event-driven listing extraction
pub mod parsing_error; // Parsing error types

// Re-export commonly used items
pub use config::{ExtractorConfig, ListingMarkers, LoggingConfig};
pub use logging::init_logging_with_config;
pub use parsing::{
    FieldDiagnostic, HtmlEventSource, MarkupEvent, MarkupHandler, ParseContext, ParseSummary,
    ParsingError, ParsingResult, ProductListParser,
};
