//! Error module re-export
//!
//! This module re-exports the parsing error and diagnostic types.

pub use crate::infrastructure::parsing_error::{FieldDiagnostic, ParsingError, ParsingResult};
