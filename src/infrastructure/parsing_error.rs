//! Parsing error types for listing extraction
//!
//! Errors here are contained at the record boundary: a product that cannot
//! be completed is reported in the parse summary and the parse continues
//! with the next product scope.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsingError {
    #[error("Required field '{field}' missing for product '{identifier}'")]
    RequiredFieldMissing { field: String, identifier: String },

    #[error("Could not parse price '{value}' for product '{identifier}'")]
    PriceUnparseable { identifier: String, value: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    /// Create a required field missing error for one product
    pub fn required_field_missing(field: &str, identifier: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Create a price error for one product
    pub fn price_unparseable(identifier: &str, value: &str) -> Self {
        Self::PriceUnparseable {
            identifier: identifier.to_string(),
            value: value.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

/// A field value the interpreters could not understand.
///
/// Not an error: the record is still delivered, with this note attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    pub field: &'static str,
    pub value: String,
}

impl FieldDiagnostic {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unclear '{}' with value '{}'", self.field, self.value)
    }
}
