//! Event-driven listing page parsing
//!
//! Product records are extracted from a stream of markup events rather than a
//! DOM: each element open pushes a capture scope, character data is collected
//! by a scoped text recorder, and closing a product card emits one record.

pub mod capture_scope;
pub mod context;
pub mod error;
pub mod events;
pub mod html_source;
pub mod interpreters;
pub mod product_list_parser;
pub mod text_recorder;

// Re-export public types
pub use capture_scope::CaptureScopes;
pub use context::ParseContext;
pub use error::{FieldDiagnostic, ParsingError, ParsingResult};
pub use events::{Attributes, MarkupEvent, MarkupHandler, replay};
pub use html_source::HtmlEventSource;
pub use product_list_parser::{ParseSummary, ProductListParser};
pub use text_recorder::TextRecorder;

/// A source of markup events for one document
pub trait MarkupSource {
    /// Feed every event of the document, in document order, to `handler`
    fn drive<H: MarkupHandler>(&self, handler: &mut H);
}

impl MarkupSource for [MarkupEvent] {
    fn drive<H: MarkupHandler>(&self, handler: &mut H) {
        replay(self, handler);
    }
}

impl MarkupSource for Vec<MarkupEvent> {
    fn drive<H: MarkupHandler>(&self, handler: &mut H) {
        replay(self, handler);
    }
}
