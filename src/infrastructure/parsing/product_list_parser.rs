//! Product list parser driven by markup events
//!
//! A four-state machine interprets open/characters/close events of a listing
//! page. Closing a product card finalizes the draft collected for it into a
//! [`StructuredProduct`] and hands it to the caller's callback, exactly once.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::capture_scope::CaptureScopes;
use super::error::{FieldDiagnostic, ParsingError, ParsingResult};
use super::events::{Attributes, MarkupHandler};
use super::html_source::HtmlEventSource;
use super::interpreters::{Quantity, interpret_badge, interpret_unit, interpret_validity, parse_price};
use super::text_recorder::{TextRecorder, sanitize};
use super::MarkupSource;
use crate::domain::product::{Confidence, ExtractedProduct, StructuredProduct};
use crate::infrastructure::config::ListingMarkers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Init,
    InProduct,
    InProductImage,
    InProductBadge,
}

/// Deferred action run when the element it was registered on closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rollback {
    DeliverProduct,
    ReturnToProduct,
}

/// Draft field a text recording is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftField {
    Name,
    Price,
    Unit,
    ValidFromTo,
}

#[derive(Debug, Default)]
struct ProductDraft {
    identifier: String,
    name: Option<String>,
    image_uri: Option<String>,
    price: Option<String>,
    unit: Option<String>,
    valid_from_to: Option<String>,
    badge: Option<String>,
    confidence: Confidence,
    problems: Vec<String>,
}

impl ProductDraft {
    fn new(identifier: String) -> Self {
        Self {
            identifier,
            ..Self::default()
        }
    }

    fn store(&mut self, field: DraftField, text: String) {
        let value = Some(text).filter(|t| !t.is_empty());
        match field {
            DraftField::Name => self.name = value,
            DraftField::Price => self.price = value,
            DraftField::Unit => self.unit = value,
            DraftField::ValidFromTo => self.valid_from_to = value,
        }
    }

    fn report(&mut self, diagnostic: FieldDiagnostic) {
        self.problems.push(diagnostic.to_string());
        self.confidence.downgrade();
    }
}

/// Outcome of one parse call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// Records handed to the callback
    pub emitted: usize,
    /// Product scopes that closed without a usable record
    pub skipped: Vec<ParsingError>,
    /// Identifier of a product still open when the event stream ended
    pub truncated: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductListParser {
    markers: ListingMarkers,
}

impl ProductListParser {
    /// Create a new product list parser with the default markers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with custom marker configuration
    pub fn with_markers(markers: ListingMarkers) -> ParsingResult<Self> {
        markers.validate()?;
        Ok(Self { markers })
    }

    /// Start a push-driven parse session; events are fed by the caller
    pub fn session<F>(&self, on_product: F) -> ExtractionSession<'_, F>
    where
        F: FnMut(ExtractedProduct),
    {
        ExtractionSession::new(&self.markers, on_product)
    }

    /// Extract every product from `source`, calling `on_product` once per
    /// completed product in document order
    pub fn parse<S, F>(&self, source: &S, on_product: F) -> ParseSummary
    where
        S: MarkupSource + ?Sized,
        F: FnMut(ExtractedProduct),
    {
        let mut session = self.session(on_product);
        source.drive(&mut session);
        session.finish()
    }

    /// Parse an HTML document and extract its products
    pub fn parse_html<F>(&self, html: &str, on_product: F) -> ParseSummary
    where
        F: FnMut(ExtractedProduct),
    {
        self.parse(&HtmlEventSource::parse_document(html), on_product)
    }
}

/// Mutable state of one parse call.
///
/// Owned exclusively by that call; separate sessions share nothing and can
/// run on separate threads.
pub struct ExtractionSession<'m, F> {
    markers: &'m ListingMarkers,
    on_product: F,
    state: ParserState,
    draft: Option<ProductDraft>,
    recorder: TextRecorder<DraftField>,
    scopes: CaptureScopes<Rollback>,
    summary: ParseSummary,
}

impl<'m, F> ExtractionSession<'m, F>
where
    F: FnMut(ExtractedProduct),
{
    fn new(markers: &'m ListingMarkers, on_product: F) -> Self {
        Self {
            markers,
            on_product,
            state: ParserState::Init,
            draft: None,
            recorder: TextRecorder::new(),
            scopes: CaptureScopes::new(),
            summary: ParseSummary::default(),
        }
    }

    /// End the session. A product still open is dropped without delivery.
    pub fn finish(mut self) -> ParseSummary {
        if let Some(draft) = self.draft.take() {
            debug!(
                "Event stream ended inside product '{}', dropping it",
                draft.identifier
            );
            self.summary.truncated = Some(draft.identifier);
        }
        self.recorder.cancel();
        self.scopes.abandon();
        self.summary
    }

    fn register(&mut self, rollback: Rollback) {
        if let Err(rollback) = self.scopes.register(rollback) {
            warn!("Scope already carries an action, ignoring {:?}", rollback);
        }
    }

    fn record(&mut self, depth: usize, field: DraftField) {
        if let Some(previous) = self.recorder.begin(depth, field) {
            trace!("Discarding undelivered {:?} recording for {:?}", previous, field);
        }
    }

    fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        self.draft.as_mut()
    }

    fn enter_product(&mut self, attributes: &Attributes) {
        let identifier = attributes
            .get(&self.markers.identifier_attr)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        trace!("Product scope opened for '{}'", identifier);

        self.draft = Some(ProductDraft::new(identifier));
        self.state = ParserState::InProduct;
        self.register(Rollback::DeliverProduct);
    }

    fn enter_product_child(&mut self, depth: usize, attributes: &Attributes) {
        let markers = self.markers;

        if attributes.has_class(&markers.title_wrapper) {
            self.record(depth, DraftField::Name);
        } else if attributes.has_class(&markers.figure) {
            self.state = ParserState::InProductImage;
            self.register(Rollback::ReturnToProduct);
        } else if attributes.has_class(&markers.price)
            && !attributes.has_class(&markers.comparative_price)
        {
            self.record(depth, DraftField::Price);
        } else if attributes.has_class(&markers.pack_size) {
            self.record(depth, DraftField::Unit);
        } else if attributes.has_class(&markers.promotion_date) {
            self.record(depth, DraftField::ValidFromTo);
        } else if attributes.has_class(&markers.badges) {
            self.state = ParserState::InProductBadge;
            self.register(Rollback::ReturnToProduct);
        }
    }

    fn attribute_value(attributes: &Attributes, name: &str) -> Option<String> {
        attributes
            .get(name)
            .map(sanitize)
            .filter(|value| !value.is_empty())
    }

    fn apply(&mut self, rollback: Rollback) {
        match rollback {
            Rollback::ReturnToProduct => self.state = ParserState::InProduct,
            Rollback::DeliverProduct => {
                self.state = ParserState::Init;
                if let Some(field) = self.recorder.cancel() {
                    trace!("Product closed while recording {:?}, discarding", field);
                }
                if let Some(draft) = self.draft.take() {
                    self.deliver(draft);
                }
            }
        }
    }

    fn deliver(&mut self, draft: ProductDraft) {
        match Self::finalize(draft) {
            Ok(extracted) => {
                debug!(
                    identifier = %extracted.product.identifier,
                    confidence = ?extracted.confidence,
                    "Delivering product"
                );
                self.summary.emitted += 1;
                (self.on_product)(extracted);
            }
            Err(e) => {
                warn!("Skipping product: {}", e);
                self.summary.skipped.push(e);
            }
        }
    }

    /// Turn a completed draft into the delivered record
    fn finalize(mut draft: ProductDraft) -> ParsingResult<ExtractedProduct> {
        if draft.identifier.is_empty() {
            return Err(ParsingError::required_field_missing("identifier", ""));
        }
        let price_text = draft
            .price
            .take()
            .ok_or_else(|| ParsingError::required_field_missing("price", &draft.identifier))?;
        let orig_price = parse_price(&price_text)
            .ok_or_else(|| ParsingError::price_unparseable(&draft.identifier, &price_text))?;

        let retrieved_on = Utc::now();

        let quantity = match draft.unit.take() {
            Some(unit) => interpret_unit(&unit).unwrap_or_else(|diagnostic| {
                draft.report(diagnostic);
                Quantity::SINGLE_UNIT
            }),
            None => Quantity::SINGLE_UNIT,
        };

        let (price, discount_amount) = match draft.badge.take() {
            Some(badge) => match interpret_badge(&badge) {
                Ok(discount) => (discount.price, discount.amount),
                Err(diagnostic) => {
                    draft.report(diagnostic);
                    (orig_price, 1)
                }
            },
            None => (orig_price, 1),
        };

        let valid_on = match draft.valid_from_to.take() {
            Some(text) => match interpret_validity(&text, retrieved_on) {
                Ok(window) => window.starts_at(),
                Err(diagnostic) => {
                    draft.report(diagnostic);
                    retrieved_on
                }
            },
            None => retrieved_on,
        };

        Ok(ExtractedProduct {
            product: StructuredProduct {
                identifier: draft.identifier,
                name: draft.name.unwrap_or_default(),
                volume: quantity.amount,
                volume_measure: quantity.measure,
                orig_price,
                price,
                discount_amount,
                retrieved_on,
            },
            image_uri: draft.image_uri,
            valid_on,
            confidence: draft.confidence,
            problems: draft.problems,
        })
    }
}

impl<F> MarkupHandler for ExtractionSession<'_, F>
where
    F: FnMut(ExtractedProduct),
{
    fn open(&mut self, tag: &str, attributes: &Attributes) {
        self.scopes.enter();
        let depth = self.scopes.depth();
        let markers = self.markers;

        match self.state {
            ParserState::Init => {
                if attributes.has_class(&markers.product_card) {
                    self.enter_product(attributes);
                }
            }
            ParserState::InProduct => self.enter_product_child(depth, attributes),
            ParserState::InProductImage => {
                if tag.eq_ignore_ascii_case(&markers.image_tag) {
                    let image_uri = Self::attribute_value(attributes, &markers.image_src_attr);
                    if let Some(draft) = self.draft_mut() {
                        draft.image_uri = image_uri;
                    }
                }
            }
            ParserState::InProductBadge => {
                if tag.eq_ignore_ascii_case(&markers.image_tag) {
                    let badge = Self::attribute_value(attributes, &markers.badge_text_attr);
                    if let Some(draft) = self.draft_mut() {
                        draft.badge = badge;
                    }
                }
            }
        }
    }

    fn characters(&mut self, fragment: &str) {
        self.recorder.append(fragment);
    }

    fn close(&mut self) {
        let depth = self.scopes.depth();
        if depth == 0 {
            warn!("Close event without a matching open, ignoring");
            return;
        }

        // the recorder delivers before the scope action, which may read the field
        if let Some((field, text)) = self.recorder.finalize(depth) {
            if let Some(draft) = self.draft_mut() {
                draft.store(field, text);
            }
        }

        if let Some(rollback) = self.scopes.leave() {
            self.apply(rollback);
        }
    }
}
