//! Markup event source backed by the `scraper` HTML parser
//!
//! html5ever repairs malformed markup while building the tree, so walking the
//! tree always yields balanced open/close pairs in document order.

use scraper::{ElementRef, Html, Node};
use tracing::trace;

use super::MarkupSource;
use super::events::{Attributes, MarkupHandler};

/// A parsed HTML document replayed as markup events
pub struct HtmlEventSource {
    document: Html,
}

impl HtmlEventSource {
    /// Parse a complete HTML document
    pub fn parse_document(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Tree construction errors reported by html5ever
    pub fn errors(&self) -> usize {
        self.document.errors.len()
    }

    /// Depth-first walk over the element tree without recursion, so the
    /// nesting depth of the document never grows the call stack.
    fn walk<H: MarkupHandler>(root: ElementRef<'_>, handler: &mut H) {
        let root = *root;
        let mut node = root;

        loop {
            let is_element = match node.value() {
                Node::Element(element) => {
                    let attributes: Attributes = element.attrs().collect();
                    handler.open(element.name(), &attributes);
                    true
                }
                Node::Text(text) => {
                    handler.characters(text);
                    false
                }
                _ => false,
            };

            if is_element {
                if let Some(child) = node.first_child() {
                    node = child;
                    continue;
                }
                handler.close();
            }

            // climb until a sibling is found, closing every finished element
            loop {
                if node.id() == root.id() {
                    return;
                }
                if let Some(sibling) = node.next_sibling() {
                    node = sibling;
                    break;
                }
                match node.parent() {
                    Some(parent) => {
                        node = parent;
                        handler.close();
                    }
                    None => return,
                }
            }
        }
    }
}

impl MarkupSource for HtmlEventSource {
    fn drive<H: MarkupHandler>(&self, handler: &mut H) {
        trace!(errors = self.errors(), "Replaying parsed HTML as markup events");
        Self::walk(self.document.root_element(), handler);
    }
}
