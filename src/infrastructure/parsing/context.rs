//! Parsing context for listing extraction
//!
//! Site information a caller attaches to the records of a parse call.

use tracing::debug;
use url::Url;

/// Context information for parsing listing pages of one site
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Base URL for resolving relative image references
    pub base_url: String,
}

impl ParseContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Resolve an image reference against the base URL.
    ///
    /// Absolute and protocol-relative references resolve as-is; a reference
    /// that cannot be resolved is kept verbatim.
    pub fn resolve_uri(&self, reference: &str) -> String {
        let resolved = Url::parse(&self.base_url).and_then(|base| base.join(reference));
        match resolved {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!("Keeping unresolved reference '{}': {}", reference, e);
                reference.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_resolution() {
        let context = ParseContext::new("https://www.jumbo.com/producten");

        assert_eq!(
            context.resolve_uri("/dam/images/123.png"),
            "https://www.jumbo.com/dam/images/123.png"
        );
        assert_eq!(
            context.resolve_uri("//static.jumbo.com/a.png"),
            "https://static.jumbo.com/a.png"
        );
        assert_eq!(
            context.resolve_uri("https://other.com/test.png"),
            "https://other.com/test.png"
        );
    }

    #[test]
    fn test_invalid_base_keeps_reference() {
        let context = ParseContext::new("not a url");
        assert_eq!(context.resolve_uri("img/1.png"), "img/1.png");
    }
}
