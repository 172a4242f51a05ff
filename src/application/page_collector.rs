//! Listing page collection service
//!
//! Caller-side coordination of the extraction engine: one parse session per
//! listing page, image references resolved against the site, and the records
//! of a page gathered with the page's parse summary.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::product::ExtractedProduct;
use crate::infrastructure::config::ExtractorConfig;
use crate::infrastructure::parsing::{ParseContext, ParseSummary, ParsingResult, ProductListParser};

/// Records extracted from one listing page
#[derive(Debug, Clone, Serialize)]
pub struct PageExtraction {
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    pub products: Vec<ExtractedProduct>,
    pub summary: ParseSummary,
}

impl PageExtraction {
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

/// Listing page HTML as handed over by the fetch layer
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub page_number: u32,
    pub html: String,
}

/// Collects product records from listing pages
pub struct ListingPageCollector {
    parser: ProductListParser,
    context: ParseContext,
}

impl ListingPageCollector {
    /// Create a collector with the markers and base URL of `config`
    pub fn new(config: &ExtractorConfig) -> ParsingResult<Self> {
        Ok(Self {
            parser: ProductListParser::with_markers(config.markers.clone())?,
            context: ParseContext::new(config.base_url.as_str()),
        })
    }

    /// Extract the products of one listing page
    pub fn collect_page(&self, html: &str, page_number: u32) -> PageExtraction {
        debug!("Collecting products from page {}", page_number);

        let context = &self.context;
        let mut products = Vec::new();
        let summary = self.parser.parse_html(html, |mut extracted| {
            extracted.image_uri = extracted
                .image_uri
                .map(|reference| context.resolve_uri(&reference));
            products.push(extracted);
        });

        info!(
            "Collected {} products from page {} ({} skipped)",
            products.len(),
            page_number,
            summary.skipped.len()
        );

        PageExtraction {
            page_number,
            products,
            summary,
        }
    }

    /// Extract several pages in parallel, one parse session per page.
    ///
    /// Results are returned in the order of `pages`.
    pub fn collect_pages(&self, pages: &[ListingPage]) -> Vec<PageExtraction> {
        pages
            .par_iter()
            .map(|page| self.collect_page(&page.html, page.page_number))
            .collect()
    }
}
