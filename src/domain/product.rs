use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit the quantity of a product is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Units,
    Milligrams,
    Milliliters,
}

/// Reliability of one extracted record.
///
/// Ordered so that `Neutral > Low`; a record only ever moves downwards.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    #[default]
    Neutral,
}

impl Confidence {
    /// Lower the confidence to `Low`. Repeated calls stay `Low`.
    pub fn downgrade(&mut self) {
        *self = Self::Low;
    }
}

/// Product basic information from listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredProduct {
    pub identifier: String,
    pub name: String,
    pub volume: u64,
    #[serde(rename = "volumeMeasure")]
    pub volume_measure: Measure,
    /// Regular price in cents
    #[serde(rename = "origPrice")]
    pub orig_price: u64,
    /// Price in cents paid for `discount_amount` units
    pub price: u64,
    /// Bundle size of the price, 1 when there is no combination discount
    #[serde(rename = "discountAmount")]
    pub discount_amount: u64,
    #[serde(rename = "retrievedOn")]
    pub retrieved_on: DateTime<Utc>,
}

/// Everything delivered for one completed product scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProduct {
    pub product: StructuredProduct,
    #[serde(rename = "imageUri")]
    pub image_uri: Option<String>,
    #[serde(rename = "validOn")]
    pub valid_on: DateTime<Utc>,
    pub confidence: Confidence,
    pub problems: Vec<String>,
}
