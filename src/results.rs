use serde::{Deserialize, Serialize};

/// Pricing fields read from one product page. Zero means "not found".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    /// Current selling price
    pub price: u64,

    /// Reference ("was") price
    pub original_price: u64,

    /// Discount percentage
    pub discount: u64,
}

/// One product that yielded a positive price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealCandidate {
    /// Product title as shown on the page
    pub name: String,

    /// Product detail URL (without affiliate tag)
    pub url: String,

    pub price: u64,
    pub original_price: u64,
    pub discount: u64,
}

impl DealCandidate {
    pub fn new(name: String, url: String, info: PriceInfo) -> Self {
        Self {
            name,
            url,
            price: info.price,
            original_price: info.original_price,
            discount: info.discount,
        }
    }
}

/// The winning deal of a mission, ready to hand to a publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPost {
    /// Shortened product name
    pub name: String,
    pub price: u64,
    pub original: u64,
    pub discount: u64,

    /// Product URL including the affiliate tag
    pub url: String,
    pub hashtag: String,
}

/// Product fields returned by the AI extractor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiProduct {
    pub name: String,
    pub price: u64,
    pub original: u64,
    pub discount: u64,
}

impl AiProduct {
    pub fn price_info(&self) -> PriceInfo {
        PriceInfo {
            price: self.price,
            original_price: self.original,
            discount: self.discount,
        }
    }
}
