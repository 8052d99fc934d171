pub mod html;
pub mod number;
pub mod price;


use crate::results::PriceInfo;
use price::PriceExtractor;
use scraper::Html;

/// What a product detail page yields before any ranking
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// Trimmed product title
    pub title: String,
    /// Fields found by the CSS locator chains
    pub price_info: PriceInfo,
    /// Visible body text, for the AI extractor
    pub text: String,
}

/// Parses a listing page and returns its links
pub fn parse_listing(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    html::links(&doc)
}

/// Parses a product page once and pulls out everything the mission needs
pub fn parse_product(html: &str, extractor: &PriceExtractor, max_text_chars: usize) -> ProductPage {
    let doc = Html::parse_document(html);

    ProductPage {
        title: html::product_title(&doc),
        price_info: extractor.extract(&doc),
        text: html::page_text(&doc, max_text_chars),
    }
}
