use crate::config::SelectorConfig;
use crate::error::{HuntError, Result};
use crate::parsers::number::clean_number;
use crate::results::PriceInfo;
use scraper::{ElementRef, Html, Selector};

/// A compiled CSS selector together with its source text (kept for logging)
#[derive(Debug, Clone)]
pub struct Locator {
    css: String,
    selector: Selector,
}

impl Locator {
    pub fn parse(css: &str) -> Result<Self> {
        let selector = Selector::parse(css).map_err(|e| HuntError::Selector {
            selector: css.to_string(),
            reason: format!("{:?}", e),
        })?;
        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    /// First element matching this locator, if any
    pub fn find<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&self.selector).next()
    }

    /// Cleaned number of the first matching element, `None` if nothing matches
    fn number(&self, doc: &Html) -> Option<u64> {
        self.find(doc)
            .map(|element| clean_number(Some(&element.text().collect::<String>())))
    }
}

/// Extracts price, discount and reference price from a product page.
///
/// Price and reference price walk their locators in priority order and take the
/// first strictly positive value; a locator that matches but cleans to zero
/// does not stop the search. Discount uses a single locator and may be zero.
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    price: Vec<Locator>,
    discount: Locator,
    original_price: Vec<Locator>,
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new(&SelectorConfig::default()).expect("Default selectors should be valid")
    }
}

impl PriceExtractor {
    /// Compile the locator lists from configuration
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        let price = compile_all(&config.price)?;
        let discount = Locator::parse(&config.discount)?;
        let original_price = compile_all(&config.original_price)?;

        Ok(Self {
            price,
            discount,
            original_price,
        })
    }

    pub fn extract(&self, doc: &Html) -> PriceInfo {
        let price = first_positive(&self.price, doc);
        let discount = self.discount.number(doc).unwrap_or(0);
        let original_price = first_positive(&self.original_price, doc);

        ::log::trace!(
            "Extracted price={} discount={} original_price={}",
            price,
            discount,
            original_price
        );

        PriceInfo {
            price,
            original_price,
            discount,
        }
    }

    /// Parse raw HTML and extract in one step
    pub fn extract_html(&self, html: &str) -> PriceInfo {
        let doc = Html::parse_document(html);
        self.extract(&doc)
    }
}

fn compile_all(selectors: &[String]) -> Result<Vec<Locator>> {
    selectors.iter().map(|css| Locator::parse(css)).collect()
}

fn first_positive(locators: &[Locator], doc: &Html) -> u64 {
    for locator in locators {
        match locator.number(doc) {
            Some(value) if value > 0 => return value,
            Some(_) => {
                ::log::trace!("Locator '{}' matched but cleaned to zero", locator.css())
            }
            None => {}
        }
    }
    0
}
