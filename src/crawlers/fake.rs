//! In-memory document source for tests.

use crate::crawlers::crawler::{DocumentSource, SourceFactory};
use crate::error::{HuntError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What happened to the sessions opened by a [`FakeFactory`]
#[derive(Debug, Default)]
pub struct FakeLog {
    pub fetched: Vec<String>,
    pub opened: usize,
    pub closed: usize,
}

#[derive(Clone, Default)]
pub struct FakeFactory {
    pages: Arc<HashMap<String, String>>,
    pub log: Arc<Mutex<FakeLog>>,
    fail_open: bool,
}

impl FakeFactory {
    pub fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.log.lock().unwrap().fetched.clone()
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }
}

#[async_trait]
impl SourceFactory for FakeFactory {
    type Source = FakeSource;

    async fn open(&self, _webdriver_url: &str) -> Result<FakeSource> {
        if self.fail_open {
            return Err(HuntError::WebDriver("connection refused".to_string()));
        }
        self.log.lock().unwrap().opened += 1;
        Ok(FakeSource {
            pages: Arc::clone(&self.pages),
            log: Arc::clone(&self.log),
        })
    }
}

pub struct FakeSource {
    pages: Arc<HashMap<String, String>>,
    log: Arc<Mutex<FakeLog>>,
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        self.log.lock().unwrap().fetched.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HuntError::WebDriver(format!("unreachable: {}", url)))
    }

    async fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Listing page linking to the given product identifiers
pub fn listing_html(identifiers: &[&str]) -> String {
    let links: String = identifiers
        .iter()
        .map(|id| format!(r#"<a href="/Product-Name/dp/{}/ref=zg_bs">item</a>"#, id))
        .collect();
    format!("<html><body>{}</body></html>", links)
}

/// Product page with a title, price and optional discount
pub fn product_html(title: &str, price: &str, discount: Option<&str>) -> String {
    let discount = discount
        .map(|d| format!(r#"<span class="savingsPercentage">{}</span>"#, d))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <span id="productTitle"> {} </span>
            <div id="corePriceDisplay_desktop_feature_div"><span class="a-price-whole">{}</span></div>
            {}
        </body></html>"#,
        title, price, discount
    )
}
