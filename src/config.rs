use crate::error::{HuntError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Top-level configuration for a hunting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterConfig {
    /// Affiliate tag appended to the winning product URL
    #[serde(default)]
    pub affiliate_tag: Option<String>,

    /// Maximum number of products checked per listing page
    #[serde(default = "default_check_limit")]
    pub check_limit: usize,

    /// Scheme and host used to build product detail URLs
    #[serde(default = "default_product_base_url")]
    pub product_base_url: String,

    /// Regex whose first capture group is the product identifier
    #[serde(default = "default_product_pattern")]
    pub product_pattern: String,

    /// Which extractor reads product pages
    #[serde(default)]
    pub extractor: ExtractorKind,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    /// Listing pages visited by a daily run, in order
    #[serde(default = "default_missions")]
    pub missions: Vec<Mission>,
}

/// One bestseller listing and the hashtag for its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub url: String,
    pub tag: String,
}

impl Mission {
    pub fn new(url: &str, tag: &str) -> Self {
        Self {
            url: url.to_string(),
            tag: tag.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// CSS locator chains
    #[default]
    Selectors,
    /// Generative-AI collaborator
    Ai,
}

/// Ordered CSS locators for each price field, highest priority first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_price_selectors")]
    pub price: Vec<String>,

    #[serde(default = "default_discount_selector")]
    pub discount: String,

    #[serde(default = "default_original_price_selectors")]
    pub original_price: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            price: default_price_selectors(),
            discount: default_discount_selector(),
            original_price: default_original_price_selectors(),
        }
    }
}

/// Browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Launch this chromedriver binary for each mission instead of using a running server
    #[serde(default)]
    pub chromedriver_path: Option<String>,

    /// Run an Xvfb virtual display for the duration of each mission
    #[serde(default)]
    pub virtual_display: bool,

    /// X display number used for the virtual display
    #[serde(default = "default_display_number")]
    pub display_number: u32,

    /// Xvfb screen geometry
    #[serde(default = "default_display_size")]
    pub display_size: String,

    /// Arguments passed to Chrome through the WebDriver capabilities
    #[serde(default = "default_chrome_args")]
    pub chrome_args: Vec<String>,

    /// Session connection attempts before trying the fallback ports
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Upper bound on a single page load, in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            chromedriver_path: None,
            virtual_display: false,
            display_number: default_display_number(),
            display_size: default_display_size(),
            chrome_args: default_chrome_args(),
            connect_attempts: default_connect_attempts(),
            page_timeout_secs: default_page_timeout_secs(),
        }
    }
}

/// Longest wait a delay range may ask for
pub const MAX_DELAY_SECS: f64 = 600.0;

/// Uniform random wait in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const NONE: DelayRange = DelayRange {
        min_secs: 0.0,
        max_secs: 0.0,
    };

    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Both ends finite, ordered and within `0..=MAX_DELAY_SECS`
    pub fn is_valid(&self) -> bool {
        (0.0..=MAX_DELAY_SECS).contains(&self.min_secs)
            && (self.min_secs..=MAX_DELAY_SECS).contains(&self.max_secs)
    }
}

/// Waits after each navigation so the session browses at a human pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_listing_delay")]
    pub listing: DelayRange,

    #[serde(default = "default_product_delay")]
    pub product: DelayRange,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            listing: default_listing_delay(),
            product: default_product_delay(),
        }
    }
}

impl PacingConfig {
    /// No waiting at all
    pub fn none() -> Self {
        Self {
            listing: DelayRange::NONE,
            product: DelayRange::NONE,
        }
    }
}

/// Generative-AI extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    /// Page text sent to the model is cut to this many characters
    #[serde(default = "default_ai_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_ai_model(),
            base_url: default_ai_base_url(),
            max_chars: default_ai_max_chars(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

/// Where the winning deal goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Webhook receiving the composed thread as JSON
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Only log the thread
    #[serde(default)]
    pub dry_run: bool,

    /// Appended after the mission tag in the hashtag line
    #[serde(default = "default_hashtag_suffix")]
    pub hashtag_suffix: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            dry_run: false,
            hashtag_suffix: default_hashtag_suffix(),
        }
    }
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            affiliate_tag: None,
            check_limit: default_check_limit(),
            product_base_url: default_product_base_url(),
            product_pattern: default_product_pattern(),
            extractor: ExtractorKind::default(),
            selectors: SelectorConfig::default(),
            browser: BrowserConfig::default(),
            pacing: PacingConfig::default(),
            ai: AiConfig::default(),
            publish: PublishConfig::default(),
            missions: default_missions(),
        }
    }
}

impl HunterConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override settings from `lookup`; empty values are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(tag) = get("AMAZON_TAG") {
            self.affiliate_tag = Some(tag);
        }
        if let Some(url) = get("WEBDRIVER_URL") {
            self.browser.webdriver_url = url;
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.ai.model = model;
        }
        if let Some(url) = get("PUBLISH_WEBHOOK_URL") {
            self.publish.webhook_url = Some(url);
        }
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("listing", self.pacing.listing),
            ("product", self.pacing.product),
        ] {
            if !range.is_valid() {
                return Err(HuntError::Config(format!(
                    "{} delay range {}..{} is invalid (must lie within 0..={} seconds)",
                    name, range.min_secs, range.max_secs, MAX_DELAY_SECS
                )));
            }
        }

        // Only a chromedriver we launch ourselves inherits DISPLAY
        if self.browser.virtual_display && self.browser.chromedriver_path.is_none() {
            return Err(HuntError::Config(
                "virtual_display requires browser.chromedriver_path so the launched driver can use it"
                    .to_string(),
            ));
        }

        if self.browser.connect_attempts == 0 || self.browser.page_timeout_secs == 0 {
            return Err(HuntError::Config(
                "browser connect_attempts and page_timeout_secs must be positive".to_string(),
            ));
        }

        if self.extractor == ExtractorKind::Ai && self.ai.api_key.is_none() {
            return Err(HuntError::Config(
                "AI extractor selected but no API key is set (GEMINI_API_KEY)".to_string(),
            ));
        }

        if self.missions.is_empty() {
            return Err(HuntError::Config("No missions configured".to_string()));
        }

        Ok(())
    }
}

fn default_check_limit() -> usize {
    11
}

fn default_product_base_url() -> String {
    "https://www.amazon.co.jp".to_string()
}

fn default_product_pattern() -> String {
    crate::filter::DEFAULT_PRODUCT_PATTERN.to_string()
}

fn default_price_selectors() -> Vec<String> {
    vec![
        "#corePriceDisplay_desktop_feature_div .a-price-whole".to_string(),
        "#corePrice_feature_div .a-price-whole".to_string(),
        ".a-price .a-price-whole".to_string(),
    ]
}

fn default_discount_selector() -> String {
    ".savingsPercentage".to_string()
}

fn default_original_price_selectors() -> Vec<String> {
    vec![
        "span.a-price.a-text-price span.a-offscreen".to_string(),
        ".basisPrice span.a-offscreen".to_string(),
    ]
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_display_number() -> u32 {
    99
}

fn default_display_size() -> String {
    "1920x1080x24".to_string()
}

fn default_chrome_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--window-size=1280,1024".to_string(),
        "--lang=ja-JP".to_string(),
    ]
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_listing_delay() -> DelayRange {
    DelayRange::new(5.0, 8.0)
}

fn default_product_delay() -> DelayRange {
    DelayRange::new(6.0, 10.0)
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ai_max_chars() -> usize {
    8000
}

fn default_ai_timeout_secs() -> u64 {
    60
}

fn default_hashtag_suffix() -> String {
    "#Amazonセール".to_string()
}

/// Gaming peripheral bestseller pages
fn default_missions() -> Vec<Mission> {
    vec![
        Mission::new(
            "https://www.amazon.co.jp/gp/bestsellers/computers/2151973051/",
            "#ゲーミングマウス",
        ),
        Mission::new(
            "https://www.amazon.co.jp/gp/bestsellers/computers/2151982051/ref=zg_bs_nav_computers_1",
            "#ゲーミングモニター",
        ),
        Mission::new(
            "https://www.amazon.co.jp/gp/bestsellers/computers/2151972051/ref=zg_bs_nav_computers_2_2151970051",
            "#ゲーミングキーボード",
        ),
    ]
}
