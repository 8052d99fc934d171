use crate::config::BrowserConfig;
use crate::crawlers::crawler::{DocumentSource, SourceFactory};
use crate::error::{HuntError, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

/// Well-known local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Opens fantoccini sessions with the configured Chrome arguments
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    chrome_args: Vec<String>,
    connect_attempts: u32,
    page_timeout: Duration,
}

impl WebDriverFactory {
    pub fn new(chrome_args: Vec<String>) -> Self {
        Self {
            chrome_args,
            connect_attempts: 5,
            page_timeout: Duration::from_secs(45),
        }
    }

    /// Chrome arguments, connection attempts and page timeout from the browser section
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self::new(config.chrome_args.clone())
            .with_connect_attempts(config.connect_attempts)
            .with_page_timeout(Duration::from_secs(config.page_timeout_secs))
    }

    /// Connection attempts against the primary URL before trying fallbacks
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Upper bound on one navigation plus source read
    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.chrome_args }),
        );
        caps
    }

    async fn connect(&self, webdriver_url: &str) -> std::result::Result<Client, String> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        builder
            .connect(webdriver_url)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl SourceFactory for WebDriverFactory {
    type Source = WebDriverSource;

    async fn open(&self, webdriver_url: &str) -> Result<WebDriverSource> {
        // A freshly launched driver may need a moment before it accepts sessions
        let mut last_error = String::new();
        for attempt in 1..=self.connect_attempts {
            match self.connect(webdriver_url).await {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                    return Ok(WebDriverSource::new(client, self.page_timeout));
                }
                Err(e) => {
                    ::log::debug!(
                        "WebDriver connection attempt {}/{} to {} failed: {}",
                        attempt,
                        self.connect_attempts,
                        webdriver_url,
                        e
                    );
                    last_error = e;
                    if attempt < self.connect_attempts {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                }
            }
        }
        ::log::error!(
            "Failed to connect to WebDriver at {}: {}",
            webdriver_url,
            last_error
        );

        for url in FALLBACK_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(WebDriverSource::new(client, self.page_timeout));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(HuntError::WebDriver(format!(
            "no WebDriver reachable at {} or fallbacks: {}",
            webdriver_url, last_error
        )))
    }
}

/// A live fantoccini session
pub struct WebDriverSource {
    client: Option<Client>,
    page_timeout: Duration,
}

impl WebDriverSource {
    fn new(client: Client, page_timeout: Duration) -> Self {
        Self {
            client: Some(client),
            page_timeout,
        }
    }
}

#[async_trait]
impl DocumentSource for WebDriverSource {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| HuntError::WebDriver("session already closed".to_string()))?;

        ::log::debug!("SCRAPE: {}", url);
        let start = std::time::Instant::now();

        let source = timeout(self.page_timeout, async {
            client.goto(url).await?;
            client.source().await
        })
        .await
        .map_err(|_| HuntError::WebDriver(format!("timeout loading {}", url)))?
        .map_err(|e| {
            if e.to_string().contains("Unable to find session") {
                ::log::warn!("Lost WebDriver session while loading {}", url);
            }
            HuntError::from(e)
        })?;

        ::log::debug!(
            "Loaded {} ({} bytes) in {:.2} seconds",
            url,
            source.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(source)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await?;
            ::log::info!("Browser session closed");
        }
        Ok(())
    }
}
