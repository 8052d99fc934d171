use crate::error::Result;
use async_trait::async_trait;

/// A browsing session that turns URLs into page HTML
#[async_trait]
pub trait DocumentSource: Send {
    /// Navigate to `url` and return the rendered page source
    async fn fetch(&mut self, url: &str) -> Result<String>;

    /// End the session
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens one [`DocumentSource`] per mission
#[async_trait]
pub trait SourceFactory: Send + Sync {
    type Source: DocumentSource;

    /// Open a session against the given WebDriver endpoint
    async fn open(&self, webdriver_url: &str) -> Result<Self::Source>;
}
