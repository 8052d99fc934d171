// Re-export modules
pub mod ai;
pub mod config;
pub mod crawlers;
pub mod daily;
pub mod error;
pub mod filter;
pub mod mission;
pub mod parsers;
pub mod publish;
pub mod ranker;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{HunterConfig, Mission};
pub use error::{HuntError, Result};
pub use mission::Hunter;
pub use results::{DealCandidate, DealPost, PriceInfo};

use crawlers::WebDriverFactory;
use publish::{DryRunPublisher, Publisher, WebhookPublisher};

/// Hunter backed by a real WebDriver session
pub fn webdriver_hunter(config: HunterConfig) -> Result<Hunter<WebDriverFactory>> {
    let factory = WebDriverFactory::from_config(&config.browser);
    Hunter::new(config, factory)
}

/// Publisher selected by configuration: dry run, webhook, or dry run as a fallback
pub fn publisher_for(config: &HunterConfig) -> Result<Box<dyn Publisher>> {
    match (&config.publish.webhook_url, config.publish.dry_run) {
        (Some(url), false) => Ok(Box::new(WebhookPublisher::new(url)?)),
        (None, false) => {
            ::log::warn!("No PUBLISH_WEBHOOK_URL configured, deals will only be logged");
            Ok(Box::new(DryRunPublisher))
        }
        (_, true) => Ok(Box::new(DryRunPublisher)),
    }
}
