use crate::ai::{AiExtractor, GeminiExtractor};
use crate::config::{DelayRange, ExtractorKind, HunterConfig, Mission};
use crate::crawlers::{BrowserEnvironment, DocumentSource, SourceFactory};
use crate::error::Result;
use crate::filter::IdentifierFilter;
use crate::parsers::{self, price::PriceExtractor};
use crate::ranker::Ranker;
use crate::results::{DealCandidate, DealPost};
use crate::utils::{affiliate_url, format_thousands, product_url, random_delay, shorten_name};

/// Number of title words kept in the published name
const SHORT_NAME_WORDS: usize = 5;

/// Runs missions: one listing page, its top products, one best deal
pub struct Hunter<F: SourceFactory> {
    config: HunterConfig,
    factory: F,
    extractor: PriceExtractor,
    filter: IdentifierFilter,
    ai: Option<Box<dyn AiExtractor>>,
}

impl<F: SourceFactory> Hunter<F> {
    /// Compile selectors and patterns from `config` and set up the configured extractor
    pub fn new(config: HunterConfig, factory: F) -> Result<Self> {
        let extractor = PriceExtractor::new(&config.selectors)?;
        let filter = IdentifierFilter::new(&config.product_pattern)?;
        let ai: Option<Box<dyn AiExtractor>> = match config.extractor {
            ExtractorKind::Selectors => None,
            ExtractorKind::Ai => Some(Box::new(GeminiExtractor::new(&config.ai)?)),
        };

        Ok(Self {
            config,
            factory,
            extractor,
            filter,
            ai,
        })
    }

    /// Read product pages with `ai` instead of the CSS locators
    pub fn with_ai_extractor(mut self, ai: Box<dyn AiExtractor>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Settings this hunter was built from
    pub fn config(&self) -> &HunterConfig {
        &self.config
    }

    /// Run one mission to completion.
    ///
    /// Never fails: every error is logged and turns into `None`. The browser
    /// session is closed and the browser environment torn down on every path.
    pub async fn run_mission(&self, mission: &Mission) -> Option<DealPost> {
        ::log::info!("Starting mission {}", mission.tag);
        ::log::info!("Target: {}", mission.url);

        let environment = match BrowserEnvironment::start(&self.config.browser) {
            Ok(environment) => environment,
            Err(e) => {
                ::log::error!("Mission {} failed to start browser environment: {}", mission.tag, e);
                return None;
            }
        };
        if let Some(display) = environment.display() {
            ::log::info!("Virtual display running on {}", display);
        }

        let webdriver_url = environment.webdriver_url(&self.config.browser);
        let mut source = match self.factory.open(webdriver_url).await {
            Ok(source) => source,
            Err(e) => {
                ::log::error!("Mission {} could not open a browser session: {}", mission.tag, e);
                return None;
            }
        };

        let result = self.hunt(&mut source, mission).await;

        if let Err(e) = source.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        drop(environment);

        match result {
            Ok(Some(post)) => {
                ::log::info!(
                    "Best deal for {}: {} ({}% OFF)",
                    mission.tag,
                    post.name,
                    post.discount
                );
                Some(post)
            }
            Ok(None) => {
                ::log::info!("No qualifying deal for {}", mission.tag);
                None
            }
            Err(e) => {
                ::log::error!("Mission {} failed: {}", mission.tag, e);
                None
            }
        }
    }

    async fn hunt(&self, source: &mut F::Source, mission: &Mission) -> Result<Option<DealPost>> {
        let listing = source.fetch(&mission.url).await?;
        pause(self.config.pacing.listing).await;

        let links = parsers::parse_listing(&listing);
        let identifiers = self
            .filter
            .extract_identifiers(&links, self.config.check_limit);

        if identifiers.is_empty() {
            ::log::warn!("No product identifiers found on {}", mission.url);
            return Ok(None);
        }
        ::log::info!("Listed top {} products", identifiers.len());

        let mut ranker = Ranker::new();
        let total = identifiers.len();

        for (i, identifier) in identifiers.iter().enumerate() {
            let url = product_url(&self.config.product_base_url, identifier);
            ::log::info!("[{}/{}] Checking {}", i + 1, total, identifier);

            match self.inspect(source, &url).await {
                Ok(Some(candidate)) => {
                    ::log::info!(
                        "{}円 (discount {}%)",
                        format_thousands(candidate.price),
                        candidate.discount
                    );
                    if ranker.offer(candidate) {
                        ::log::info!("New best so far: {}", identifier);
                    }
                }
                Ok(None) => ::log::warn!("No price found for {}", identifier),
                Err(e) => ::log::warn!("Skipping {}: {}", identifier, e),
            }
        }

        Ok(ranker
            .into_winner()
            .map(|winner| self.to_post(winner, mission)))
    }

    /// Fetch one product page and turn it into a candidate if it has a price
    async fn inspect(&self, source: &mut F::Source, url: &str) -> Result<Option<DealCandidate>> {
        let html = source.fetch(url).await?;
        pause(self.config.pacing.product).await;

        let page = parsers::parse_product(&html, &self.extractor, self.config.ai.max_chars);

        let (name, info) = match &self.ai {
            Some(ai) => {
                let product = ai.extract(&page.text).await?;
                let name = if product.name.is_empty() {
                    page.title
                } else {
                    product.name.clone()
                };
                (name, product.price_info())
            }
            None => (page.title, page.price_info),
        };

        if info.price == 0 {
            return Ok(None);
        }
        Ok(Some(DealCandidate::new(name, url.to_string(), info)))
    }

    fn to_post(&self, winner: DealCandidate, mission: &Mission) -> DealPost {
        DealPost {
            name: shorten_name(&winner.name, SHORT_NAME_WORDS),
            price: winner.price,
            original: winner.original_price,
            discount: winner.discount,
            url: affiliate_url(&winner.url, self.config.affiliate_tag.as_deref()),
            hashtag: format!("{} {}", mission.tag, self.config.publish.hashtag_suffix),
        }
    }
}

async fn pause(range: DelayRange) {
    let delay = random_delay(range);
    if !delay.is_zero() {
        ::log::debug!("Waiting {:.1}s", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}
