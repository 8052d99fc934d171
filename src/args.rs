use clap::{Parser, ValueEnum};
use deal_hunter::config::{ExtractorKind, HunterConfig, Mission, PacingConfig};

#[derive(Parser, Debug)]
#[command(name = "deal-hunter")]
#[command(about = "Finds the best discount on bestseller listings and posts it")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run a single listing URL instead of the configured missions
    #[arg(long, requires = "tag")]
    pub url: Option<String>,

    /// Category hashtag for --url
    #[arg(long, requires = "url")]
    pub tag: Option<String>,

    /// Products checked per listing page
    #[arg(short = 'n', long)]
    pub check_limit: Option<usize>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// How product pages are read
    #[arg(short, long, value_enum)]
    pub extractor: Option<ExtractorArg>,

    /// Log the post instead of publishing it
    #[arg(long)]
    pub dry_run: bool,

    /// Start an Xvfb virtual display for each mission (needs browser.chromedriver_path)
    #[arg(long)]
    pub virtual_display: bool,

    /// Skip the waits between page loads
    #[arg(long)]
    pub no_delay: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExtractorArg {
    Selectors,
    Ai,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Selectors => ExtractorKind::Selectors,
            ExtractorArg::Ai => ExtractorKind::Ai,
        }
    }
}

impl Args {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply(&self, config: &mut HunterConfig) {
        if let (Some(url), Some(tag)) = (&self.url, &self.tag) {
            config.missions = vec![Mission::new(url, tag)];
        }
        if let Some(limit) = self.check_limit {
            config.check_limit = limit;
        }
        if let Some(url) = &self.webdriver_url {
            config.browser.webdriver_url = url.clone();
        }
        if let Some(extractor) = self.extractor {
            config.extractor = extractor.into();
        }
        if self.dry_run {
            config.publish.dry_run = true;
        }
        if self.virtual_display {
            config.browser.virtual_display = true;
        }
        if self.no_delay {
            config.pacing = PacingConfig::none();
        }
    }
}
