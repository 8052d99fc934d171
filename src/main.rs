use clap::Parser;
use deal_hunter::HunterConfig;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Secrets and tags may live in a local .env file
    if let Err(e) = dotenv::dotenv() {
        ::log::debug!("No .env file loaded: {}", e);
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match HunterConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => HunterConfig::default(),
    };
    config.apply_env();
    args.apply(&mut config);

    if let Err(e) = config.validate() {
        ::log::error!("{}", e);
        return ExitCode::FAILURE;
    }
    if config.affiliate_tag.is_none() {
        ::log::warn!("AMAZON_TAG is not set; links will carry no affiliate tag");
    }

    let publisher = match deal_hunter::publisher_for(&config) {
        Ok(publisher) => publisher,
        Err(e) => {
            ::log::error!("Failed to set up publisher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let hunter = match deal_hunter::webdriver_hunter(config) {
        Ok(hunter) => hunter,
        Err(e) => {
            ::log::error!("Failed to set up hunter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let missions = &hunter.config().missions;
    let winner = deal_hunter::daily::run_daily(&hunter, missions, publisher.as_ref()).await;

    ::log::info!(
        "Daily run complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    match winner {
        Some(deal) => println!("{} -{}% {}", deal.name, deal.discount, deal.url),
        None => println!("No deal found"),
    }

    ExitCode::SUCCESS
}
