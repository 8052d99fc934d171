use crate::config::Mission;
use crate::crawlers::SourceFactory;
use crate::mission::Hunter;
use crate::publish::Publisher;
use crate::results::DealPost;
use rand::Rng;

/// Run every mission in order, draw one winner and publish it.
///
/// Returns the published deal, or `None` when no mission produced one.
/// A publishing failure is logged; the winner is still returned.
pub async fn run_daily<F: SourceFactory>(
    hunter: &Hunter<F>,
    missions: &[Mission],
    publisher: &dyn Publisher,
) -> Option<DealPost> {
    ::log::info!("Daily run started with {} missions", missions.len());

    let mut candidates = Vec::new();
    for mission in missions {
        match hunter.run_mission(mission).await {
            Some(post) => {
                ::log::info!("Candidate added: {}", post.name);
                candidates.push(post);
            }
            None => ::log::info!("Pass: nothing from {}", mission.tag),
        }
    }

    if candidates.is_empty() {
        ::log::info!("No deal worth posting this time");
        return None;
    }

    ::log::info!("Drawing a winner from {} candidates", candidates.len());
    let winner = choose_winner(candidates)?;
    ::log::info!("Winner: {}", winner.name);

    match publisher.publish(&winner).await {
        Ok(()) => ::log::info!("Deal published"),
        Err(e) => ::log::error!("Publishing failed: {}", e),
    }

    Some(winner)
}

/// Uniformly random pick
fn choose_winner(mut candidates: Vec<DealPost>) -> Option<DealPost> {
    if candidates.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HunterConfig, PacingConfig};
    use crate::crawlers::fake::{FakeFactory, listing_html, product_html};
    use crate::error::{HuntError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        posts: Mutex<Vec<DealPost>>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, deal: &DealPost) -> Result<()> {
            self.posts.lock().unwrap().push(deal.clone());
            if self.fail {
                return Err(HuntError::Publish("rate limited".to_string()));
            }
            Ok(())
        }
    }

    fn hunter(factory: FakeFactory) -> Hunter<FakeFactory> {
        let config = HunterConfig {
            pacing: PacingConfig::none(),
            ..HunterConfig::default()
        };
        Hunter::new(config, factory).unwrap()
    }

    fn deal(name: &str) -> DealPost {
        DealPost {
            name: name.to_string(),
            price: 1000,
            original: 0,
            discount: 10,
            url: String::new(),
            hashtag: String::new(),
        }
    }

    #[test]
    fn test_choose_winner() {
        assert!(choose_winner(Vec::new()).is_none());
        assert_eq!(choose_winner(vec![deal("only")]).unwrap().name, "only");

        let names = ["a", "b", "c"];
        for _ in 0..20 {
            let winner = choose_winner(names.iter().map(|n| deal(n)).collect()).unwrap();
            assert!(names.contains(&winner.name.as_str()));
        }
    }

    #[tokio::test]
    async fn test_daily_publishes_one_winner() {
        let factory = FakeFactory::new(vec![
            ("https://shop.test/mice".to_string(), listing_html(&["B0AAAAAAAA"])),
            ("https://shop.test/empty".to_string(), "<html></html>".to_string()),
            (
                "https://www.amazon.co.jp/dp/B0AAAAAAAA".to_string(),
                product_html("Mouse", "1,000", Some("-30%")),
            ),
        ]);
        let missions = vec![
            Mission::new("https://shop.test/mice", "#Mouse"),
            Mission::new("https://shop.test/empty", "#Empty"),
            Mission::new("https://shop.test/missing", "#Missing"),
        ];
        let publisher = RecordingPublisher::default();

        let winner = run_daily(&hunter(factory.clone()), &missions, &publisher)
            .await
            .unwrap();

        assert_eq!(winner.name, "Mouse");
        assert_eq!(winner.hashtag, "#Mouse #Amazonセール");
        assert_eq!(*publisher.posts.lock().unwrap(), vec![winner]);
        // One session per mission, all closed
        assert_eq!(factory.opened(), 3);
        assert_eq!(factory.closed(), 3);
    }

    #[tokio::test]
    async fn test_daily_without_candidates_does_not_publish() {
        let factory = FakeFactory::new(Vec::new());
        let missions = vec![Mission::new("https://shop.test/missing", "#Missing")];
        let publisher = RecordingPublisher::default();

        assert!(run_daily(&hunter(factory), &missions, &publisher).await.is_none());
        assert!(publisher.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_still_returns_winner() {
        let factory = FakeFactory::new(vec![
            ("https://shop.test/mice".to_string(), listing_html(&["B0AAAAAAAA"])),
            (
                "https://www.amazon.co.jp/dp/B0AAAAAAAA".to_string(),
                product_html("Mouse", "1,000", Some("-30%")),
            ),
        ]);
        let missions = vec![Mission::new("https://shop.test/mice", "#Mouse")];
        let publisher = RecordingPublisher {
            fail: true,
            ..RecordingPublisher::default()
        };

        let winner = run_daily(&hunter(factory), &missions, &publisher).await;
        assert_eq!(winner.map(|w| w.discount), Some(30));
    }
}
