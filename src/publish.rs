use crate::error::{HuntError, Result};
use crate::results::DealPost;
use crate::utils::format_thousands;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// A post and its follow-up reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thread {
    pub main: String,
    pub reply: String,
}

/// Builds the announcement post and the reply carrying the link
pub fn compose_thread(deal: &DealPost) -> Thread {
    let mut main = format!(
        "🚨【セール速報】{}\n\n💰 現在: {}円\n📉 割引: -{}% OFF",
        deal.name,
        format_thousands(deal.price),
        deal.discount
    );
    if deal.original > 0 {
        main.push_str(&format!(" (元値: {}円)", format_thousands(deal.original)));
    }
    main.push_str("\n\n在庫と詳細はリプライへ👇");

    let reply = format!("在庫はこちら👉 {}\n{}", deal.url, deal.hashtag);

    Thread { main, reply }
}

/// Sends a winning deal somewhere public
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, deal: &DealPost) -> Result<()>;
}

/// Logs the thread instead of posting it
#[derive(Debug, Default)]
pub struct DryRunPublisher;

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, deal: &DealPost) -> Result<()> {
        let thread = compose_thread(deal);
        ::log::info!("[dry run] post:\n{}", thread.main);
        ::log::info!("[dry run] reply:\n{}", thread.reply);
        Ok(())
    }
}

/// POSTs the composed thread and the raw deal as JSON
pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, deal: &DealPost) -> Result<()> {
        let thread = compose_thread(deal);
        let body = json!({
            "main": thread.main,
            "reply": thread.reply,
            "deal": deal,
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(HuntError::Publish(format!("{}: {}", status, text)));
        }

        ::log::info!("Published deal to webhook ({})", status);
        Ok(())
    }
}
