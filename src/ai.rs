//! Product field extraction through a generative-AI model.
//!
//! The model receives the visible page text and answers with a small JSON
//! object. Numbers may come back as JSON numbers or as display strings such
//! as `"¥1,980"`; both are coerced to integers.

use crate::config::AiConfig;
use crate::error::{HuntError, Result};
use crate::parsers::number::clean_number;
use crate::results::AiProduct;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Reads product fields from page text
#[async_trait]
pub trait AiExtractor: Send + Sync {
    async fn extract(&self, page_text: &str) -> Result<AiProduct>;
}

/// Client for a Gemini-style `generateContent` endpoint
pub struct GeminiExtractor {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiExtractor {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HuntError::Config("missing AI API key".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl AiExtractor for GeminiExtractor {
    async fn extract(&self, page_text: &str) -> Result<AiProduct> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(page_text) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        ::log::debug!("Calling AI model {} ({} chars)", self.model, page_text.len());

        let response: Value = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| HuntError::AiResponse("no text in first candidate".to_string()))?;

        parse_product_json(text)
    }
}

fn build_prompt(page_text: &str) -> String {
    format!(
        "From the following product page text, extract the product name, the current price, \
         the reference (original) price and the discount percentage.\n\
         Answer with JSON only: {{\"name\": string, \"price\": integer, \"original\": integer, \"discount\": integer}}.\n\
         Use 0 for any value that is not on the page.\n\n{}",
        page_text
    )
}

/// Parse the model's answer, tolerating Markdown code fences
pub fn parse_product_json(text: &str) -> Result<AiProduct> {
    let clean = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value = serde_json::from_str(clean)
        .map_err(|e| HuntError::AiResponse(format!("{}: {}", e, clean)))?;

    if !value.is_object() {
        return Err(HuntError::AiResponse(format!("expected an object: {}", clean)));
    }

    Ok(AiProduct {
        name: value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        price: coerce_integer(value.get("price")),
        original: coerce_integer(value.get("original")),
        discount: coerce_integer(value.get("discount")),
    })
}

fn coerce_integer(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => clean_number(Some(s)),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> AiConfig {
        AiConfig {
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            ..AiConfig::default()
        }
    }

    fn gemini_reply(text: &str) -> Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn test_parse_plain_json() {
        let product = parse_product_json(
            r#"{"name": "ゲーミングマウス", "price": 4980, "original": 6980, "discount": 29}"#,
        )
        .unwrap();
        assert_eq!(
            product,
            AiProduct {
                name: "ゲーミングマウス".to_string(),
                price: 4980,
                original: 6980,
                discount: 29,
            }
        );
    }

    #[test]
    fn test_parse_fenced_json_with_string_numbers() {
        let text = "```json\n{\"name\": \"Keyboard\", \"price\": \"¥12,800\", \"original\": null, \"discount\": \"-15%\"}\n```";
        let product = parse_product_json(text).unwrap();
        assert_eq!(product.name, "Keyboard");
        assert_eq!(product.price, 12800);
        assert_eq!(product.original, 0);
        assert_eq!(product.discount, 15);
    }

    #[test]
    fn test_float_and_negative_numbers() {
        let product =
            parse_product_json(r#"{"name": "x", "price": 1980.0, "original": -5, "discount": 10.7}"#)
                .unwrap();
        assert_eq!(product.price, 1980);
        assert_eq!(product.original, 0);
        assert_eq!(product.discount, 10);
    }

    #[test]
    fn test_malformed_answers() {
        assert!(parse_product_json("I could not find a price").is_err());
        assert!(parse_product_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let config = AiConfig::default();
        assert!(GeminiExtractor::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_extract_via_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
                "```json\n{\"name\": \"Monitor\", \"price\": 29800, \"original\": 39800, \"discount\": 25}\n```",
            )))
            .mount(&server)
            .await;

        let extractor = GeminiExtractor::new(&config(&server.uri())).unwrap();
        let product = extractor.extract("27インチ モニター ￥29,800").await.unwrap();

        assert_eq!(product.name, "Monitor");
        assert_eq!(product.price, 29800);
        assert_eq!(product.original, 39800);
        assert_eq!(product.discount, 25);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let extractor = GeminiExtractor::new(&config(&server.uri())).unwrap();
        assert!(extractor.extract("text").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let extractor = GeminiExtractor::new(&config(&server.uri())).unwrap();
        assert!(matches!(
            extractor.extract("text").await,
            Err(HuntError::AiResponse(_))
        ));
    }
}
