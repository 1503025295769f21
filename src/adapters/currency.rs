use crate::adapters::http;
use crate::domain::ports::RateSource;
use crate::utils::error::{FlightsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Deserialize)]
struct CurrencyRate {
    val: f64,
}

/// Compact converter API: `?q=RUB_EUR&compact=y` → `{"RUB_EUR": {"val": 0.0143}}`.
pub struct CurrencyConverter {
    client: Client,
    endpoint: String,
    pair: String,
    source_symbol: String,
    target_symbol: String,
}

impl CurrencyConverter {
    pub fn new(client: Client, endpoint: impl Into<String>, pair: impl Into<String>) -> Self {
        let pair = pair.into();
        let (source, target) = pair.split_once('_').unwrap_or((pair.as_str(), ""));
        let source_symbol = currency_symbol(source);
        let target_symbol = currency_symbol(target);
        Self {
            client,
            endpoint: endpoint.into(),
            pair,
            source_symbol,
            target_symbol,
        }
    }

    fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| FlightsError::ConfigError {
            message: format!("currency endpoint: {}", e),
        })?;
        url.query_pairs_mut()
            .append_pair("q", &self.pair)
            .append_pair("compact", "y");
        Ok(url)
    }
}

#[async_trait]
impl RateSource for CurrencyConverter {
    async fn rate(&self) -> Result<f64> {
        let url = self.request_url()?;
        let body = http::get_text(&self.client, url.as_str()).await?;
        let mut response: HashMap<String, CurrencyRate> = serde_json::from_str(&body)?;

        // 回應中缺少對應幣別時視為匯率 0，由呈現層退回原幣別
        Ok(response.remove(&self.pair).map(|rate| rate.val).unwrap_or(0.0))
    }

    fn source_symbol(&self) -> &str {
        &self.source_symbol
    }

    fn target_symbol(&self) -> &str {
        &self.target_symbol
    }
}

fn currency_symbol(code: &str) -> String {
    match code {
        "RUB" => "₽".to_string(),
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        "UAH" => "₴".to_string(),
        other => other.to_string(),
    }
}
