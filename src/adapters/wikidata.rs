//! Wikidata SPARQL endpoint, queried with `Accept: text/csv`.

use crate::adapters::http;
use crate::domain::ports::KnowledgeBaseClient;
use crate::utils::error::{FlightsError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use url::Url;

pub struct WikidataClient {
    client: Client,
    endpoint: String,
}

impl WikidataClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl KnowledgeBaseClient for WikidataClient {
    async fn select_csv(&self, query: &str) -> Result<String> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| FlightsError::ConfigError {
            message: format!("knowledge base endpoint: {}", e),
        })?;
        url.query_pairs_mut().append_pair("query", query);

        tracing::debug!("Querying knowledge base at {}", self.endpoint);
        let request = self.client.get(url).header(ACCEPT, "text/csv");
        http::fetch_text(request).await
    }
}
