use crate::adapters::http;
use crate::domain::model::GeoPoint;
use crate::domain::ports::AirportLookup;
use crate::utils::error::{FlightsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    origin: Option<GeoPoint>,
    #[serde(default)]
    destination: Option<GeoPoint>,
}

/// Resolves "city city" free text through the airport suggestion widget endpoint.
pub struct AirportResolver {
    client: Client,
    endpoint: String,
}

impl AirportResolver {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, text: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| FlightsError::ConfigError {
            message: format!("airport suggest endpoint: {}", e),
        })?;
        url.query_pairs_mut().append_pair("q", text);
        Ok(url)
    }
}

#[async_trait]
impl AirportLookup for AirportResolver {
    async fn resolve(&self, text: &str) -> Result<(GeoPoint, GeoPoint)> {
        let url = self.request_url(text)?;
        let body = http::get_text(&self.client, url.as_str()).await?;
        let response: SuggestResponse = serde_json::from_str(&body)?;

        let origin = response.origin.unwrap_or_else(empty_point);
        let destination = response.destination.unwrap_or_else(empty_point);

        if origin.code.is_empty() || destination.code.is_empty() {
            return Err(FlightsError::AirportsNotResolved {
                origin: origin.code,
                destination: destination.code,
            });
        }

        tracing::debug!("Resolved {} -> {}", origin.code, destination.code);
        Ok((origin, destination))
    }
}

fn empty_point() -> GeoPoint {
    GeoPoint {
        code: String::new(),
        display_name: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_resolve_encodes_text_and_parses_points() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/widgets_suggest_params")
                .query_param("q", "Киев Таллин");
            then.status(200).json_body(serde_json::json!({
                "origin": {"iata": "IEV", "name": "Киев"},
                "destination": {"iata": "TLL", "name": "Таллин"}
            }));
        });

        let resolver = AirportResolver::new(Client::new(), server.url("/widgets_suggest_params"));
        let (origin, destination) = resolver.resolve("Киев Таллин").await.unwrap();

        api_mock.assert();
        assert_eq!(origin.code, "IEV");
        assert_eq!(origin.display_name, "Киев");
        assert_eq!(destination.code, "TLL");
    }

    #[tokio::test]
    async fn test_resolve_empty_code_is_not_resolved() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/suggest");
            then.status(200).json_body(serde_json::json!({
                "origin": {"iata": "IEV", "name": "Киев"},
                "destination": {"iata": "", "name": ""}
            }));
        });

        let resolver = AirportResolver::new(Client::new(), server.url("/suggest"));
        let err = resolver.resolve("Киев шошошо").await.unwrap_err();

        assert!(matches!(err, FlightsError::AirportsNotResolved { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_missing_destination() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/suggest");
            then.status(200).json_body(serde_json::json!({
                "origin": {"iata": "IEV", "name": "Киев"}
            }));
        });

        let resolver = AirportResolver::new(Client::new(), server.url("/suggest"));
        let err = resolver.resolve("Киев").await.unwrap_err();
        assert!(matches!(err, FlightsError::AirportsNotResolved { .. }));
    }

    #[tokio::test]
    async fn test_resolve_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/suggest");
            then.status(200).body("<html>oops</html>");
        });

        let resolver = AirportResolver::new(Client::new(), server.url("/suggest"));
        let err = resolver.resolve("Киев Таллин").await.unwrap_err();
        assert!(matches!(err, FlightsError::Parse(_)));
    }

    #[tokio::test]
    async fn test_resolve_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/suggest");
            then.status(500);
        });

        let resolver = AirportResolver::new(Client::new(), server.url("/suggest"));
        let err = resolver.resolve("Киев Таллин").await.unwrap_err();
        assert!(matches!(err, FlightsError::HttpStatus { status: 500, .. }));
    }
}
