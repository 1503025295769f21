use crate::adapters::http;
use crate::domain::model::{FareOption, GeoPoint};
use crate::domain::ports::FareSource;
use crate::utils::error::{FlightsError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    best_prices: Vec<FareOption>,
}

/// Fare calendar client: `?origin=BCN&destination=MOW&depart_date=2014-12-01&one_way=false`
pub struct FareCalendarClient {
    client: Client,
    endpoint: String,
}

impl FareCalendarClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn request_url(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        depart_date: NaiveDate,
    ) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| FlightsError::ConfigError {
            message: format!("fare calendar endpoint: {}", e),
        })?;
        url.query_pairs_mut()
            .append_pair("origin", &origin.code)
            .append_pair("destination", &destination.code)
            .append_pair("depart_date", &depart_date.format("%Y-%m-%d").to_string())
            .append_pair("one_way", "false");
        Ok(url)
    }
}

#[async_trait]
impl FareSource for FareCalendarClient {
    async fn fares(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        depart_date: NaiveDate,
    ) -> Result<Vec<FareOption>> {
        let url = self.request_url(origin, destination, depart_date)?;
        let body = http::get_text(&self.client, url.as_str()).await?;
        let response: CalendarResponse = serde_json::from_str(&body)?;

        tracing::debug!(
            "{} fare entries for {} -> {}",
            response.best_prices.len(),
            origin.code,
            destination.code
        );
        Ok(response.best_prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn point(code: &str) -> GeoPoint {
        GeoPoint {
            code: code.to_string(),
            display_name: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fares_query_and_parse() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/calendar_preload")
                .query_param("origin", "IEV")
                .query_param("destination", "TLL")
                .query_param("depart_date", "2020-01-09")
                .query_param("one_way", "false");
            then.status(200).json_body(serde_json::json!({
                "best_prices": [
                    {
                        "value": 8950,
                        "return_date": "2020-01-24",
                        "number_of_changes": 1,
                        "gate": "Svyaznoy",
                        "distance": 868,
                        "depart_date": "2020-01-23"
                    },
                    {
                        "value": 7420.5,
                        "return_date": "2020-02-02",
                        "number_of_changes": 0,
                        "gate": "Aviakassa",
                        "distance": 868,
                        "depart_date": "2020-01-30"
                    }
                ]
            }));
        });

        let client = FareCalendarClient::new(Client::new(), server.url("/calendar_preload"));
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        let fares = client.fares(&point("IEV"), &point("TLL"), date).await.unwrap();

        api_mock.assert();
        assert_eq!(fares.len(), 2);
        assert_eq!(fares[0].price, 8950.0);
        assert_eq!(fares[0].source_site, "Svyaznoy");
        assert_eq!(fares[0].distance_km, 868);
        assert_eq!(fares[1].change_count, 0);
        assert_eq!(fares[1].depart_date, "2020-01-30");
    }

    #[tokio::test]
    async fn test_fares_missing_array_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/calendar_preload");
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = FareCalendarClient::new(Client::new(), server.url("/calendar_preload"));
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        let fares = client.fares(&point("IEV"), &point("TLL"), date).await.unwrap();
        assert!(fares.is_empty());
    }

    #[tokio::test]
    async fn test_fares_missing_or_null_value_is_zero() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/calendar_preload");
            then.status(200).json_body(serde_json::json!({
                "best_prices": [
                    {"gate": "Svyaznoy", "depart_date": "2020-01-23", "return_date": "2020-01-24"},
                    {"value": null, "gate": "Aviakassa", "depart_date": "2020-01-23"},
                    {"value": 7400, "gate": "Tickets.ru", "depart_date": "2020-01-30"}
                ]
            }));
        });

        let client = FareCalendarClient::new(Client::new(), server.url("/calendar_preload"));
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        let fares = client.fares(&point("IEV"), &point("TLL"), date).await.unwrap();

        assert_eq!(fares.len(), 3);
        assert_eq!(fares[0].price, 0.0);
        assert_eq!(fares[1].price, 0.0);
        assert_eq!(fares[1].source_site, "Aviakassa");
        assert_eq!(fares[2].price, 7400.0);
    }

    #[tokio::test]
    async fn test_fares_malformed_entry() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/calendar_preload");
            then.status(200)
                .json_body(serde_json::json!({"best_prices": [{"value": "cheap"}]}));
        });

        let client = FareCalendarClient::new(Client::new(), server.url("/calendar_preload"));
        let date = NaiveDate::from_ymd_opt(2020, 1, 9).unwrap();
        let err = client.fares(&point("IEV"), &point("TLL"), date).await.unwrap_err();
        assert!(matches!(err, FlightsError::Parse(_)));
    }
}
