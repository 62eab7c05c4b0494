use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use reqwest::{Client, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::BookingApi;
use crate::api::types::{AvailabilitySlot, Provider};
use crate::config::ApiConfig;

/// Query string of the day-availability endpoint. Month is 1-indexed.
#[derive(Debug, Serialize)]
struct DayQuery {
    year: i32,
    month: u32,
    day: u32,
}

impl From<NaiveDate> for DayQuery {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// HTTP client for the booking backend.
#[derive(Clone, Debug)]
pub struct BookingClient {
    client: Client,
    base_url: Url,
}

impl BookingClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| eyre!("Invalid API base URL '{}': {}", config.base_url, e))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL '{}' cannot be used as a base", config.base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL from path segments, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("API request failed: {} - {}", status, body);
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BookingApi for BookingClient {
    async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.get(self.endpoint(&["providers"]), &[] as &[(&str, &str)])
            .await
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        let url = self.endpoint(&["providers", provider_id, "day-availability"]);
        self.get(url, &DayQuery::from(date)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> BookingClient {
        BookingClient::new(&ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        };
        assert!(BookingClient::new(&config).is_err());
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = BookingClient::new(&ApiConfig {
            base_url: "http://localhost:3333/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        let url = client.endpoint(&["providers", "a b/c", "day-availability"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:3333/api/providers/a%20b%2Fc/day-availability"
        );
    }

    #[tokio::test]
    async fn test_list_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "p1", "name": "Ana", "avatar_url": "http://img/1"},
                {"id": "p2", "name": "Bruno", "avatar_url": "http://img/2"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let providers = client_for(&server).list_providers().await.unwrap();
        let ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_day_availability_sends_one_indexed_month() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers/p1/day-availability"))
            .and(query_param("year", "2024"))
            .and(query_param("month", "5"))
            .and(query_param("day", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"hour": 9, "available": true},
                {"hour": 14, "available": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let slots = client_for(&server)
            .day_availability("p1", date)
            .await
            .unwrap();
        assert_eq!(
            slots,
            vec![
                AvailabilitySlot { hour: 9, available: true },
                AvailabilitySlot { hour: 14, available: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_hour_outside_day_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers/p1/day-availability"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"hour": 9, "available": true},
                {"hour": 30, "available": true}
            ])))
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let result = client_for(&server).day_availability("p1", date).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/providers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let error = client_for(&server).list_providers().await.unwrap_err();
        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }
}
