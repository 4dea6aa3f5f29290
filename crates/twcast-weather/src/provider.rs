//! Forecast feed client.

use crate::types::{ForecastData, ForecastResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;
use twcast_core::ReqwestErrorExt;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Forecast errors. All of them end up as the same alert for the user.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast API returned status {0}")]
    Status(u16),
    #[error("Forecast API reported failure")]
    Unsuccessful,
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ForecastError {
    pub fn user_message(&self) -> &'static str {
        twcast_core::FORECAST_FAILURE_MESSAGE
    }
}

impl From<ForecastError> for twcast_core::WeatherError {
    fn from(err: ForecastError) -> Self {
        let detail = match err {
            ForecastError::Network(e) => e.into_network_error().to_string(),
            other => other.to_string(),
        };
        twcast_core::WeatherError::ForecastFetchFailure(detail)
    }
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(base_url: &str) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a city slug. Not retried.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, slug: &str) -> Result<ForecastData, ForecastError> {
        let url = format!("{}/api/weather/{}", self.base_url, slug);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast API returned status {}", status);
            return Err(ForecastError::Status(status.as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::Parse(e.to_string()))?;

        if !body.success {
            return Err(ForecastError::Unsuccessful);
        }

        let data = body
            .data
            .ok_or_else(|| ForecastError::Parse("response has no data".to_string()))?;

        tracing::debug!("Fetched {} forecast slots for {}", data.forecasts.len(), slug);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slot(start: &str, weather: &str, min: &str, max: &str, rain: &str) -> serde_json::Value {
        serde_json::json!({
            "startTime": start,
            "weather": weather,
            "minTemp": min,
            "maxTemp": max,
            "rain": rain
        })
    }

    #[tokio::test]
    async fn test_fetch_forecast_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather/taipei"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "forecasts": [
                        slot("2025-12-20 06:00:00", "多雲", "17", "22", "20%"),
                        slot("2025-12-20 18:00:00", "短暫雨", "15", "19", "60%"),
                    ]
                }
            })))
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(&mock_server.uri()).unwrap();
        let data = client.fetch_forecast("taipei").await.unwrap();

        assert_eq!(data.forecasts.len(), 2);
        assert_eq!(data.forecasts[0].weather, "多雲");
        assert_eq!(data.forecasts[1].rain.value(), Some(60));
    }

    #[tokio::test]
    async fn test_unsuccessful_flag_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather/taipei"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false
            })))
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(&mock_server.uri()).unwrap();
        let result = client.fetch_forecast("taipei").await;

        assert!(matches!(result, Err(ForecastError::Unsuccessful)));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(&mock_server.uri()).unwrap();
        let result = client.fetch_forecast("atlantis").await;

        assert!(matches!(result, Err(ForecastError::Status(404))));
    }

    #[tokio::test]
    async fn test_missing_data_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(&mock_server.uri()).unwrap();
        let result = client.fetch_forecast("taipei").await;

        assert!(matches!(result, Err(ForecastError::Parse(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = ForecastClient::new("http://127.0.0.1:9").unwrap();
        let err = client.fetch_forecast("taipei").await.unwrap_err();

        assert!(matches!(err, ForecastError::Network(_)));
        assert_eq!(err.user_message(), twcast_core::FORECAST_FAILURE_MESSAGE);

        let app_err: twcast_core::WeatherError = err.into();
        assert!(matches!(
            app_err,
            twcast_core::WeatherError::ForecastFetchFailure(_)
        ));
    }
}
