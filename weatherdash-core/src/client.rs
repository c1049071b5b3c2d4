use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

use crate::error::BackendError;
use crate::model::{CleanedRecord, EtlStatus, HealthReport, RunAck};

/// Anything that can answer an average-temperature query.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    async fn average_temperature(&self, city: &str, date: &str) -> Result<f64, BackendError>;
}

/// HTTP client for the weather dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct TemperatureReply {
    avg_temperature: f64,
}

/// Error payload the backend attaches to failed requests.
#[derive(Debug, Deserialize)]
struct ReportedError {
    error: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// Issue a GET and decode the JSON reply.
    ///
    /// The backend signals failures through an `error` field in the body, not
    /// through the status code alone, so that field is checked first and its
    /// message passed on verbatim.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| BackendError::Transport { url, source })?;

        debug!(endpoint, %status, body = %truncate_body(&body), "dashboard reply");

        if let Ok(reported) = serde_json::from_str::<ReportedError>(&body) {
            return Err(BackendError::Reported(reported.error));
        }

        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| BackendError::Decode { endpoint, source })
    }

    pub async fn health(&self) -> Result<HealthReport, BackendError> {
        self.get_json("/etl/health", &[]).await
    }

    /// Kick off an ETL run. The backend acknowledges immediately and
    /// processes in the background.
    pub async fn trigger_etl(&self) -> Result<RunAck, BackendError> {
        self.get_json("/etl/run", &[]).await
    }

    /// Most recent ETL log lines, oldest first.
    pub async fn etl_status(&self) -> Result<EtlStatus, BackendError> {
        self.get_json("/etl/status", &[]).await
    }

    /// Sample of the cleaned table for display, at most 20 rows.
    pub async fn cleaned_sample(&self) -> Result<Vec<CleanedRecord>, BackendError> {
        self.get_json("/etl/cleaned_data", &[]).await
    }
}

#[async_trait]
impl TemperatureSource for DashboardClient {
    async fn average_temperature(&self, city: &str, date: &str) -> Result<f64, BackendError> {
        let reply = self
            .get_json::<TemperatureReply>("/bulk/temperature", &[("city", city), ("date", date)])
            .await?;

        Ok(reply.avg_temperature)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn average_temperature_parses_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .and(query_param("city", "Berlin"))
            .and(query_param("date", "2024-05-01"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "avg_temperature": 21.5 })),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let value = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .expect("lookup should succeed");

        assert_eq!(value, 21.5);
    }

    #[tokio::test]
    async fn query_parameters_are_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .and(query_param("city", "São Paulo"))
            .and(query_param("date", "2024-07-09"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "avg_temperature": 28.0 })),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        client
            .average_temperature("São Paulo", "2024-07-09")
            .await
            .expect("encoded lookup should succeed");

        let requests = server.received_requests().await.expect("requests recorded");
        let raw_query = requests[0].url.query().expect("query must be present");
        assert!(raw_query.contains("S%C3%A3o"), "raw query was: {raw_query}");
    }

    #[tokio::test]
    async fn error_field_is_reported_even_on_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "error": "No data found for city and date" })),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let err = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Reported(_)));
        assert_eq!(err.to_string(), "No data found for city and date");
    }

    #[tokio::test]
    async fn error_field_wins_over_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/etl/status"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "log file missing" })),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let err = client.etl_status().await.unwrap_err();

        assert_eq!(err.to_string(), "log file missing");
    }

    #[tokio::test]
    async fn failure_status_without_error_field_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let err = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Status { .. }));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let err = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn missing_temperature_field_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk/temperature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "temperature": 3.0 })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let err = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Port 1 is practically never bound, so this refuses fast.
        let client = DashboardClient::new("http://127.0.0.1:1");
        let err = client
            .average_temperature("Berlin", "2024-05-01")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Transport { .. }));
        assert!(err.to_string().contains("/bulk/temperature"));
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/etl/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "message": "ETL service is healthy."
            })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(format!("{}/", server.uri()));
        let report = client.health().await.expect("health should succeed");

        assert_eq!(report.status, "ok");
        assert_eq!(report.message, "ETL service is healthy.");
    }

    #[tokio::test]
    async fn trigger_etl_returns_backend_ack() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/etl/run"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ETL started!"
            })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let ack = client.trigger_etl().await.expect("trigger should succeed");

        assert_eq!(ack.message, "ETL started!");
    }

    #[tokio::test]
    async fn etl_status_keeps_line_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/etl/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": ["=== ETL RUN START ===\n", "CHUNK PROCESSED: offset=0\n"]
            })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let status = client.etl_status().await.expect("status should succeed");

        assert_eq!(status.status.len(), 2);
        assert!(status.status[0].starts_with("=== ETL RUN START"));
    }

    #[tokio::test]
    async fn cleaned_sample_decodes_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/etl/cleaned_data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "city": "Berlin", "date": "2024-05-01", "avg_temperature": 21.5, "weather": "Clear" },
                { "city": "Oslo", "date": "2024-05-01", "avg_temperature": 11.0, "weather": "Rain" }
            ])))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri());
        let rows = client.cleaned_sample().await.expect("sample should succeed");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].city, "Berlin");
        assert_eq!(rows[1].avg_temperature, 11.0);
    }

    #[test]
    fn truncate_body_limits_long_payloads() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 203);
    }

    #[test]
    fn truncate_body_respects_multibyte_boundaries() {
        let long = "å".repeat(300);
        let truncated = truncate_body(&long);

        assert_eq!(truncated.chars().count(), 203);
    }
}
