//! FRED API integration.
//!
//! One blocking request per fetch. No retries, no backoff: a failure is
//! reported once as `AppError::Provider` and the interaction ends there.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::RawObservation;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Source of raw observations for a series over a closed date interval.
///
/// An empty answer is reported as `AppError::NoData`, failures as
/// `AppError::Provider`.
pub trait SeriesProvider {
    fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, AppError>;
}

/// Credentials and endpoint, read once at startup.
#[derive(Clone)]
pub struct FredConfig {
    api_key: String,
    pub base_url: String,
}

impl FredConfig {
    /// Read `FRED_API_KEY` (required) and `FRED_BASE_URL` (optional), after
    /// loading `.env` if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var("FRED_API_KEY").ok(),
            std::env::var("FRED_BASE_URL").ok(),
        )
    }

    pub fn from_vars(api_key: Option<String>, base_url: Option<String>) -> Result<Self, AppError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                tracing::error!("FRED API key not found in environment variables");
                AppError::config("FRED API key not found. Set FRED_API_KEY in the environment or .env file.")
            })?;
        let base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self { api_key, base_url })
    }
}

impl std::fmt::Debug for FredConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub struct FredClient {
    client: Client,
    config: FredConfig,
}

impl FredClient {
    pub fn new(config: FredConfig) -> Self {
        tracing::info!(base_url = %config.base_url, "Initializing FRED API client");
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(FredConfig::from_env()?))
    }
}

impl SeriesProvider for FredClient {
    fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, AppError> {
        tracing::info!(series_id, %start, %end, "Fetching series from FRED");

        let start_param = start.to_string();
        let end_param = end.to_string();
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.config.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start_param.as_str()),
                ("observation_end", end_param.as_str()),
            ])
            .send()
            .map_err(|e| AppError::provider(format!("FRED request failed: {}", e.without_url())))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| AppError::provider(format!("Failed to read FRED response: {}", e.without_url())))?;

        if !status.is_success() {
            let detail = parse_error_message(&body)
                .map(|msg| format!(": {msg}"))
                .unwrap_or_default();
            return Err(AppError::provider(format!(
                "FRED request for {series_id} failed with status {status}{detail}"
            )));
        }

        let observations = parse_observations(&body)?;
        tracing::debug!(series_id, count = observations.len(), "Parsed FRED observations");

        if observations.is_empty() {
            return Err(AppError::no_data(series_id));
        }
        Ok(observations)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}

/// Decode a `series/observations` JSON body.
///
/// Missing-value markers (`"."`) become `value: None`; dates must be
/// `YYYY-MM-DD`.
pub fn parse_observations(body: &str) -> Result<Vec<RawObservation>, AppError> {
    let parsed: ObservationsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::provider(format!("Failed to parse FRED response: {e}")))?;

    parsed
        .observations
        .into_iter()
        .map(|obs| {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
                AppError::provider(format!("Invalid FRED date '{}': {e}", obs.date))
            })?;
            Ok(RawObservation::new(date, parse_value(&obs.value)))
        })
        .collect()
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error_message)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_observations_and_missing_markers() {
        let body = r#"{
            "realtime_start": "2024-10-01",
            "count": 3,
            "observations": [
                {"realtime_start": "2024-10-01", "date": "2024-01-01", "value": "3.7"},
                {"realtime_start": "2024-10-01", "date": "2024-02-01", "value": "."},
                {"realtime_start": "2024-10-01", "date": "2024-03-01", "value": "3.9"}
            ]
        }"#;

        let obs = parse_observations(body).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(obs[0].value, Some(3.7));
        assert_eq!(obs[1].value, None);
        assert_eq!(obs[2].value, Some(3.9));
    }

    #[test]
    fn malformed_bodies_are_provider_errors() {
        assert!(matches!(parse_observations("not json"), Err(AppError::Provider(_))));

        let bad_date = r#"{"observations": [{"date": "01/01/2024", "value": "1.0"}]}"#;
        let err = parse_observations(bad_date).unwrap_err();
        assert!(err.to_string().contains("Invalid FRED date"));
    }

    #[test]
    fn error_bodies_surface_the_provider_message() {
        let body = r#"{"error_code": 400, "error_message": "Bad Request.  The series does not exist."}"#;
        assert_eq!(
            parse_error_message(body).as_deref(),
            Some("Bad Request.  The series does not exist.")
        );
        assert_eq!(parse_error_message("<html>"), None);
    }

    #[test]
    fn value_parser_rejects_non_finite() {
        assert_eq!(parse_value(" 27967.697 "), Some(27967.697));
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        assert!(matches!(FredConfig::from_vars(None, None), Err(AppError::Config(_))));
        assert!(matches!(
            FredConfig::from_vars(Some("   ".to_string()), None),
            Err(AppError::Config(_))
        ));

        let config = FredConfig::from_vars(Some("abc123".to_string()), None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!format!("{config:?}").contains("abc123"));

        let config = FredConfig::from_vars(
            Some("abc123".to_string()),
            Some("http://localhost:9000/obs".to_string()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/obs");
    }
}
