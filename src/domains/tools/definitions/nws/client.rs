//! HTTP client for the National Weather Service API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::NwsError;
use super::models::{ForecastResponse, PointsResponse};
use crate::core::config::WeatherApiConfig;

/// Media type requested on every NWS call.
pub const GEO_JSON: &str = "application/geo+json";

/// Source of grid point and forecast documents.
///
/// `NwsClient` is the production implementation; tests substitute canned
/// responses.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Resolve a coordinate pair to its grid point document.
    async fn grid_point(&self, latitude: f64, longitude: f64) -> Result<PointsResponse, NwsError>;

    /// Fetch the forecast document behind a grid point's forecast URL.
    async fn forecast(&self, url: &str) -> Result<ForecastResponse, NwsError>;
}

/// reqwest-backed NWS client.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections
/// internally and is used behind an `Arc` by the server.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    /// Build a client from the weather API configuration.
    ///
    /// The user agent, `Accept` header and request deadline are fixed for
    /// the lifetime of the client.
    pub fn new(config: &WeatherApiConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The upstream base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Grid point lookup URL, coordinates rounded to 4 decimal places.
    pub fn points_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/points/{:.4},{:.4}",
            self.base_url,
            round4(latitude),
            round4(longitude)
        )
    }

    /// GET a URL and decode its JSON body.
    async fn make_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, NwsError> {
        debug!("NWS request: GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NwsError::from_send(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("NWS request to {} returned status {}", url, status);
            return Err(NwsError::status(url, status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| NwsError::from_decode(url, e))
    }
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn grid_point(&self, latitude: f64, longitude: f64) -> Result<PointsResponse, NwsError> {
        let url = self.points_url(latitude, longitude);
        self.make_request(&url).await
    }

    async fn forecast(&self, url: &str) -> Result<ForecastResponse, NwsError> {
        self.make_request(url).await
    }
}

/// Round to four decimals, ties away from zero.
///
/// `{:.4}` alone rounds exact binary ties to even, which would move
/// e.g. 38.03125 to a different grid point than 38.0313.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
