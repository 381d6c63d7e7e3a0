//! Typed views of the NWS grid point and forecast documents.
//!
//! Only the fields the forecast tool reads are modelled. Everything is
//! optional: a missing field is a shape problem for the caller to report,
//! not a decode failure.

use serde::{Deserialize, Deserializer};

/// Response of `GET /points/{lat},{lon}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub properties: Option<PointProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointProperties {
    /// URL of the textual forecast for this grid point.
    #[serde(default, deserialize_with = "lenient_string")]
    pub forecast: Option<String>,
}

impl PointsResponse {
    /// The forecast URL, if present and non-empty.
    pub fn forecast_url(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.forecast.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Response of `GET {forecast_url}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Option<Vec<ForecastPeriod>>,
}

impl ForecastResponse {
    /// The ordered forecast periods, empty when the field is missing.
    pub fn periods(&self) -> &[ForecastPeriod] {
        self.properties
            .as_ref()
            .and_then(|p| p.periods.as_deref())
            .unwrap_or_default()
    }
}

/// One time-bounded forecast entry ("Tonight", "Monday", ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Kept as a raw JSON value so integers stay integers ("72", not "72.0").
    #[serde(default)]
    pub temperature: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub temperature_unit: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub wind_speed: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub wind_direction: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub short_forecast: Option<String>,
}

/// Accept any JSON value, keeping it only if it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}
