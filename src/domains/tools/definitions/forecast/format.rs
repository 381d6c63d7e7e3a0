//! Plain-text rendering of forecast periods.

use crate::domains::tools::definitions::nws::ForecastPeriod;

const UNKNOWN: &str = "Unknown";
const DEFAULT_UNIT: &str = "F";
const SEPARATOR: &str = "---";

/// Render one period as a four-line block followed by the separator line.
pub fn format_period(period: &ForecastPeriod) -> String {
    let name = text_or(&period.name, UNKNOWN);
    let temperature = period
        .temperature
        .as_ref()
        .and_then(temperature_text)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let unit = text_or(&period.temperature_unit, DEFAULT_UNIT);
    let wind_speed = text_or(&period.wind_speed, UNKNOWN);
    let wind_direction = text_or(&period.wind_direction, "");
    let short_forecast = text_or(&period.short_forecast, UNKNOWN);

    [
        format!("{}:", name),
        format!("Temperature: {}°{}", temperature, unit),
        format!("Wind: {} {}", wind_speed, wind_direction),
        short_forecast.to_string(),
        SEPARATOR.to_string(),
    ]
    .join("\n")
}

/// Render the full forecast text, headed by the coordinates as supplied.
pub fn format_forecast(latitude: &str, longitude: &str, periods: &[ForecastPeriod]) -> String {
    let blocks: Vec<String> = periods.iter().map(format_period).collect();
    format!(
        "Forecast for {}, {}:\n\n{}",
        latitude,
        longitude,
        blocks.join("\n")
    )
}

fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(fallback)
}

/// A reported temperature of `0` is a real reading and renders as `0`, not
/// as `Unknown`. Only a missing, null or empty value falls back.
fn temperature_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
