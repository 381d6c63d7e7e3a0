//! Weather forecast tool definition.
//!
//! Resolves a latitude/longitude to an NWS grid point, follows the grid
//! point's forecast URL and renders the forecast periods as plain text.
//!
//! Every outcome, including failures, is returned as a single text content
//! item in a successful `CallToolResult`. The structured failure is available
//! internally through [`GetForecastTool::forecast`].

mod coordinates;
mod error;
mod format;

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

pub use coordinates::{CoordinateError, Coordinates};
pub use error::{FailureKind, ForecastError};
pub use format::{format_forecast, format_period};

use super::nws::ForecastSource;
#[cfg(any(feature = "http", feature = "sse"))]
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the forecast tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetForecastParams {
    /// Latitude of the location, in decimal degrees.
    #[schemars(description = "Latitude of the location")]
    pub latitude: String,

    /// Longitude of the location, in decimal degrees.
    #[schemars(description = "Longitude of the location")]
    pub longitude: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Forecast tool - real time NWS forecast for a US location.
pub struct GetForecastTool;

impl GetForecastTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getforecast";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get real time weather forecast for a location";

    /// Produce the forecast text, or the reason it could not be produced.
    ///
    /// At most two upstream calls are made, strictly in sequence: the grid
    /// point lookup, then the forecast URL it names.
    pub async fn forecast(
        source: &dyn ForecastSource,
        params: &GetForecastParams,
    ) -> Result<String, ForecastError> {
        let coords = Coordinates::parse(&params.latitude, &params.longitude).map_err(|reason| {
            ForecastError::InvalidCoordinates {
                latitude: params.latitude.clone(),
                longitude: params.longitude.clone(),
                reason,
            }
        })?;

        let points = source
            .grid_point(coords.latitude, coords.longitude)
            .await
            .map_err(|source| ForecastError::GridPointUnavailable {
                latitude: params.latitude.clone(),
                longitude: params.longitude.clone(),
                source,
            })?;

        let forecast_url = points
            .forecast_url()
            .ok_or(ForecastError::MissingForecastUrl)?;

        let forecast = source
            .forecast(forecast_url)
            .await
            .map_err(ForecastError::ForecastUnavailable)?;

        let periods = forecast.periods();
        if periods.is_empty() {
            return Err(ForecastError::NoPeriods);
        }

        info!("Formatting {} forecast period(s)", periods.len());
        Ok(format_forecast(&params.latitude, &params.longitude, periods))
    }

    /// Execute the tool logic (for STDIO transport via rmcp).
    ///
    /// Never fails: errors are rendered into the text content.
    #[instrument(skip_all, fields(latitude = %params.latitude, longitude = %params.longitude))]
    pub async fn execute(source: &dyn ForecastSource, params: &GetForecastParams) -> CallToolResult {
        info!("Forecast tool called");

        let text = match Self::forecast(source, params).await {
            Ok(text) => text,
            Err(e) => {
                match std::error::Error::source(&e) {
                    Some(cause) => warn!(kind = ?e.kind(), "{} ({})", e, cause),
                    None => warn!(kind = ?e.kind(), "{}", e),
                }
                e.to_string()
            }
        };

        CallToolResult::success(vec![Content::text(text)])
    }

    /// HTTP handler for this tool (for HTTP and SSE transports).
    #[cfg(any(feature = "http", feature = "sse"))]
    pub async fn http_handler(
        arguments: serde_json::Value,
        source: Arc<dyn ForecastSource>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetForecastParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(source.as_ref(), &params).await;

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetForecastParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    pub fn create_route<S>(source: Arc<dyn ForecastSource>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let source = source.clone();
            async move {
                let params: GetForecastParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                Ok(Self::execute(source.as_ref(), &params).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::nws::{
        ForecastResponse, NwsError, PointsResponse,
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use rmcp::model::RawContent;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Canned upstream: `None` means the call fails with a 404.
    struct CannedSource {
        points: Option<Value>,
        forecast: Option<Value>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn new(points: Option<Value>, forecast: Option<Value>) -> Self {
            Self {
                points,
                forecast,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ForecastSource for CannedSource {
        async fn grid_point(&self, latitude: f64, longitude: f64) -> Result<PointsResponse, NwsError> {
            let url = format!("points/{:.4},{:.4}", latitude, longitude);
            self.calls.lock().unwrap().push(url.clone());
            match &self.points {
                Some(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                None => Err(NwsError::status(url, StatusCode::NOT_FOUND)),
            }
        }

        async fn forecast(&self, url: &str) -> Result<ForecastResponse, NwsError> {
            self.calls.lock().unwrap().push(url.to_string());
            match &self.forecast {
                Some(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                None => Err(NwsError::status(url, StatusCode::INTERNAL_SERVER_ERROR)),
            }
        }
    }

    fn params(latitude: &str, longitude: &str) -> GetForecastParams {
        GetForecastParams {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }

    fn dc() -> GetForecastParams {
        params("38.8977", "-77.0365")
    }

    fn points_ok() -> Option<Value> {
        Some(json!({ "properties": { "forecast": "https://x/forecast" } }))
    }

    fn forecast_with(periods: Value) -> Option<Value> {
        Some(json!({ "properties": { "periods": periods } }))
    }

    fn tonight() -> Value {
        json!({
            "name": "Tonight",
            "temperature": 72,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "windDirection": "NW",
            "shortForecast": "Clear"
        })
    }

    fn single_text(result: &CallToolResult) -> String {
        assert_eq!(result.content.len(), 1, "exactly one content item");
        assert_ne!(result.is_error, Some(true));
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_washington_dc_scenario() {
        let source = CannedSource::new(points_ok(), forecast_with(json!([tonight()])));
        let result = GetForecastTool::execute(&source, &dc()).await;
        let text = single_text(&result);

        assert!(text.starts_with("Forecast for 38.8977, -77.0365:"));
        assert!(text.contains("Tonight:\nTemperature: 72°F\nWind: 5 mph NW\nClear\n---"));
        assert_eq!(
            source.calls(),
            vec!["points/38.8977,-77.0365".to_string(), "https://x/forecast".to_string()]
        );
    }

    #[tokio::test]
    async fn test_grid_point_failure() {
        let source = CannedSource::new(None, forecast_with(json!([tonight()])));
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);

        assert!(text.contains("Failed to retrieve grid point data for coordinates: 38.8977, -77.0365"));
        assert_eq!(source.calls().len(), 1, "forecast must not be requested");
    }

    #[tokio::test]
    async fn test_missing_forecast_url() {
        let source = CannedSource::new(Some(json!({ "properties": {} })), None);
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);
        assert_eq!(text, "Failed to get forecast URL from grid point data");
    }

    #[tokio::test]
    async fn test_forecast_failure() {
        let source = CannedSource::new(points_ok(), None);
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);
        assert_eq!(text, "Failed to retrieve forecast data");
    }

    #[tokio::test]
    async fn test_empty_periods() {
        let source = CannedSource::new(points_ok(), forecast_with(json!([])));
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);
        assert_eq!(text, "No forecast periods available");

        let source = CannedSource::new(points_ok(), Some(json!({ "properties": {} })));
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);
        assert_eq!(text, "No forecast periods available");
    }

    #[tokio::test]
    async fn test_n_periods_give_n_blocks() {
        let periods = json!([tonight(), { "name": "Monday" }, {}]);
        let source = CannedSource::new(points_ok(), forecast_with(periods));
        let text = single_text(&GetForecastTool::execute(&source, &dc()).await);

        assert_eq!(text.lines().filter(|l| *l == "---").count(), 3);
        assert!(text.contains("Monday:\nTemperature: Unknown°F\nWind: Unknown \nUnknown\n---"));
        assert!(text.contains("Unknown:\nTemperature: Unknown°F"));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_skip_upstream() {
        let source = CannedSource::new(points_ok(), forecast_with(json!([tonight()])));

        let err = GetForecastTool::forecast(&source, &params("north", "-77"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        let text = single_text(&GetForecastTool::execute(&source, &params("91", "0")).await);
        assert_eq!(text, "Invalid coordinates: 91, 0. Latitude must be between -90 and 90.");

        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_kinds() {
        let source = CannedSource::new(None, None);
        let err = GetForecastTool::forecast(&source, &dc()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UpstreamUnreachable);

        let source = CannedSource::new(Some(json!({})), None);
        let err = GetForecastTool::forecast(&source, &dc()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedShape);

        let source = CannedSource::new(points_ok(), forecast_with(json!([])));
        let err = GetForecastTool::forecast(&source, &dc()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoData);
    }

    #[tokio::test]
    async fn test_repeated_calls_identical() {
        let source = CannedSource::new(points_ok(), forecast_with(json!([tonight(), {}])));
        let first = single_text(&GetForecastTool::execute(&source, &dc()).await);
        let second = single_text(&GetForecastTool::execute(&source, &dc()).await);
        assert_eq!(first, second);
    }

    #[test]
    fn test_params_deserialize() {
        let params: GetForecastParams =
            serde_json::from_str(r#"{"latitude": "38.8977", "longitude": "-77.0365"}"#).unwrap();
        assert_eq!(params.latitude, "38.8977");
        assert_eq!(params.longitude, "-77.0365");

        assert!(serde_json::from_str::<GetForecastParams>(r#"{"latitude": "1"}"#).is_err());
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = GetForecastTool::to_tool();
        assert_eq!(tool.name, "getforecast");
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("latitude").is_some());
        assert!(properties.get("longitude").is_some());
    }

    #[cfg(any(feature = "http", feature = "sse"))]
    #[tokio::test]
    async fn test_http_handler_shape() {
        let source: Arc<dyn ForecastSource> =
            Arc::new(CannedSource::new(points_ok(), forecast_with(json!([tonight()]))));
        let response = GetForecastTool::http_handler(
            json!({ "latitude": "38.8977", "longitude": "-77.0365" }),
            source,
        )
        .await
        .unwrap();

        assert_eq!(response["isError"], json!(false));
        let content = response["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], json!("text"));
        assert!(content[0]["text"].as_str().unwrap().starts_with("Forecast for 38.8977"));
    }

    #[cfg(any(feature = "http", feature = "sse"))]
    #[tokio::test]
    async fn test_http_handler_rejects_bad_arguments() {
        let source: Arc<dyn ForecastSource> = Arc::new(CannedSource::new(None, None));
        let result = GetForecastTool::http_handler(json!({ "latitude": 38.9 }), source).await;
        match result {
            Err(ToolError::InvalidArguments(msg)) => {
                assert!(!msg.starts_with("Invalid arguments"));
            }
            other => panic!("expected invalid arguments, got {:?}", other),
        }
    }
}
