//! End-to-end tests of the forecast tool against a mock NWS API.

use httpmock::prelude::*;
use serde_json::json;

use weather_mcp_server::core::WeatherApiConfig;
use weather_mcp_server::domains::tools::definitions::{
    GetForecastParams, GetForecastTool, NwsClient,
};

fn client_for(server: &MockServer) -> NwsClient {
    NwsClient::new(&WeatherApiConfig {
        base_url: server.base_url(),
        ..WeatherApiConfig::default()
    })
    .expect("client")
}

fn dc() -> GetForecastParams {
    GetForecastParams {
        latitude: "38.8977".to_string(),
        longitude: "-77.0365".to_string(),
    }
}

fn text_of(result: &rmcp::model::CallToolResult) -> String {
    assert_eq!(result.content.len(), 1);
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .expect("text content")
}

#[tokio::test]
async fn forecast_follows_grid_point_to_forecast_url() {
    let server = MockServer::start_async().await;
    let forecast_url = server.url("/gridpoints/LWX/97,71/forecast");

    let points = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/points/38.8977,-77.0365")
                .header("accept", "application/geo+json");
            then.status(200)
                .header("content-type", "application/geo+json")
                .json_body(json!({ "properties": { "forecast": forecast_url } }));
        })
        .await;

    let forecast = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/gridpoints/LWX/97,71/forecast")
                .header("user-agent", "weather-app/1.0");
            then.status(200)
                .header("content-type", "application/geo+json")
                .json_body(json!({
                    "properties": {
                        "periods": [
                            {
                                "number": 1,
                                "name": "Tonight",
                                "temperature": 72,
                                "temperatureUnit": "F",
                                "windSpeed": "5 mph",
                                "windDirection": "NW",
                                "shortForecast": "Clear"
                            },
                            {
                                "number": 2,
                                "name": "Monday",
                                "temperature": 85,
                                "temperatureUnit": "F",
                                "windSpeed": "5 to 10 mph",
                                "windDirection": "S",
                                "shortForecast": "Sunny"
                            }
                        ]
                    }
                }));
        })
        .await;

    let client = client_for(&server);
    let text = text_of(&GetForecastTool::execute(&client, &dc()).await);

    points.assert_async().await;
    forecast.assert_async().await;

    assert!(text.starts_with("Forecast for 38.8977, -77.0365:"));
    assert!(text.contains("Tonight:\nTemperature: 72°F\nWind: 5 mph NW\nClear\n---"));
    assert!(text.contains("Monday:\nTemperature: 85°F\nWind: 5 to 10 mph S\nSunny\n---"));
    assert_eq!(text.lines().filter(|l| *l == "---").count(), 2);

    let again = text_of(&GetForecastTool::execute(&client, &dc()).await);
    assert_eq!(text, again);
}

#[tokio::test]
async fn unsupported_location_reports_grid_point_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/points/51.5074,-0.1278");
            then.status(404).json_body(json!({
                "title": "Data Unavailable For Requested Point",
                "status": 404
            }));
        })
        .await;

    let params = GetForecastParams {
        latitude: "51.5074".to_string(),
        longitude: "-0.1278".to_string(),
    };
    let text = text_of(&GetForecastTool::execute(&client_for(&server), &params).await);
    assert!(text.contains("Failed to retrieve grid point data for coordinates: 51.5074, -0.1278"));
}

#[tokio::test]
async fn slow_grid_point_lookup_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/points/38.8977,-77.0365");
            then.status(200)
                .delay(std::time::Duration::from_secs(3))
                .json_body(json!({ "properties": { "forecast": "unused" } }));
        })
        .await;

    let client = NwsClient::new(&WeatherApiConfig {
        base_url: server.base_url(),
        timeout_secs: 1,
        ..WeatherApiConfig::default()
    })
    .expect("client");

    let text = text_of(&GetForecastTool::execute(&client, &dc()).await);
    assert!(text.starts_with("Failed to retrieve grid point data for coordinates: 38.8977, -77.0365."));
}

#[tokio::test]
async fn forecast_endpoint_failure() {
    let server = MockServer::start_async().await;
    let forecast_url = server.url("/forecast");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/points/38.8977,-77.0365");
            then.status(200)
                .json_body(json!({ "properties": { "forecast": forecast_url } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/forecast");
            then.status(503);
        })
        .await;

    let text = text_of(&GetForecastTool::execute(&client_for(&server), &dc()).await);
    assert_eq!(text, "Failed to retrieve forecast data");
}

#[tokio::test]
async fn invalid_coordinates_never_reach_upstream() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({}));
        })
        .await;

    let params = GetForecastParams {
        latitude: "38.8977".to_string(),
        longitude: "west".to_string(),
    };
    let text = text_of(&GetForecastTool::execute(&client_for(&server), &params).await);

    assert_eq!(text, "Invalid coordinates: 38.8977, west. Longitude 'west' is not a number.");
    any.assert_hits_async(0).await;
}

#[cfg(feature = "sse")]
#[tokio::test]
async fn tools_call_over_json_rpc() {
    use weather_mcp_server::core::transport::rpc::{JsonRpcRequest, process_request};
    use weather_mcp_server::core::{Config, McpServer};

    let server = MockServer::start_async().await;
    let forecast_url = server.url("/forecast");
    server
        .mock_async(|when, then| {
            when.method(GET).path("/points/38.8977,-77.0365");
            then.status(200)
                .json_body(json!({ "properties": { "forecast": forecast_url } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/forecast");
            then.status(200)
                .json_body(json!({ "properties": { "periods": [] } }));
        })
        .await;

    let mut config = Config::default();
    config.weather.base_url = server.base_url();
    let mcp = McpServer::new(config).expect("server");

    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!("call-1")),
        method: "tools/call".to_string(),
        params: Some(json!({
            "name": "getforecast",
            "arguments": { "latitude": "38.8977", "longitude": "-77.0365" }
        })),
    };
    let response = process_request(&mcp, request).await.expect("response");
    let result = response.result.expect("result");

    assert_eq!(response.id, Some(json!("call-1")));
    assert_eq!(result["isError"], json!(false));
    let content = result["content"].as_array().expect("content array");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
    assert_eq!(content[0]["text"], "No forecast periods available");
}
