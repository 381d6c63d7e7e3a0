//! National Weather Service API module.
//!
//! This module provides the upstream side of the forecast tool:
//! - `client`: HTTP client for `api.weather.gov` with the required header policy
//! - `models`: typed views of the grid point and forecast documents
//! - `error`: request failure types
//!
//! The `ForecastSource` trait is the seam between the tool and the network,
//! so the tool logic can be exercised without a live upstream.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ForecastSource, NwsClient};
pub use error::NwsError;
pub use models::{ForecastPeriod, ForecastResponse, PointsResponse};
