//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own module; upstream API clients live next to
//! the tools that use them.

pub mod forecast;
pub mod nws;

pub use forecast::{FailureKind, ForecastError, GetForecastParams, GetForecastTool};
pub use nws::{ForecastSource, NwsClient};
