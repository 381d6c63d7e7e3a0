//! Forecast tool outcome types.
//!
//! `ForecastError` is the structured failure side of the tool. Its `Display`
//! is the exact text returned to MCP clients, so the wording here is part of
//! the tool's external contract.

use thiserror::Error;

use super::coordinates::CoordinateError;
use crate::domains::tools::definitions::nws::NwsError;

/// Broad failure category, for callers that need to branch programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The coordinates were rejected before any upstream call.
    InvalidInput,
    /// A network failure, timeout or non-success status on either call.
    UpstreamUnreachable,
    /// The upstream answered, but without the expected field.
    MalformedShape,
    /// The upstream answered with an empty period list.
    NoData,
}

/// Why a forecast could not be produced.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid coordinates: {latitude}, {longitude}. {reason}")]
    InvalidCoordinates {
        latitude: String,
        longitude: String,
        #[source]
        reason: CoordinateError,
    },

    #[error(
        "Failed to retrieve grid point data for coordinates: {latitude}, {longitude}. \
         This location may not be supported (only US-region locations are supported)."
    )]
    GridPointUnavailable {
        latitude: String,
        longitude: String,
        #[source]
        source: NwsError,
    },

    #[error("Failed to get forecast URL from grid point data")]
    MissingForecastUrl,

    #[error("Failed to retrieve forecast data")]
    ForecastUnavailable(#[source] NwsError),

    #[error("No forecast periods available")]
    NoPeriods,
}

impl ForecastError {
    /// The failure category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidCoordinates { .. } => FailureKind::InvalidInput,
            Self::GridPointUnavailable { .. } | Self::ForecastUnavailable(_) => {
                FailureKind::UpstreamUnreachable
            }
            Self::MissingForecastUrl => FailureKind::MalformedShape,
            Self::NoPeriods => FailureKind::NoData,
        }
    }
}
