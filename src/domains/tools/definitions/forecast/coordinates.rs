//! Coordinate validation.

use thiserror::Error;

const LATITUDE_LIMIT: f64 = 90.0;
const LONGITUDE_LIMIT: f64 = 180.0;

/// Reasons a coordinate pair is rejected before any upstream call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude '{0}' is not a number.")]
    LatitudeNotANumber(String),

    #[error("Longitude '{0}' is not a number.")]
    LongitudeNotANumber(String),

    #[error("Latitude must be between -90 and 90.")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180.")]
    LongitudeOutOfRange,
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse and range-check a latitude/longitude pair.
    ///
    /// Surrounding whitespace is ignored. NaN and infinities are rejected as
    /// not-a-number.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        let lat = parse_degrees(latitude)
            .ok_or_else(|| CoordinateError::LatitudeNotANumber(latitude.to_string()))?;
        let lon = parse_degrees(longitude)
            .ok_or_else(|| CoordinateError::LongitudeNotANumber(longitude.to_string()))?;

        if !(-LATITUDE_LIMIT..=LATITUDE_LIMIT).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !(-LONGITUDE_LIMIT..=LONGITUDE_LIMIT).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }

        Ok(Self {
            latitude: lat,
            longitude: lon,
        })
    }
}

fn parse_degrees(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
