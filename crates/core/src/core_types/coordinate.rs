//! Geographic coordinate picked on the host map.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoordinateError;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Created fresh for every host interaction and never mutated. The fields
/// are private so every instance has passed [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Latitude beyond which a location counts as extratropical for simulation.
    pub const TROPICAL_LATITUDE_LIMIT: f64 = 30.0;

    /// Validate and build a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either component is non-finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether the point lies within the tropical band (|lat| < 30°).
    #[inline]
    pub fn is_tropical(&self) -> bool {
        self.latitude.abs() < Self::TROPICAL_LATITUDE_LIMIT
    }
}

impl fmt::Display for Coordinate {
    /// Panel header form: three decimals, degree signs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}°, {:.3}°", self.latitude, self.longitude)
    }
}

/// Unvalidated wire form used by serde.
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}
