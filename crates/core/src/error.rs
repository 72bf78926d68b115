//! Error types for coordinate extraction, profile acquisition and configuration.
//!
//! Two error families reach the panel: [`FetchError`] when the profile source
//! is unreachable or hands back something unusable, and [`CoordinateError`]
//! when an event or caller supplied no usable location. Both surface through
//! [`PipelineError`], whose `Display` text is what the error view shows.

use thiserror::Error;

/// A location could not be turned into a [`Coordinate`](crate::Coordinate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// The event carried no location payload, or one of the wrong shape.
    #[error("event carries no usable location")]
    MissingPayload,

    /// Latitude or longitude is NaN or infinite.
    #[error("coordinate is not finite ({latitude}, {longitude})")]
    NonFinite {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Latitude outside [-90, 90].
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180].
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A profile handed over by a source failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// No levels at all.
    #[error("profile has no levels")]
    Empty,

    /// A level field is NaN or infinite.
    #[error("level {index} has a non-finite {field}")]
    NonFinite {
        /// Zero-based level index
        index: usize,
        /// Name of the offending field
        field: &'static str,
    },

    /// Heights must not decrease going up the profile.
    #[error("level {index} is lower than the level beneath it")]
    HeightOrder {
        /// Zero-based index of the out-of-order level
        index: usize,
    },
}

/// The profile source could not deliver a usable profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The host data service could not be reached or refused the request.
    #[error("profile service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a profile that failed validation.
    #[error("malformed profile: {0}")]
    Malformed(#[from] ProfileError),
}

/// Any failure of a single derivation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Profile acquisition failed.
    #[error("failed to fetch sounding: {0}")]
    Fetch(#[from] FetchError),

    /// No usable coordinate.
    #[error("missing coordinate: {0}")]
    MissingCoordinate(#[from] CoordinateError),
}

/// Plugin configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for [`PluginConfig`](crate::PluginConfig).
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid configuration field {field}: {reason}")]
    Invalid {
        /// Field name as it appears in the document
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// The listener could not register with the host map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The map never became available.
    #[error("host map not available after {attempts} attempts")]
    MapUnavailable {
        /// Attach attempts made
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_messages_carry_the_cause() {
        let err = PipelineError::from(FetchError::Unreachable("timeout".into()));
        assert_eq!(
            err.to_string(),
            "failed to fetch sounding: profile service unreachable: timeout"
        );

        let err = PipelineError::from(CoordinateError::LatitudeOutOfRange(91.0));
        assert_eq!(
            err.to_string(),
            "missing coordinate: latitude 91 is outside [-90, 90]"
        );
    }

    #[test]
    fn malformed_profile_converts_into_fetch_error() {
        let err: FetchError = ProfileError::HeightOrder { index: 3 }.into();
        assert!(matches!(err, FetchError::Malformed(ProfileError::HeightOrder { index: 3 })));
    }
}
