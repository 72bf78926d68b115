//! Profile acquisition seam between the pipeline and the host data service.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::core_types::{AtmosphericProfile, Coordinate};
use crate::error::FetchError;

/// Forecast model and time step currently active on the host map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSelection {
    /// Model identifier (e.g. `"ecmwf"`)
    pub model: String,
    /// Forecast valid time in milliseconds since the Unix epoch, or `None`
    /// for the host's current step
    pub timestamp_ms: Option<i64>,
}

impl ForecastSelection {
    /// Selection of `model` at the host's current step
    pub fn current(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            timestamp_ms: None,
        }
    }
}

/// Everything a profile source needs to answer one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Picked location
    pub coordinate: Coordinate,
    /// Active model and step
    pub forecast: ForecastSelection,
}

/// Host collaborator that delivers soundings.
///
/// Time budget, retries and caching belong to the implementor; the pipeline
/// awaits exactly one answer per request and treats an error as terminal.
pub trait ProfileSource {
    /// Fetch the profile for `request`.
    fn fetch_profile(
        &self,
        request: &ProfileRequest,
    ) -> impl Future<Output = Result<AtmosphericProfile, FetchError>>;
}

/// Placeholder source type for pipelines that only simulate.
///
/// Uninhabited: a pipeline built with this type never holds a source.
#[derive(Debug, Clone, Copy)]
pub enum NoProfileService {}

impl ProfileSource for NoProfileService {
    fn fetch_profile(
        &self,
        _request: &ProfileRequest,
    ) -> impl Future<Output = Result<AtmosphericProfile, FetchError>> {
        #[allow(unreachable_code)]
        std::future::ready::<Result<AtmosphericProfile, FetchError>>(match *self {})
    }
}

/// A source that always answers with the same profile.
///
/// Useful for hosts that already hold a sounding and for deterministic tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedProfile(pub AtmosphericProfile);

impl ProfileSource for FixedProfile {
    fn fetch_profile(
        &self,
        _request: &ProfileRequest,
    ) -> impl Future<Output = Result<AtmosphericProfile, FetchError>> {
        std::future::ready(Ok(self.0.clone()))
    }
}
