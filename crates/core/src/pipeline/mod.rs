//! Parameter pipeline: profile acquisition, derivation, fallback simulation.
//!
//! A pipeline either owns a host [`ProfileSource`] and derives parameters
//! from the soundings it returns, or has none and falls back to the
//! [`Simulator`]. Both paths are `async`: awaiting the host keeps the UI
//! thread free, and the simulated path waits out a configurable latency so
//! the loading view behaves the same in both modes.

mod simulated;
mod source;

pub use simulated::{Simulator, EXTRATROPICAL_FACTOR, TROPICAL_FACTOR};
pub use source::{FixedProfile, ForecastSelection, NoProfileService, ProfileRequest, ProfileSource};

use std::time::Duration;
use tracing::{debug, warn};

use crate::atmosphere::derive_parameters;
use crate::core_types::ParameterSet;
use crate::error::PipelineError;

/// Where the pipeline gets its numbers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Derived from host-supplied soundings
    Derived,
    /// Random values, no host profile service
    Simulated,
}

/// Coordinate-to-parameters pipeline.
#[derive(Debug)]
pub struct ParameterPipeline<S = NoProfileService> {
    source: Option<S>,
    simulator: Simulator,
    simulated_latency: Duration,
}

impl ParameterPipeline<NoProfileService> {
    /// Simulation-only pipeline.
    pub fn simulated(simulator: Simulator, latency: Duration) -> Self {
        Self {
            source: None,
            simulator,
            simulated_latency: latency,
        }
    }
}

impl<S: ProfileSource> ParameterPipeline<S> {
    /// Pipeline deriving from a host profile service.
    pub fn with_source(source: S) -> Self {
        Self {
            source: Some(source),
            simulator: Simulator::default(),
            simulated_latency: Duration::ZERO,
        }
    }

    /// Pipeline that uses `source` when present and simulates otherwise.
    pub fn new(source: Option<S>, simulator: Simulator, simulated_latency: Duration) -> Self {
        Self {
            source,
            simulator,
            simulated_latency,
        }
    }

    /// Which path [`derive`](Self::derive) takes.
    pub fn mode(&self) -> DataMode {
        if self.source.is_some() {
            DataMode::Derived
        } else {
            DataMode::Simulated
        }
    }

    /// Produce the parameter set for one request.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Fetch`] when the host source is unreachable or returns
    /// a malformed profile. The simulated path does not fail.
    pub async fn derive(&self, request: &ProfileRequest) -> Result<ParameterSet, PipelineError> {
        let Some(source) = &self.source else {
            if !self.simulated_latency.is_zero() {
                tokio::time::sleep(self.simulated_latency).await;
            }
            debug!(
                lat = request.coordinate.latitude(),
                lon = request.coordinate.longitude(),
                "simulating sounding parameters"
            );
            return Ok(self.simulator.sample(request.coordinate));
        };

        let profile = source.fetch_profile(request).await.map_err(|e| {
            warn!(
                lat = request.coordinate.latitude(),
                lon = request.coordinate.longitude(),
                model = %request.forecast.model,
                "profile fetch failed: {e}"
            );
            PipelineError::Fetch(e)
        })?;

        Ok(derive_parameters(&profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{AtmosphericProfile, Coordinate, Level};
    use crate::error::FetchError;

    struct Unreachable;

    impl ProfileSource for Unreachable {
        async fn fetch_profile(
            &self,
            _request: &ProfileRequest,
        ) -> Result<AtmosphericProfile, FetchError> {
            Err(FetchError::Unreachable("connection refused".into()))
        }
    }

    fn request() -> ProfileRequest {
        ProfileRequest {
            coordinate: Coordinate::new(-37.8136, 144.9631).unwrap(),
            forecast: ForecastSelection::current("ecmwf"),
        }
    }

    fn fixed() -> FixedProfile {
        FixedProfile(
            AtmosphericProfile::new(vec![
                Level::new(1000.0, 0.0, 28.0, 20.0, 75.0, 1.0, 2.0),
                Level::new(850.0, 1500.0, 18.0, 12.0, 60.0, 8.0, 9.0),
                Level::new(500.0, 5700.0, -11.0, -25.0, 35.0, 18.0, 14.0),
                Level::new(400.0, 7400.0, -20.0, -35.0, 30.0, 25.0, 15.0),
            ])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn derived_mode_matches_direct_derivation() {
        let source = fixed();
        let expected = derive_parameters(&source.0);
        let pipeline = ParameterPipeline::with_source(source);
        assert_eq!(pipeline.mode(), DataMode::Derived);
        assert_eq!(pipeline.derive(&request()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn unreachable_source_is_a_fetch_error() {
        let pipeline = ParameterPipeline::with_source(Unreachable);
        let err = pipeline.derive(&request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(FetchError::Unreachable(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn simulated_mode_without_latency() {
        let pipeline = ParameterPipeline::simulated(Simulator::seeded(1), Duration::ZERO);
        assert_eq!(pipeline.mode(), DataMode::Simulated);
        let set = pipeline.derive(&request()).await.unwrap();
        assert!((-150.0..=0.0).contains(&set.thermodynamic.cin));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_mode_waits_out_latency() {
        let pipeline =
            ParameterPipeline::simulated(Simulator::seeded(1), Duration::from_millis(1000));
        let started = tokio::time::Instant::now();
        pipeline.derive(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
