//! Sounding Overlay Core Library
//!
//! Severe-weather sounding analysis for a point picked on a weather map.
//! A picked location becomes a vertical atmospheric profile (delivered by the
//! host, or simulated when no profile service exists), the profile becomes
//! fourteen convective parameters, and each parameter is rated against a
//! fixed severity table for display.
//!
//! ## Flow
//!
//! - [`plugin::LocationListener`] turns host map events into a [`Coordinate`]
//! - [`pipeline::ParameterPipeline`] fetches or simulates and derives a [`ParameterSet`]
//! - [`severity`] rates every value and the supercell/tornado headline
//! - [`SoundingPlugin`] holds the panel state and builds the [`SoundingReport`]
//!
//! ```
//! use sounding_core::{LoadOutcome, PanelView, PluginConfig, SoundingPlugin};
//!
//! let plugin = SoundingPlugin::simulated(PluginConfig {
//!     simulated_latency_ms: 0,
//!     simulation_seed: Some(1),
//!     ..PluginConfig::default()
//! });
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//! let outcome = runtime.block_on(plugin.load_location(-37.8136, 144.9631));
//! assert_eq!(outcome, LoadOutcome::Rendered);
//! assert!(matches!(plugin.view(), PanelView::Ready { .. }));
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Parameter derivation and rating
pub mod atmosphere;
pub mod severity;

// Acquisition, session and host integration
pub mod config;
pub mod pipeline;
pub mod plugin;

// Re-export core types
pub use core_types::{
    AtmosphericProfile, CompositeIndices, Coordinate, KinematicParameters, Level, ParameterGroup,
    ParameterKind, ParameterSet, ThermodynamicParameters,
};
pub use error::{AttachError, ConfigError, CoordinateError, FetchError, PipelineError, ProfileError};

// Re-export derivation and rating
pub use atmosphere::derive_parameters;
pub use severity::{classify, Headline, Severity, SupercellPotential, Thresholds, TornadoPotential};

// Re-export plugin surface
pub use config::{DeploymentMode, PluginConfig};
pub use pipeline::{
    DataMode, FixedProfile, ForecastSelection, NoProfileService, ParameterPipeline,
    ProfileRequest, ProfileSource, Simulator,
};
pub use plugin::{
    analysis_url, HostEvent, HostEventKind, LoadOutcome, MapHost, PanelView, SoundingPlugin,
    SoundingReport, DEMO_LOCATIONS,
};
