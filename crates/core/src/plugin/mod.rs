//! Plugin instance: session state, listener and pipeline wired together.
//!
//! A [`SoundingPlugin`] is an explicit value owned by whoever embeds it (an
//! adapter, the FFI layer, a test). All state lives in a single-threaded
//! cell; borrows are never held across an `await`, so overlapping loads can
//! interleave freely and the request sequence decides which one is shown.

mod listener;
mod report;
mod session;

pub use listener::{
    HostAdapter, HostEvent, HostEventKind, HostModule, LocationListener, MapHost,
    StandaloneOverlay,
};
pub use report::{
    analysis_url, demo_location, DemoLocation, ParameterCard, ReportSection, SoundingReport,
    DEMO_LOCATIONS,
};
pub use session::{Completion, PanelView, PluginSession, RequestTicket};

use std::cell::RefCell;
use tracing::{debug, info, warn};

use crate::config::PluginConfig;
use crate::core_types::{Coordinate, ParameterSet};
use crate::error::{AttachError, PipelineError};
use crate::pipeline::{
    DataMode, ForecastSelection, NoProfileService, ParameterPipeline, ProfileRequest,
    ProfileSource, Simulator,
};

/// How a load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The report is on the panel
    Rendered,
    /// The error view is on the panel
    Failed,
    /// A newer load was issued meanwhile; this result was discarded
    Superseded,
}

/// One sounding overlay instance.
#[derive(Debug)]
pub struct SoundingPlugin<S = NoProfileService> {
    config: PluginConfig,
    pipeline: ParameterPipeline<S>,
    listener: LocationListener,
    session: RefCell<PluginSession>,
}

impl SoundingPlugin<NoProfileService> {
    /// Plugin without a host profile service; every load is simulated.
    pub fn simulated(config: PluginConfig) -> Self {
        Self::build(config, None)
    }
}

impl<S: ProfileSource> SoundingPlugin<S> {
    /// Plugin deriving parameters from soundings delivered by `source`.
    pub fn with_source(config: PluginConfig, source: S) -> Self {
        Self::build(config, Some(source))
    }

    /// Plugin that derives when `source` is present and simulates otherwise.
    pub fn build(config: PluginConfig, source: Option<S>) -> Self {
        let simulator = match config.simulation_seed {
            Some(seed) => Simulator::seeded(seed),
            None => Simulator::from_os_rng(),
        };
        let pipeline = ParameterPipeline::new(source, simulator, config.simulated_latency());
        let listener = LocationListener::for_mode(config.deployment);
        let session = RefCell::new(PluginSession::new(ForecastSelection::current(
            config.model.clone(),
        )));
        info!(
            adapter = listener.adapter_name(),
            mode = ?pipeline.mode(),
            "sounding plugin created"
        );
        Self {
            config,
            pipeline,
            listener,
            session,
        }
    }

    /// Configuration the plugin was built with
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Whether loads are derived or simulated
    pub fn mode(&self) -> DataMode {
        self.pipeline.mode()
    }

    /// Listener for this deployment
    pub fn listener(&self) -> &LocationListener {
        &self.listener
    }

    /// Snapshot of the session state
    pub fn session(&self) -> PluginSession {
        self.session.borrow().clone()
    }

    /// Whether the panel is visible
    pub fn is_open(&self) -> bool {
        self.session.borrow().is_open()
    }

    /// Current panel view
    pub fn view(&self) -> PanelView {
        self.session.borrow().view().clone()
    }

    /// Parameters of the last successful load
    pub fn last_parameters(&self) -> Option<ParameterSet> {
        self.session.borrow().last_parameters().copied()
    }

    /// Show the panel.
    pub fn open(&self) {
        self.session.borrow_mut().open();
    }

    /// Hide the panel. A load in flight still updates the view.
    pub fn close(&self) {
        self.session.borrow_mut().close();
    }

    /// Flip panel visibility; returns whether it is now open.
    pub fn toggle(&self) -> bool {
        self.session.borrow_mut().toggle()
    }

    /// Switch the forecast model/time step used by later loads.
    pub fn set_forecast(&self, forecast: ForecastSelection) {
        debug!(model = %forecast.model, timestamp_ms = ?forecast.timestamp_ms, "forecast changed");
        self.session.borrow_mut().set_forecast(forecast);
    }

    /// Register the listener with the host map, retrying once after the
    /// configured delay.
    ///
    /// # Errors
    ///
    /// [`AttachError::MapUnavailable`] when the map is still not ready.
    pub async fn attach<H: MapHost>(&self, host: &mut H) -> Result<(), AttachError> {
        self.listener
            .attach_with_retry(host, self.config.attach_retry_delay())
            .await
    }

    /// Load the panel for a raw latitude/longitude.
    ///
    /// An unusable location shows the error view without touching the
    /// pipeline.
    pub async fn load_location(&self, latitude: f64, longitude: f64) -> LoadOutcome {
        match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => self.load_coordinate(coordinate).await,
            Err(e) => {
                let err = PipelineError::from(e);
                warn!(latitude, longitude, "rejected location: {err}");
                self.session.borrow_mut().reject(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Load the panel for `coordinate`.
    pub async fn load_coordinate(&self, coordinate: Coordinate) -> LoadOutcome {
        let (ticket, request) = {
            let mut session = self.session.borrow_mut();
            let ticket = session.begin_request(coordinate);
            let request = ProfileRequest {
                coordinate,
                forecast: session.forecast().clone(),
            };
            (ticket, request)
        };
        info!(
            lat = coordinate.latitude(),
            lon = coordinate.longitude(),
            sequence = ticket.sequence,
            "loading sounding"
        );

        let result = self.pipeline.derive(&request).await;

        let mut session = self.session.borrow_mut();
        if !session.is_current(&ticket) {
            debug!(
                sequence = ticket.sequence,
                latest = session.latest_request(),
                "discarding stale result"
            );
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(parameters) => {
                debug!(?parameters, "derived parameters");
                let report =
                    SoundingReport::build(coordinate, &parameters, &self.config.analysis_base_url);
                session.complete(&ticket, parameters, report);
                LoadOutcome::Rendered
            }
            Err(e) => {
                session.fail(&ticket, e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Feed one host event through the listener.
    ///
    /// Returns `None` when the event is not handled or carries no usable
    /// location.
    pub async fn handle_event(&self, event: &HostEvent) -> Option<LoadOutcome> {
        let coordinate = self.listener.extract(event)?;
        Some(self.load_coordinate(coordinate).await)
    }

    /// Analysis link for the last picked location.
    pub fn analysis_url(&self) -> Option<String> {
        self.session
            .borrow()
            .last_coordinate()
            .map(|c| analysis_url(&self.config.analysis_base_url, c))
    }

    /// Ask the host to open the analysis tool for the last picked location.
    /// Returns `false` when nothing has been picked yet.
    pub fn open_analysis<H: MapHost>(&self, host: &mut H) -> bool {
        let Some(url) = self.analysis_url() else {
            return false;
        };
        info!(%url, "opening detailed analysis");
        host.open_in_new_context(&url);
        true
    }
}
