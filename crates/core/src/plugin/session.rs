//! Panel session state and the request sequence guard.

use serde::Serialize;

use super::report::SoundingReport;
use crate::core_types::{Coordinate, ParameterSet};
use crate::pipeline::ForecastSelection;

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PanelView {
    /// Nothing picked yet: "click on the map to analyze"
    Prompt,
    /// Waiting for parameters at `coordinate`
    Loading {
        /// Location being analyzed
        coordinate: Coordinate,
    },
    /// Finished report
    Ready {
        /// Render payload
        report: Box<SoundingReport>,
    },
    /// The last load failed
    Error {
        /// Human-readable cause
        message: String,
    },
}

impl PanelView {
    /// Short name of the view, matching its serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            PanelView::Prompt => "prompt",
            PanelView::Loading { .. } => "loading",
            PanelView::Ready { .. } => "ready",
            PanelView::Error { .. } => "error",
        }
    }
}

/// Handle for one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestTicket {
    /// Sequence number issued by the session
    pub sequence: u64,
    /// Location requested
    pub coordinate: Coordinate,
}

/// Result of handing a finished load back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was the latest and is now shown
    Applied,
    /// A newer request was issued meanwhile; the result was dropped
    Stale,
}

/// Mutable state of one plugin instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSession {
    is_open: bool,
    last_coordinate: Option<Coordinate>,
    last_parameters: Option<ParameterSet>,
    view: PanelView,
    latest_request: u64,
    forecast: ForecastSelection,
}

impl PluginSession {
    /// Closed session with nothing picked.
    pub fn new(forecast: ForecastSelection) -> Self {
        Self {
            is_open: false,
            last_coordinate: None,
            last_parameters: None,
            view: PanelView::Prompt,
            latest_request: 0,
            forecast,
        }
    }

    /// Whether the panel is visible
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Location of the most recent request
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.last_coordinate
    }

    /// Parameters of the last applied result
    pub fn last_parameters(&self) -> Option<&ParameterSet> {
        self.last_parameters.as_ref()
    }

    /// What the panel shows
    pub fn view(&self) -> &PanelView {
        &self.view
    }

    /// Sequence number of the newest request
    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    /// Forecast used for new requests
    pub fn forecast(&self) -> &ForecastSelection {
        &self.forecast
    }

    /// Change the forecast used by subsequent requests.
    pub fn set_forecast(&mut self, forecast: ForecastSelection) {
        self.forecast = forecast;
    }

    /// Show the panel. Without a prior pick it shows the prompt.
    pub fn open(&mut self) {
        if self.last_coordinate.is_none() {
            self.view = PanelView::Prompt;
        }
        self.is_open = true;
    }

    /// Hide the panel, keeping its view.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Flip visibility; returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
        self.is_open
    }

    /// Issue a new request for `coordinate` and switch to the loading view.
    ///
    /// Any earlier ticket becomes stale.
    pub fn begin_request(&mut self, coordinate: Coordinate) -> RequestTicket {
        self.latest_request += 1;
        self.last_coordinate = Some(coordinate);
        self.view = PanelView::Loading { coordinate };
        self.is_open = true;
        RequestTicket {
            sequence: self.latest_request,
            coordinate,
        }
    }

    /// Whether `ticket` is still the latest issued request.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.sequence == self.latest_request
    }

    /// Record a successful load.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        parameters: ParameterSet,
        report: SoundingReport,
    ) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }
        self.last_parameters = Some(parameters);
        self.view = PanelView::Ready {
            report: Box::new(report),
        };
        Completion::Applied
    }

    /// Record a failed load.
    pub fn fail(&mut self, ticket: &RequestTicket, message: String) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }
        self.view = PanelView::Error { message };
        Completion::Applied
    }

    /// Show an error that is not tied to a request, superseding any in flight.
    pub fn reject(&mut self, message: String) {
        self.latest_request += 1;
        self.view = PanelView::Error { message };
        self.is_open = true;
    }
}
