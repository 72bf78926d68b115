//! Location listener: turns host map events into coordinates.
//!
//! The two deployment variants differ only in which events they subscribe
//! to and how the location is laid out in the payload, so each is a small
//! [`HostAdapter`] behind one [`LocationListener`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DeploymentMode;
use crate::core_types::Coordinate;
use crate::error::{AttachError, CoordinateError};

/// Host map events the plugin can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEventKind {
    /// Raw click on the map
    MapClick,
    /// Host location picker opened
    PickerOpened,
    /// Host location picker dragged
    PickerMoved,
}

/// One event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    /// Event type
    pub kind: HostEventKind,
    /// Event payload as sent by the host
    pub payload: Value,
}

impl HostEvent {
    /// Event of `kind` carrying `payload`.
    pub fn new(kind: HostEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Per-variant event subscription and payload layout.
pub trait HostAdapter: fmt::Debug {
    /// Adapter name for logs
    fn name(&self) -> &'static str;

    /// Events this variant subscribes to.
    fn event_kinds(&self) -> &'static [HostEventKind];

    /// Pull a coordinate out of an event payload.
    ///
    /// # Errors
    ///
    /// [`CoordinateError::MissingPayload`] when the payload has the wrong
    /// shape, or the validation error of [`Coordinate::new`].
    fn extract(&self, payload: &Value) -> Result<Coordinate, CoordinateError>;
}

/// Standalone overlay: `{"latlng": {"lat": .., "lng": ..}}` on map clicks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneOverlay;

#[derive(Deserialize)]
struct ClickPayload {
    latlng: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl HostAdapter for StandaloneOverlay {
    fn name(&self) -> &'static str {
        "standalone"
    }

    fn event_kinds(&self) -> &'static [HostEventKind] {
        &[HostEventKind::MapClick]
    }

    fn extract(&self, payload: &Value) -> Result<Coordinate, CoordinateError> {
        let click =
            ClickPayload::deserialize(payload).map_err(|_| CoordinateError::MissingPayload)?;
        Coordinate::new(click.latlng.lat, click.latlng.lng)
    }
}

/// Host plugin module: `{"lat": .., "lon": ..}` on picker events.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostModule;

#[derive(Deserialize)]
struct PickerPayload {
    lat: f64,
    lon: f64,
}

impl HostAdapter for HostModule {
    fn name(&self) -> &'static str {
        "host_module"
    }

    fn event_kinds(&self) -> &'static [HostEventKind] {
        &[HostEventKind::PickerOpened, HostEventKind::PickerMoved]
    }

    fn extract(&self, payload: &Value) -> Result<Coordinate, CoordinateError> {
        let picker =
            PickerPayload::deserialize(payload).map_err(|_| CoordinateError::MissingPayload)?;
        Coordinate::new(picker.lat, picker.lon)
    }
}

/// Host map surface the listener registers with.
pub trait MapHost {
    /// Whether the map accepts subscriptions yet.
    fn is_ready(&self) -> bool;

    /// Register interest in `kind`.
    fn subscribe(&mut self, kind: HostEventKind);

    /// Open `url` in a new browsing context.
    fn open_in_new_context(&mut self, url: &str);
}

/// Event listener for one plugin instance.
#[derive(Debug)]
pub struct LocationListener {
    adapter: Box<dyn HostAdapter>,
}

impl LocationListener {
    /// Listener reading events through `adapter`.
    pub fn new(adapter: Box<dyn HostAdapter>) -> Self {
        Self { adapter }
    }

    /// Listener using the adapter for `mode`.
    pub fn for_mode(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Standalone => Self::new(Box::new(StandaloneOverlay)),
            DeploymentMode::HostModule => Self::new(Box::new(HostModule)),
        }
    }

    /// Name of the active adapter
    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    /// Whether events of `kind` are handled.
    pub fn handles(&self, kind: HostEventKind) -> bool {
        self.adapter.event_kinds().contains(&kind)
    }

    /// Coordinate carried by `event`, if it is a handled event with a usable
    /// location. Anything else is ignored.
    pub fn extract(&self, event: &HostEvent) -> Option<Coordinate> {
        if !self.handles(event.kind) {
            return None;
        }
        match self.adapter.extract(&event.payload) {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                debug!(adapter = self.adapter.name(), kind = ?event.kind, "ignoring event: {e}");
                None
            }
        }
    }

    /// Subscribe to the adapter's events if the map is ready.
    ///
    /// # Errors
    ///
    /// [`AttachError::MapUnavailable`] when the map is not ready.
    pub fn attach<H: MapHost>(&self, host: &mut H) -> Result<(), AttachError> {
        if !host.is_ready() {
            return Err(AttachError::MapUnavailable { attempts: 1 });
        }
        for &kind in self.adapter.event_kinds() {
            host.subscribe(kind);
        }
        info!(adapter = self.adapter.name(), "location listener attached");
        Ok(())
    }

    /// Attach, retrying exactly once after `retry_delay` if the map is not
    /// ready on the first attempt.
    ///
    /// # Errors
    ///
    /// [`AttachError::MapUnavailable`] when both attempts fail.
    pub async fn attach_with_retry<H: MapHost>(
        &self,
        host: &mut H,
        retry_delay: Duration,
    ) -> Result<(), AttachError> {
        if self.attach(host).is_ok() {
            return Ok(());
        }
        warn!(
            adapter = self.adapter.name(),
            delay_ms = retry_delay.as_millis(),
            "host map not ready, retrying once"
        );
        tokio::time::sleep(retry_delay).await;
        self.attach(host)
            .map_err(|_| AttachError::MapUnavailable { attempts: 2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeMap {
        ready_after_checks: u32,
        checks: Cell<u32>,
        subscribed: Vec<HostEventKind>,
        opened: Vec<String>,
    }

    impl MapHost for FakeMap {
        fn is_ready(&self) -> bool {
            self.checks.set(self.checks.get() + 1);
            self.checks.get() > self.ready_after_checks
        }

        fn subscribe(&mut self, kind: HostEventKind) {
            self.subscribed.push(kind);
        }

        fn open_in_new_context(&mut self, url: &str) {
            self.opened.push(url.to_string());
        }
    }

    #[test]
    fn standalone_reads_click_payloads() {
        let listener = LocationListener::for_mode(DeploymentMode::Standalone);
        let event = HostEvent::new(
            HostEventKind::MapClick,
            json!({"latlng": {"lat": -37.8136, "lng": 144.9631}}),
        );
        let c = listener.extract(&event).unwrap();
        assert_eq!((c.latitude(), c.longitude()), (-37.8136, 144.9631));

        // picker events are not subscribed in this variant
        let picker = HostEvent::new(HostEventKind::PickerMoved, json!({"lat": 1.0, "lon": 2.0}));
        assert!(listener.extract(&picker).is_none());
    }

    #[test]
    fn host_module_reads_picker_payloads() {
        let listener = LocationListener::for_mode(DeploymentMode::HostModule);
        assert_eq!(listener.adapter_name(), "host_module");
        for kind in [HostEventKind::PickerOpened, HostEventKind::PickerMoved] {
            let event = HostEvent::new(kind, json!({"lat": 35.6762, "lon": 139.6503}));
            assert_eq!(listener.extract(&event).unwrap().latitude(), 35.6762);
        }
        assert!(!listener.handles(HostEventKind::MapClick));
    }

    #[test]
    fn unusable_payloads_are_ignored() {
        let listener = LocationListener::for_mode(DeploymentMode::HostModule);
        for payload in [
            json!(null),
            json!({"lat": 10.0}),
            json!({"lat": "north", "lon": 2.0}),
            json!({"lat": 95.0, "lon": 0.0}),
        ] {
            let event = HostEvent::new(HostEventKind::PickerOpened, payload);
            assert!(listener.extract(&event).is_none());
        }
        assert_eq!(
            HostModule.extract(&json!({})).unwrap_err(),
            CoordinateError::MissingPayload
        );
    }

    #[test]
    fn attach_subscribes_to_adapter_events() {
        let mut map = FakeMap::default();
        LocationListener::for_mode(DeploymentMode::HostModule)
            .attach(&mut map)
            .unwrap();
        assert_eq!(
            map.subscribed,
            [HostEventKind::PickerOpened, HostEventKind::PickerMoved]
        );
        assert!(map.opened.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn attach_retries_once_after_delay() {
        let listener = LocationListener::for_mode(DeploymentMode::Standalone);
        let mut map = FakeMap {
            ready_after_checks: 1,
            ..FakeMap::default()
        };
        let started = tokio::time::Instant::now();
        listener
            .attach_with_retry(&mut map, Duration::from_millis(2000))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(map.subscribed, [HostEventKind::MapClick]);
    }

    #[tokio::test(start_paused = true)]
    async fn attach_gives_up_after_the_retry() {
        let listener = LocationListener::for_mode(DeploymentMode::Standalone);
        let mut map = FakeMap {
            ready_after_checks: 5,
            ..FakeMap::default()
        };
        let err = listener
            .attach_with_retry(&mut map, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert_eq!(err, AttachError::MapUnavailable { attempts: 2 });
        assert_eq!(map.checks.get(), 2);
        assert!(map.subscribed.is_empty());
    }
}
