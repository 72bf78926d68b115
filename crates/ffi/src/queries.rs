use std::ffi::CString;
use std::os::raw::c_char;

use sounding_core::{
    classify, ForecastSelection, HostEvent, LoadOutcome, PanelView, ParameterKind, ParameterSet,
    Severity, Thresholds,
};

use crate::error::{DefaultSoundingError, SoundingErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, into_c_string, str_from_ptr, write_out};
use crate::instance::SoundingInstance;

/// How a load ended.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundingLoadOutcome {
    /// The report is on the panel.
    Rendered = 0,
    /// The panel shows an error.
    Failed = 1,
    /// A newer load replaced this one.
    Superseded = 2,
}

impl From<LoadOutcome> for SoundingLoadOutcome {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Rendered => Self::Rendered,
            LoadOutcome::Failed => Self::Failed,
            LoadOutcome::Superseded => Self::Superseded,
        }
    }
}

/// Severity tier.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundingSeverity {
    /// Missing value.
    None = 0,
    /// Low.
    Low = 1,
    /// Moderate.
    Moderate = 2,
    /// High.
    High = 3,
    /// Extreme.
    Extreme = 4,
}

impl From<Severity> for SoundingSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::None => Self::None,
            Severity::Low => Self::Low,
            Severity::Moderate => Self::Moderate,
            Severity::High => Self::High,
            Severity::Extreme => Self::Extreme,
        }
    }
}

/// Which view the panel shows.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundingPanelView {
    /// Waiting for a first pick.
    Prompt = 0,
    /// Load in flight.
    Loading = 1,
    /// Report available.
    Ready = 2,
    /// Last load failed; see `sounding_plugin_panel_json` for the message.
    Error = 3,
}

/// Panel snapshot.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundingPanelState {
    /// Whether the panel is visible.
    pub is_open: bool,
    /// Current view.
    pub view: SoundingPanelView,
    /// Whether a location has been picked; the coordinates are 0 otherwise.
    pub has_coordinate: bool,
    /// Last picked latitude (°).
    pub latitude: f64,
    /// Last picked longitude (°).
    pub longitude: f64,
}

/// Raw parameter values of the last successful load.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoundingParameters {
    /// CAPE (J/kg)
    pub cape: f64,
    /// Most-unstable CAPE (J/kg)
    pub mucape: f64,
    /// CIN (J/kg, <= 0)
    pub cin: f64,
    /// LCL (hPa)
    pub lcl: f64,
    /// Lifted index (°C)
    pub li: f64,
    /// Precipitable water (mm)
    pub pwat: f64,
    /// 0-1 km shear (m/s)
    pub shear_0_1km: f64,
    /// 0-6 km shear (m/s)
    pub shear_0_6km: f64,
    /// 0-1 km helicity (m²/s²)
    pub srh_0_1km: f64,
    /// 0-3 km helicity (m²/s²)
    pub srh_0_3km: f64,
    /// Supercell composite
    pub scp: f64,
    /// Significant tornado parameter
    pub stp: f64,
    /// Energy-helicity index
    pub ehi: f64,
    /// Significant hail parameter
    pub ship: f64,
}

impl From<&ParameterSet> for SoundingParameters {
    fn from(p: &ParameterSet) -> Self {
        let (t, k, c) = (&p.thermodynamic, &p.kinematic, &p.composite);
        Self {
            cape: t.cape,
            mucape: t.mucape,
            cin: t.cin,
            lcl: t.lcl,
            li: t.li,
            pwat: t.pwat,
            shear_0_1km: k.shear_0_1km,
            shear_0_6km: k.shear_0_6km,
            srh_0_1km: k.srh_0_1km,
            srh_0_3km: k.srh_0_3km,
            scp: c.scp,
            stp: c.stp,
            ehi: c.ehi,
            ship: c.ship,
        }
    }
}

/// Show the panel. Without a prior pick it shows the prompt view.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_open(ptr: *const SoundingInstance) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        instance.plugin.open();
        Ok(())
    })
}

/// Hide the panel.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_close(ptr: *const SoundingInstance) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        instance.plugin.close();
        Ok(())
    })
}

/// Flip panel visibility. `out_is_open` (optional) receives the new state.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_is_open` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_toggle(
    ptr: *const SoundingInstance,
    out_is_open: *mut bool,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let is_open = instance.plugin.toggle();
        if !out_is_open.is_null() {
            // SAFETY: non-null, caller contract
            unsafe { out_is_open.write(is_open) };
        }
        Ok(())
    })
}

/// Load the panel for a location, blocking until the load finishes.
///
/// An unusable coordinate is not a call failure: the panel switches to its
/// error view and `out_outcome` reports `Failed`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_outcome` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_load_location(
    ptr: *const SoundingInstance,
    latitude: f64,
    longitude: f64,
    out_outcome: *mut SoundingLoadOutcome,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let outcome = instance.block_on(
            "sounding_plugin_load_location",
            instance.plugin.load_location(latitude, longitude),
        )?;
        if !out_outcome.is_null() {
            // SAFETY: non-null, caller contract
            unsafe { out_outcome.write(outcome.into()) };
        }
        Ok(())
    })
}

/// Feed a host event (JSON `{"kind": "map_click", "payload": {...}}`)
/// through the listener.
///
/// `out_handled` (optional) receives whether the event carried a usable
/// location for this deployment; `out_outcome` (optional) is written only
/// when it did.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `event_json` must be a valid null-terminated string.
/// - `out_handled` and `out_outcome` must each be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_handle_event(
    ptr: *const SoundingInstance,
    event_json: *const c_char,
    out_handled: *mut bool,
    out_outcome: *mut SoundingLoadOutcome,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        // SAFETY: caller contract
        let json = unsafe { str_from_ptr(event_json, "event_json") }?;
        let event: HostEvent = serde_json::from_str(json)
            .map_err(|e| DefaultSoundingError::invalid_parameter(format!("invalid event: {e}")))?;

        let outcome = instance
            .block_on("sounding_plugin_handle_event", instance.plugin.handle_event(&event))?;
        if !out_handled.is_null() {
            // SAFETY: non-null, caller contract
            unsafe { out_handled.write(outcome.is_some()) };
        }
        if let (Some(outcome), false) = (outcome, out_outcome.is_null()) {
            // SAFETY: non-null, caller contract
            unsafe { out_outcome.write(outcome.into()) };
        }
        Ok(())
    })
}

/// Select the forecast model and valid time used by later loads.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `model` must be a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_set_forecast(
    ptr: *const SoundingInstance,
    model: *const c_char,
    timestamp_ms: i64,
    has_timestamp: bool,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        // SAFETY: caller contract
        let model = unsafe { str_from_ptr(model, "model") }?;
        if model.trim().is_empty() {
            return Err(DefaultSoundingError::invalid_parameter(
                "model must not be empty".into(),
            ));
        }
        instance.plugin.set_forecast(ForecastSelection {
            model: model.to_string(),
            timestamp_ms: has_timestamp.then_some(timestamp_ms),
        });
        Ok(())
    })
}

/// Fill `out_state` with the current panel state.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_state` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_panel_state(
    ptr: *const SoundingInstance,
    out_state: *mut SoundingPanelState,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let session = instance.plugin.session();
        let view = match session.view() {
            PanelView::Prompt => SoundingPanelView::Prompt,
            PanelView::Loading { .. } => SoundingPanelView::Loading,
            PanelView::Ready { .. } => SoundingPanelView::Ready,
            PanelView::Error { .. } => SoundingPanelView::Error,
        };
        let coordinate = session.last_coordinate();
        let state = SoundingPanelState {
            is_open: session.is_open(),
            view,
            has_coordinate: coordinate.is_some(),
            latitude: coordinate.map_or(0.0, |c| c.latitude()),
            longitude: coordinate.map_or(0.0, |c| c.longitude()),
        };
        // SAFETY: caller contract
        unsafe { write_out(out_state, state, "out_state") }
    })
}

/// Fill `out_parameters` with the last successfully loaded values.
///
/// Returns `NotReady` if no load has succeeded yet.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_parameters` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_get_parameters(
    ptr: *const SoundingInstance,
    out_parameters: *mut SoundingParameters,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let parameters = instance
            .plugin
            .last_parameters()
            .ok_or_else(|| DefaultSoundingError::not_ready("parameters"))?;
        // SAFETY: caller contract
        unsafe { write_out(out_parameters, SoundingParameters::from(&parameters), "out_parameters") }
    })
}

/// Current panel view as JSON (tagged by `"view"`; the ready view carries
/// the full report). Free the string with `sounding_string_free`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_json` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_panel_json(
    ptr: *const SoundingInstance,
    out_json: *mut *mut c_char,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let json = serde_json::to_string(&instance.plugin.view())
            .map_err(|e| DefaultSoundingError::serialization(&e))?;
        let json = into_c_string(json)?;
        // SAFETY: caller contract
        unsafe { write_out(out_json, json, "out_json") }
    })
}

/// Analysis tool link for the last picked location. Free the string with
/// `sounding_string_free`. Returns `NotReady` if nothing was picked yet.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
/// - `out_url` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_analysis_url(
    ptr: *const SoundingInstance,
    out_url: *mut *mut c_char,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let url = instance
            .plugin
            .analysis_url()
            .ok_or_else(|| DefaultSoundingError::not_ready("picked location"))?;
        let url = into_c_string(url)?;
        // SAFETY: caller contract
        unsafe { write_out(out_url, url, "out_url") }
    })
}

/// Free a string returned by this library. Null is a no-op.
///
/// # Safety
/// `s` must be null or a string returned by this library that has not been
/// freed yet.
#[no_mangle]
pub unsafe extern "C" fn sounding_string_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: created by `CString::into_raw`
    unsafe {
        drop(CString::from_raw(s));
    }
}

/// Rate a raw value of parameter `kind` (0 = CAPE ... 13 = SHIP, panel
/// order) the way the panel does, including sign handling and rounding.
///
/// # Safety
/// `out_severity` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn sounding_classify(
    kind: u8,
    value: f64,
    out_severity: *mut SoundingSeverity,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        let kind = ParameterKind::from_u8(kind).ok_or_else(|| {
            DefaultSoundingError::invalid_parameter(format!("unknown parameter kind {kind}"))
        })?;
        let severity = kind.descriptor().classify(value);
        // SAFETY: caller contract
        unsafe { write_out(out_severity, severity.into(), "out_severity") }
    })
}

/// Rate `value` against an explicit `[moderate, high, extreme]` triple.
/// NaN rates `None`.
#[no_mangle]
pub extern "C" fn sounding_classify_thresholds(
    value: f64,
    moderate: f64,
    high: f64,
    extreme: f64,
) -> SoundingSeverity {
    classify(Some(value), Thresholds::new(moderate, high, extreme)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{sounding_get_last_error_code, SoundingErrorCode};
    use crate::instance::{sounding_plugin_destroy, sounding_plugin_new};
    use std::ffi::CStr;
    use std::ptr;

    fn new_plugin(config: &CStr) -> *mut SoundingInstance {
        let mut instance = ptr::null_mut();
        let code =
            unsafe { sounding_plugin_new(config.as_ptr(), None, ptr::null_mut(), &mut instance) };
        assert_eq!(code, SoundingErrorCode::Ok);
        assert!(!instance.is_null());
        instance
    }

    fn panel_state(plugin: *const SoundingInstance) -> SoundingPanelState {
        let mut state = SoundingPanelState {
            is_open: false,
            view: SoundingPanelView::Error,
            has_coordinate: true,
            latitude: f64::NAN,
            longitude: f64::NAN,
        };
        assert_eq!(unsafe { sounding_plugin_panel_state(plugin, &mut state) }, SoundingErrorCode::Ok);
        state
    }

    #[test]
    fn simulated_load_round_trip() {
        let plugin = new_plugin(c"{\"simulated_latency_ms\": 0, \"simulation_seed\": 5}");

        let state = panel_state(plugin);
        assert!(!state.is_open);
        assert_eq!(state.view, SoundingPanelView::Prompt);
        assert!(!state.has_coordinate);

        let mut params = SoundingParameters::default();
        assert_eq!(
            unsafe { sounding_plugin_get_parameters(plugin, &mut params) },
            SoundingErrorCode::NotReady
        );

        let mut outcome = SoundingLoadOutcome::Failed;
        let code = unsafe { sounding_plugin_load_location(plugin, -37.8136, 144.9631, &mut outcome) };
        assert_eq!(code, SoundingErrorCode::Ok);
        assert_eq!(outcome, SoundingLoadOutcome::Rendered);

        let state = panel_state(plugin);
        assert!(state.is_open);
        assert_eq!(state.view, SoundingPanelView::Ready);
        assert_eq!((state.latitude, state.longitude), (-37.8136, 144.9631));

        assert_eq!(unsafe { sounding_plugin_get_parameters(plugin, &mut params) }, SoundingErrorCode::Ok);
        assert!((-150.0..=0.0).contains(&params.cin));

        let mut json = ptr::null_mut();
        assert_eq!(unsafe { sounding_plugin_panel_json(plugin, &mut json) }, SoundingErrorCode::Ok);
        let text = unsafe { CStr::from_ptr(json) }.to_str().unwrap().to_string();
        unsafe { sounding_string_free(json) };
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["view"], "ready");
        assert_eq!(value["report"]["location_label"], "-37.814°, 144.963°");

        let mut url = ptr::null_mut();
        assert_eq!(unsafe { sounding_plugin_analysis_url(plugin, &mut url) }, SoundingErrorCode::Ok);
        assert_eq!(
            unsafe { CStr::from_ptr(url) }.to_str().unwrap(),
            "http://localhost:7861?lat=-37.8136&lon=144.9631"
        );
        unsafe { sounding_string_free(url) };

        unsafe { sounding_plugin_destroy(plugin) };
    }

    #[test]
    fn bad_coordinate_shows_error_view() {
        let plugin = new_plugin(c"{\"simulated_latency_ms\": 0}");
        let mut outcome = SoundingLoadOutcome::Rendered;
        let code = unsafe { sounding_plugin_load_location(plugin, 91.0, 0.0, &mut outcome) };
        assert_eq!(code, SoundingErrorCode::Ok);
        assert_eq!(outcome, SoundingLoadOutcome::Failed);
        // reported through the panel, not the call result
        assert_eq!(sounding_get_last_error_code(), SoundingErrorCode::Ok);
        assert_eq!(panel_state(plugin).view, SoundingPanelView::Error);
        unsafe { sounding_plugin_destroy(plugin) };
    }

    #[test]
    fn events_and_toggle() {
        let plugin = new_plugin(c"{\"simulated_latency_ms\": 0, \"deployment\": \"host_module\"}");

        let mut handled = true;
        let code = unsafe {
            sounding_plugin_handle_event(
                plugin,
                c"{\"kind\": \"map_click\", \"payload\": {\"latlng\": {\"lat\": 1, \"lng\": 2}}}"
                    .as_ptr(),
                &mut handled,
                ptr::null_mut(),
            )
        };
        assert_eq!(code, SoundingErrorCode::Ok);
        assert!(!handled);

        let mut outcome = SoundingLoadOutcome::Failed;
        let code = unsafe {
            sounding_plugin_handle_event(
                plugin,
                c"{\"kind\": \"picker_moved\", \"payload\": {\"lat\": 1, \"lon\": 2}}".as_ptr(),
                &mut handled,
                &mut outcome,
            )
        };
        assert_eq!(code, SoundingErrorCode::Ok);
        assert!(handled);
        assert_eq!(outcome, SoundingLoadOutcome::Rendered);

        let mut is_open = true;
        assert_eq!(unsafe { sounding_plugin_toggle(plugin, &mut is_open) }, SoundingErrorCode::Ok);
        assert!(!is_open);
        unsafe { sounding_plugin_destroy(plugin) };
    }

    #[test]
    fn errors_are_reported() {
        let mut instance = ptr::null_mut();
        let code = unsafe {
            sounding_plugin_new(c"{\"colour\": 1}".as_ptr(), None, ptr::null_mut(), &mut instance)
        };
        assert_eq!(code, SoundingErrorCode::InvalidConfig);
        assert!(instance.is_null());
        assert_eq!(sounding_get_last_error_code(), SoundingErrorCode::InvalidConfig);

        assert_eq!(unsafe { sounding_plugin_open(ptr::null()) }, SoundingErrorCode::NullPointer);
        assert_eq!(
            unsafe { sounding_plugin_new(ptr::null(), None, ptr::null_mut(), ptr::null_mut()) },
            SoundingErrorCode::NullPointer
        );
    }

    #[test]
    fn classify_through_the_c_api() {
        let mut severity = SoundingSeverity::None;
        // CIN is rated on its magnitude
        assert_eq!(unsafe { sounding_classify(2, -120.0, &mut severity) }, SoundingErrorCode::Ok);
        assert_eq!(severity, SoundingSeverity::High);
        assert_eq!(
            unsafe { sounding_classify(14, 1.0, &mut severity) },
            SoundingErrorCode::InvalidParameter
        );

        assert_eq!(sounding_classify_thresholds(2.0, 1.0, 2.0, 3.0), SoundingSeverity::High);
        assert_eq!(sounding_classify_thresholds(f64::NAN, 1.0, 2.0, 3.0), SoundingSeverity::None);
    }

    struct Reentry {
        instance: *const SoundingInstance,
        nested: Option<SoundingErrorCode>,
    }

    unsafe extern "C" fn reenter(
        user_data: *mut std::os::raw::c_void,
        _request: *const crate::host::FfiProfileRequest,
        _out_levels: *mut crate::host::FfiLevel,
        _capacity: usize,
    ) -> isize {
        let reentry = user_data.cast::<Reentry>();
        let mut outcome = SoundingLoadOutcome::Rendered;
        let code =
            unsafe { sounding_plugin_load_location((*reentry).instance, 0.0, 0.0, &mut outcome) };
        unsafe { (*reentry).nested = Some(code) };
        -1
    }

    #[test]
    fn loads_from_inside_the_callback_are_rejected() {
        let reentry = Box::into_raw(Box::new(Reentry {
            instance: ptr::null(),
            nested: None,
        }));
        let mut plugin = ptr::null_mut();
        let code = unsafe {
            sounding_plugin_new(ptr::null(), Some(reenter), reentry.cast(), &mut plugin)
        };
        assert_eq!(code, SoundingErrorCode::Ok);
        unsafe { (*reentry).instance = plugin };

        for _ in 0..2 {
            let mut outcome = SoundingLoadOutcome::Rendered;
            let code = unsafe { sounding_plugin_load_location(plugin, -37.8, 144.9, &mut outcome) };
            assert_eq!(code, SoundingErrorCode::Ok);
            assert_eq!(outcome, SoundingLoadOutcome::Failed);
            assert_eq!(unsafe { (*reentry).nested }, Some(SoundingErrorCode::Reentrant));
            unsafe { (*reentry).nested = None };
        }

        unsafe { sounding_plugin_destroy(plugin) };
        drop(unsafe { Box::from_raw(reentry) });
    }
}
