//! C ABI for embedding the sounding overlay in a host application.
//!
//! Every entry point returns a [`SoundingErrorCode`] (0 = success) and
//! records a message retrievable with [`sounding_get_last_error`]. Instances
//! are opaque pointers created by [`sounding_plugin_new`] and must be used
//! from a single thread. The header is generated by `cbindgen` at build time.

mod error;
mod helpers;
mod host;
mod instance;
mod queries;

pub use error::{sounding_get_last_error, sounding_get_last_error_code, SoundingErrorCode};
pub use host::{FfiLevel, FfiProfileRequest, SoundingProfileCallback, SOUNDING_MAX_LEVELS};
pub use instance::{sounding_plugin_destroy, sounding_plugin_new, SoundingInstance};
pub use queries::{
    sounding_classify, sounding_classify_thresholds, sounding_plugin_analysis_url,
    sounding_plugin_close, sounding_plugin_get_parameters, sounding_plugin_handle_event,
    sounding_plugin_load_location, sounding_plugin_open, sounding_plugin_panel_json,
    sounding_plugin_panel_state, sounding_plugin_set_forecast, sounding_plugin_toggle,
    sounding_string_free, SoundingLoadOutcome, SoundingPanelState, SoundingPanelView,
    SoundingParameters, SoundingSeverity,
};
