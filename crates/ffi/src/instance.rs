use std::cell::Cell;
use std::future::Future;
use std::os::raw::{c_char, c_void};
use std::ptr;

use sounding_core::{PluginConfig, SoundingPlugin};
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::error::{DefaultSoundingError, SoundingErrorCode};
use crate::helpers::{handle_ffi_result_error, str_from_ptr, write_out};
use crate::host::{CallbackSource, SoundingProfileCallback};

/// One sounding overlay instance owned by the host.
///
/// # Thread Safety
/// Not thread-safe. Session state lives in a single-threaded cell, so every
/// call for one instance must come from the same thread (normally the UI
/// thread). Loads block that thread until the pipeline finishes, including
/// the simulated latency. Starting another load from inside the profile
/// callback fails with `SoundingErrorCode::Reentrant`.
///
/// # Usage
/// ```cpp
/// SoundingInstance* plugin = nullptr;
/// if (sounding_plugin_new("{\"simulated_latency_ms\": 0}", nullptr, nullptr, &plugin)
///         != SoundingErrorCode::Ok) {
///     fprintf(stderr, "%s\n", sounding_get_last_error());
///     return;
/// }
///
/// SoundingLoadOutcome outcome;
/// sounding_plugin_load_location(plugin, -37.8136, 144.9631, &outcome);
///
/// char* json = nullptr;
/// sounding_plugin_panel_json(plugin, &json);
/// render_panel(json);
/// sounding_string_free(json);
///
/// sounding_plugin_destroy(plugin);
/// ```
pub struct SoundingInstance {
    pub(crate) plugin: SoundingPlugin<CallbackSource>,
    /// Drives the async pipeline to completion for each blocking call.
    runtime: Runtime,
    loading: Cell<bool>,
}

impl SoundingInstance {
    /// Build an instance from an optional configuration document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an unusable document, `RuntimeUnavailable` if
    /// the runtime cannot start.
    pub(crate) fn new(
        config_json: Option<&str>,
        source: Option<CallbackSource>,
    ) -> Result<Box<Self>, DefaultSoundingError> {
        let config = match config_json {
            Some(json) => PluginConfig::from_json_str(json)?,
            None => PluginConfig::default(),
        };
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| DefaultSoundingError::runtime(&e))?;
        let has_source = source.is_some();
        let plugin = SoundingPlugin::build(config, source);
        info!(has_source, "sounding instance created");

        Ok(Box::new(Self {
            plugin,
            runtime,
            loading: Cell::new(false),
        }))
    }

    /// Run `future` to completion on the instance runtime.
    ///
    /// # Errors
    ///
    /// `Reentrant` if another blocking call on this instance is still
    /// running, which can only happen from inside the profile callback.
    pub(crate) fn block_on<F: Future>(
        &self,
        operation: &str,
        future: F,
    ) -> Result<F::Output, DefaultSoundingError> {
        if self.loading.replace(true) {
            return Err(DefaultSoundingError::reentrant(operation));
        }
        let output = self.runtime.block_on(future);
        self.loading.set(false);
        Ok(output)
    }
}

/// Create a plugin instance and return it via out-parameter.
///
/// Parameters
/// - `config_json`: JSON configuration document, or null for defaults.
/// - `profile_callback`: host sounding callback, or null to simulate every load.
/// - `user_data`: passed back to `profile_callback` untouched.
/// - `out_instance`: receives the instance on success, null on failure.
///
/// Returns
/// - `SoundingErrorCode::Ok` on success
/// - `SoundingErrorCode::NullPointer` if `out_instance` is null
/// - `SoundingErrorCode::InvalidUtf8` / `InvalidConfig` for a bad document
/// - `SoundingErrorCode::RuntimeUnavailable` if the runtime cannot start
///
/// # Safety
///
/// - `config_json` must be null or a valid null-terminated string.
/// - `out_instance` must be a valid pointer to writable memory.
/// - `user_data` must stay valid for as long as the callback may be invoked.
/// - The caller owns the instance and MUST call `sounding_plugin_destroy`
///   exactly once.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_new(
    config_json: *const c_char,
    profile_callback: SoundingProfileCallback,
    user_data: *mut c_void,
    out_instance: *mut *mut SoundingInstance,
) -> SoundingErrorCode {
    handle_ffi_result_error(|| {
        if out_instance.is_null() {
            return Err(DefaultSoundingError::null_pointer("out_instance"));
        }
        // SAFETY: checked non-null above
        unsafe { *out_instance = ptr::null_mut() };

        let config = if config_json.is_null() {
            None
        } else {
            // SAFETY: non-null string per the caller's contract
            Some(unsafe { str_from_ptr(config_json, "config_json") }?)
        };
        let source = CallbackSource::new(profile_callback, user_data);
        let instance = SoundingInstance::new(config, source)?;

        // SAFETY: checked non-null above
        unsafe { write_out(out_instance, Box::into_raw(instance), "out_instance") }
    })
}

/// Destroy an instance created by `sounding_plugin_new`. Null is a no-op.
///
/// # Safety
/// - `ptr` MUST have been created by `sounding_plugin_new` and not freed yet.
/// - The pointer must not be used after this call.
#[no_mangle]
pub unsafe extern "C" fn sounding_plugin_destroy(ptr: *mut SoundingInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `sounding_plugin_new`
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
