use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use sounding_core::ConfigError;

/// Common interface for errors crossing the C boundary.
///
/// `code()` is what the caller gets back from the call; `msg()` is stored
/// for `sounding_get_last_error`.
pub(crate) trait SoundingError {
    /// Error code returned across the FFI boundary.
    fn code(&self) -> SoundingErrorCode;

    /// Human-readable error message.
    fn msg(&self) -> &str;
}

/// Error value used by every FFI entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSoundingError {
    code: SoundingErrorCode,
    msg: String,
}

impl DefaultSoundingError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - Name of the null parameter (e.g. `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SoundingErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// A string argument is not valid UTF-8.
    pub fn invalid_utf8(param_name: &str) -> Self {
        Self {
            code: SoundingErrorCode::InvalidUtf8,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Generic invalid argument.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: SoundingErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// The data the caller asked for does not exist yet.
    pub fn not_ready(what: &str) -> Self {
        Self {
            code: SoundingErrorCode::NotReady,
            msg: format!("No {what} available yet"),
        }
    }

    /// The async runtime backing an instance could not be started.
    pub fn runtime(err: &std::io::Error) -> Self {
        Self {
            code: SoundingErrorCode::RuntimeUnavailable,
            msg: format!("Failed to start runtime: {err}"),
        }
    }

    /// A blocking call was made while the same instance was already loading,
    /// i.e. from inside its profile callback.
    pub fn reentrant(operation: &str) -> Self {
        Self {
            code: SoundingErrorCode::Reentrant,
            msg: format!("Cannot call '{operation}' while a load is in progress on this instance"),
        }
    }

    /// Serializing a payload for the host failed.
    pub fn serialization(err: &serde_json::Error) -> Self {
        Self {
            code: SoundingErrorCode::InvalidParameter,
            msg: format!("Failed to serialize payload: {err}"),
        }
    }
}

impl From<ConfigError> for DefaultSoundingError {
    fn from(err: ConfigError) -> Self {
        Self {
            code: SoundingErrorCode::InvalidConfig,
            msg: err.to_string(),
        }
    }
}

impl SoundingError for DefaultSoundingError {
    fn code(&self) -> SoundingErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes. Standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundingErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid argument value.
    InvalidParameter = 2,

    /// Configuration JSON could not be parsed or holds unusable values.
    InvalidConfig = 3,

    /// A string argument is not valid UTF-8.
    InvalidUtf8 = 4,

    /// Requested data (parameters, analysis link) does not exist yet.
    NotReady = 5,

    /// The instance runtime could not be created.
    RuntimeUnavailable = 6,

    /// A load was started from inside the instance's own profile callback.
    Reentrant = 7,
}

impl From<DefaultSoundingError> for SoundingErrorCode {
    fn from(error: DefaultSoundingError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (message, code).
    /// The CString is kept here so the returned pointer stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, SoundingErrorCode)> = const { RefCell::new((None, SoundingErrorCode::Ok)) };
}

/// Read the thread-local last error.
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SoundingErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Mutate the thread-local last error.
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SoundingErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Most recent FFI error message as a null-terminated C string.
///
/// Returns null if no error has occurred on this thread. The pointer stays
/// valid until the next failing call on the same thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// SoundingInstance* plugin = nullptr;
/// if (sounding_plugin_new(config, nullptr, nullptr, &plugin) != SoundingErrorCode::Ok) {
///     const char* error = sounding_get_last_error();
///     if (error) {
///         printf("Plugin creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn sounding_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Most recent FFI error code, `Ok` if none.
#[no_mangle]
pub extern "C" fn sounding_get_last_error_code() -> SoundingErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
