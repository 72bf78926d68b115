use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::{with_last_error_mut, DefaultSoundingError, SoundingError, SoundingErrorCode};
use crate::instance::SoundingInstance;

/// Record `error` in thread-local storage.
pub(crate) fn set_last_error(error: &impl SoundingError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record `error` and return its code.
#[inline]
pub(crate) fn track_error(error: &impl SoundingError) -> SoundingErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, passing successes through.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultSoundingError>,
) -> Result<T, SoundingErrorCode> {
    result.map_err(|e| track_error(&e))
}

/// Clear the thread-local error. Called on success.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SoundingErrorCode::Ok;
    });
}

/// Run an FFI body, mapping its result to an error code and keeping the
/// thread-local error in sync.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> SoundingErrorCode
where
    F: FnOnce() -> Result<(), DefaultSoundingError>,
{
    match track_result(f()) {
        Ok(()) => {
            clear_last_error();
            SoundingErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Borrow an instance from a caller pointer.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `sounding_plugin_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const SoundingInstance,
) -> Result<&'a SoundingInstance, DefaultSoundingError> {
    // SAFETY: null checked by `as_ref`; liveness is the caller's contract
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultSoundingError::null_pointer("ptr"))
}

/// Borrow a UTF-8 string argument.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives `'a`.
pub(crate) unsafe fn str_from_ptr<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultSoundingError> {
    if ptr.is_null() {
        return Err(DefaultSoundingError::null_pointer(param_name));
    }
    // SAFETY: non-null and null-terminated per the caller's contract
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| DefaultSoundingError::invalid_utf8(param_name))
}

/// Hand an owned string to the caller; free it with `sounding_string_free`.
pub(crate) fn into_c_string(text: String) -> Result<*mut c_char, DefaultSoundingError> {
    CString::new(text)
        .map(CString::into_raw)
        .map_err(|_| DefaultSoundingError::invalid_parameter("string contains a NUL byte".into()))
}

/// Write `value` through an out-pointer.
///
/// # Safety
/// `out` must be null or valid for writes.
pub(crate) unsafe fn write_out<T>(
    out: *mut T,
    value: T,
    param_name: &str,
) -> Result<(), DefaultSoundingError> {
    if out.is_null() {
        return Err(DefaultSoundingError::null_pointer(param_name));
    }
    // SAFETY: non-null and writable per the caller's contract
    unsafe { out.write(value) };
    Ok(())
}
