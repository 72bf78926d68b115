//! Host-supplied soundings through a C callback.

use std::ffi::CString;
use std::os::raw::{c_char, c_void};

use sounding_core::{AtmosphericProfile, FetchError, Level, ProfileRequest, ProfileSource};

/// Maximum number of levels a host callback may return.
pub const SOUNDING_MAX_LEVELS: usize = 256;

/// C-compatible sounding level.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FfiLevel {
    /// Pressure (hPa)
    pub pressure: f64,
    /// Height (m)
    pub height: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Dewpoint (°C)
    pub dewpoint: f64,
    /// Relative humidity (%)
    pub relative_humidity: f64,
    /// Zonal wind (m/s)
    pub u: f64,
    /// Meridional wind (m/s)
    pub v: f64,
}

impl From<FfiLevel> for Level {
    fn from(l: FfiLevel) -> Self {
        Level::new(
            l.pressure,
            l.height,
            l.temperature,
            l.dewpoint,
            l.relative_humidity,
            l.u,
            l.v,
        )
    }
}

/// Request passed to the host callback.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiProfileRequest {
    /// Latitude (°)
    pub latitude: f64,
    /// Longitude (°)
    pub longitude: f64,
    /// Forecast model identifier, valid for the duration of the callback
    pub model: *const c_char,
    /// Forecast valid time (ms since epoch); ignore when `has_timestamp` is false
    pub timestamp_ms: i64,
    /// Whether `timestamp_ms` is set
    pub has_timestamp: bool,
}

/// Host profile callback.
///
/// Writes up to `capacity` levels (surface first) into `out_levels` and
/// returns how many were written. A negative return means the host data
/// service could not answer.
///
/// The callback runs inside `sounding_plugin_load_location` or
/// `sounding_plugin_handle_event`. Calling either of those on the same
/// instance from the callback returns `SoundingErrorCode::Reentrant`.
pub type SoundingProfileCallback = Option<
    unsafe extern "C" fn(
        user_data: *mut c_void,
        request: *const FfiProfileRequest,
        out_levels: *mut FfiLevel,
        capacity: usize,
    ) -> isize,
>;

/// [`ProfileSource`] calling back into the host.
#[derive(Debug)]
pub(crate) struct CallbackSource {
    callback: unsafe extern "C" fn(*mut c_void, *const FfiProfileRequest, *mut FfiLevel, usize) -> isize,
    user_data: *mut c_void,
}

impl CallbackSource {
    /// `None` when the host passed no callback.
    pub(crate) fn new(callback: SoundingProfileCallback, user_data: *mut c_void) -> Option<Self> {
        callback.map(|callback| Self {
            callback,
            user_data,
        })
    }

    fn call(&self, request: &ProfileRequest) -> Result<AtmosphericProfile, FetchError> {
        let model = CString::new(request.forecast.model.as_str())
            .map_err(|_| FetchError::Unreachable("model name contains a NUL byte".into()))?;
        let ffi_request = FfiProfileRequest {
            latitude: request.coordinate.latitude(),
            longitude: request.coordinate.longitude(),
            model: model.as_ptr(),
            timestamp_ms: request.forecast.timestamp_ms.unwrap_or(0),
            has_timestamp: request.forecast.timestamp_ms.is_some(),
        };
        let mut buffer = vec![FfiLevel::default(); SOUNDING_MAX_LEVELS];

        // SAFETY: request and buffer outlive the call; capacity matches the buffer
        let written = unsafe {
            (self.callback)(
                self.user_data,
                &ffi_request,
                buffer.as_mut_ptr(),
                buffer.len(),
            )
        };

        let count = usize::try_from(written).map_err(|_| {
            FetchError::Unreachable(format!("host profile service returned {written}"))
        })?;
        if count > buffer.len() {
            return Err(FetchError::Unreachable(format!(
                "host returned {count} levels, capacity is {}",
                buffer.len()
            )));
        }
        buffer.truncate(count);

        AtmosphericProfile::new(buffer.into_iter().map(Level::from).collect())
            .map_err(FetchError::from)
    }
}

impl ProfileSource for CallbackSource {
    async fn fetch_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<AtmosphericProfile, FetchError> {
        self.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sounding_core::{Coordinate, ForecastSelection, ProfileError};

    unsafe extern "C" fn two_levels(
        _user_data: *mut c_void,
        request: *const FfiProfileRequest,
        out_levels: *mut FfiLevel,
        capacity: usize,
    ) -> isize {
        assert!(capacity >= 2);
        let request = unsafe { &*request };
        let levels = [
            FfiLevel {
                pressure: 1000.0,
                height: 0.0,
                temperature: 25.0 + request.latitude.abs() / 100.0,
                dewpoint: 18.0,
                relative_humidity: 70.0,
                u: 0.0,
                v: 0.0,
            },
            FfiLevel {
                pressure: 500.0,
                height: 5800.0,
                temperature: -12.0,
                dewpoint: -25.0,
                relative_humidity: 30.0,
                u: 20.0,
                v: 0.0,
            },
        ];
        for (i, level) in levels.into_iter().enumerate() {
            unsafe { out_levels.add(i).write(level) };
        }
        2
    }

    unsafe extern "C" fn unreachable(
        _user_data: *mut c_void,
        _request: *const FfiProfileRequest,
        _out_levels: *mut FfiLevel,
        _capacity: usize,
    ) -> isize {
        -1
    }

    unsafe extern "C" fn empty(
        _user_data: *mut c_void,
        _request: *const FfiProfileRequest,
        _out_levels: *mut FfiLevel,
        _capacity: usize,
    ) -> isize {
        0
    }

    fn request() -> ProfileRequest {
        ProfileRequest {
            coordinate: Coordinate::new(-37.8136, 144.9631).unwrap(),
            forecast: ForecastSelection::current("ecmwf"),
        }
    }

    #[test]
    fn missing_callback_means_no_source() {
        assert!(CallbackSource::new(None, std::ptr::null_mut()).is_none());
    }

    #[test]
    fn callback_levels_become_a_profile() {
        let source = CallbackSource::new(Some(two_levels), std::ptr::null_mut()).unwrap();
        let profile = source.call(&request()).unwrap();
        assert_eq!(profile.levels().len(), 2);
        assert_eq!(*profile.surface().pressure, 1000.0);
    }

    #[test]
    fn negative_return_is_unreachable() {
        let source = CallbackSource::new(Some(unreachable), std::ptr::null_mut()).unwrap();
        assert!(matches!(source.call(&request()), Err(FetchError::Unreachable(_))));
    }

    #[test]
    fn zero_levels_is_malformed() {
        let source = CallbackSource::new(Some(empty), std::ptr::null_mut()).unwrap();
        assert_eq!(
            source.call(&request()).unwrap_err(),
            FetchError::Malformed(ProfileError::Empty)
        );
    }
}
