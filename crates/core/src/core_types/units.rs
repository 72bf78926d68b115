//! Semantic unit types for sounding level fields
//!
//! Newtype wrappers keep the level record honest about what each column
//! holds (a dewpoint is not a pressure). All types wrap `f64` so the derived
//! parameters reproduce the reference arithmetic bit for bit.
//!
//! # Usage
//! ```
//! use sounding_core::core_types::units::{Celsius, Hectopascals};
//!
//! let t = Celsius::new(25.0);
//! let p = Hectopascals::new(1013.0);
//! assert_eq!(*t - 15.0, 10.0);
//! assert!(p > Hectopascals::new(500.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, Sub};

/// Declare a transparent `f64` unit newtype with total ordering.
macro_rules! unit_type {
    ($(#[$meta:meta])* $name:ident, $suffix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Wrap a raw value.
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name(value)
            }

            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        // NaN sorts above every finite value, same as f64::total_cmp
        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl Sub for $name {
            type Output = f64;
            #[inline]
            fn sub(self, rhs: Self) -> f64 {
                self.0 - rhs.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }
    };
}

unit_type!(
    /// Temperature (or dewpoint) in degrees Celsius
    Celsius,
    "°C"
);

unit_type!(
    /// Pressure in hectopascals
    Hectopascals,
    " hPa"
);

unit_type!(
    /// Height in meters
    Meters,
    " m"
);

unit_type!(
    /// Wind component in meters per second
    MetersPerSecond,
    " m/s"
);

unit_type!(
    /// Relative humidity in percent (0-100)
    Percent,
    "%"
);

impl Percent {
    /// Convert to fraction (0-1)
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> f64 {
        self.0 / 100.0
    }
}

impl Celsius {
    /// Dewpoint depression `self - dewpoint`, in °C
    #[inline]
    #[must_use]
    pub fn depression(self, dewpoint: Celsius) -> f64 {
        self - dewpoint
    }
}
