//! Bulk shear and a helicity proxy over fixed height bands.
//!
//! For a band `[h0, h1]` the start level is the first level at or above
//! `h0` and the end level the first at or above `h1`. Bulk shear is the
//! magnitude of the vector wind difference between them. The "SRH" value is
//! `shear² · 10`, a rough stand-in for storm-relative helicity that needs no
//! storm-motion estimate. A band the profile cannot cover yields `0.0`.

use crate::core_types::{AtmosphericProfile, KinematicParameters};

/// Scale applied to squared shear to produce the helicity proxy.
const SRH_PER_SHEAR_SQUARED: f64 = 10.0;

/// A vertical layer between two heights (m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    /// Bottom of the band (m)
    pub bottom: f64,
    /// Top of the band (m)
    pub top: f64,
}

impl HeightBand {
    /// Surface to 1 km
    pub const LOWEST_1KM: HeightBand = HeightBand::new(0.0, 1000.0);
    /// Surface to 3 km
    pub const LOWEST_3KM: HeightBand = HeightBand::new(0.0, 3000.0);
    /// Surface to 6 km
    pub const LOWEST_6KM: HeightBand = HeightBand::new(0.0, 6000.0);

    /// Create a band
    pub const fn new(bottom: f64, top: f64) -> Self {
        Self { bottom, top }
    }
}

/// Derive the kinematic group from a profile.
pub fn derive(profile: &AtmosphericProfile) -> KinematicParameters {
    let shear_0_1km = bulk_shear(profile, HeightBand::LOWEST_1KM);
    let shear_0_3km = bulk_shear(profile, HeightBand::LOWEST_3KM);
    let shear_0_6km = bulk_shear(profile, HeightBand::LOWEST_6KM);

    KinematicParameters {
        shear_0_1km,
        shear_0_6km,
        srh_0_1km: helicity_proxy(shear_0_1km),
        srh_0_3km: helicity_proxy(shear_0_3km),
    }
}

/// Bulk wind difference magnitude across `band` (m/s), `0.0` when either
/// boundary level is missing.
pub fn bulk_shear(profile: &AtmosphericProfile, band: HeightBand) -> f64 {
    let start = profile.first_at_or_above_height(band.bottom);
    let end = profile.first_at_or_above_height(band.top);
    match (start, end) {
        (Some(start), Some(end)) => (end.wind() - start.wind()).norm(),
        _ => 0.0,
    }
}

/// Storm-relative helicity proxy (m²/s²) from bulk shear.
#[inline]
pub fn helicity_proxy(shear: f64) -> f64 {
    shear * shear * SRH_PER_SHEAR_SQUARED
}
