//! Thermodynamic parameters from the surface and lower levels of a sounding.
//!
//! These are quick-look approximations, not parcel-theory integrals. CAPE,
//! CIN and LCL are linear in surface temperature and dewpoint depression;
//! the lifted index compares the 500 hPa temperature with a surface-warmth
//! offset; precipitable water is a humidity-weighted pressure sum. The
//! arithmetic is fixed so panel output stays comparable across hosts.
//!
//! ```text
//! cape   = max(0, (T - 15)·100 - (T - Td)·50)
//! mucape = 1.15 · cape
//! cin    = -max(0, (T - Td)·10)
//! lcl    = P - (T - Td)·30
//! li     = T500 - (T - 20)
//! pwat   = Σ (RH_lower / 100) · |Δp| · 0.01
//! ```

use crate::core_types::{AtmosphericProfile, ThermodynamicParameters};

/// Surface temperature (°C) at which CAPE starts to accumulate.
const CAPE_BASE_TEMPERATURE: f64 = 15.0;

/// CAPE gained per °C of surface warmth above the base (J/kg per °C).
const CAPE_PER_DEGREE: f64 = 100.0;

/// CAPE lost per °C of dewpoint depression (J/kg per °C).
const CAPE_DRYNESS_PENALTY: f64 = 50.0;

/// Ratio of most-unstable to surface-based CAPE.
pub const MUCAPE_FACTOR: f64 = 1.15;

/// CIN per °C of dewpoint depression (J/kg per °C).
const CIN_PER_DEGREE: f64 = 10.0;

/// LCL pressure drop per °C of dewpoint depression (hPa per °C).
const LCL_HPA_PER_DEGREE: f64 = 30.0;

/// Pressure level used for the lifted index (hPa).
const LI_PRESSURE_LEVEL: f64 = 500.0;

/// 500 hPa temperature assumed when the profile never reaches 500 hPa (°C).
pub const LI_DEFAULT_500_TEMPERATURE: f64 = -10.0;

/// Surface temperature offset in the lifted index (°C).
const LI_SURFACE_OFFSET: f64 = 20.0;

/// Precipitable-water scale per hPa of layer depth.
const PWAT_SCALE: f64 = 0.01;

/// Derive the thermodynamic group from a profile.
///
/// Only the surface level, the first level at or above 500 hPa and the
/// level-to-level humidity/pressure pairs are consulted.
pub fn derive(profile: &AtmosphericProfile) -> ThermodynamicParameters {
    let surface = profile.surface();
    let temperature = *surface.temperature;
    let depression = surface.temperature.depression(surface.dewpoint);

    let cape = surface_cape(temperature, depression);
    let t500 = profile
        .first_at_or_below_pressure(LI_PRESSURE_LEVEL)
        .map_or(LI_DEFAULT_500_TEMPERATURE, |level| *level.temperature);

    ThermodynamicParameters {
        cape,
        mucape: cape * MUCAPE_FACTOR,
        cin: convective_inhibition(depression),
        lcl: *surface.pressure - depression * LCL_HPA_PER_DEGREE,
        li: t500 - (temperature - LI_SURFACE_OFFSET),
        pwat: precipitable_water(profile),
    }
}

/// Surface-based CAPE proxy (J/kg), clamped at zero.
///
/// # Arguments
///
/// * `temperature` - Surface temperature in °C
/// * `depression` - Surface dewpoint depression in °C
#[inline]
pub fn surface_cape(temperature: f64, depression: f64) -> f64 {
    let raw = (temperature - CAPE_BASE_TEMPERATURE) * CAPE_PER_DEGREE
        - depression * CAPE_DRYNESS_PENALTY;
    raw.max(0.0)
}

/// CIN proxy (J/kg). Zero or negative; a saturated or supersaturated surface
/// gives exactly `0.0`, never `-0.0`.
#[inline]
pub fn convective_inhibition(depression: f64) -> f64 {
    let inhibition = depression * CIN_PER_DEGREE;
    if inhibition > 0.0 {
        -inhibition
    } else {
        0.0
    }
}

/// Precipitable water proxy (mm) summed over adjacent level pairs, weighting
/// each layer by the relative humidity of its lower level.
pub fn precipitable_water(profile: &AtmosphericProfile) -> f64 {
    profile
        .levels()
        .windows(2)
        .map(|pair| {
            let (lower, upper) = (&pair[0], &pair[1]);
            let depth = (lower.pressure - upper.pressure).abs();
            lower.relative_humidity.to_fraction() * depth * PWAT_SCALE
        })
        .sum::<f64>()
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Level;
    use approx::assert_relative_eq;

    fn profile(levels: Vec<Level>) -> AtmosphericProfile {
        AtmosphericProfile::new(levels).unwrap()
    }

    /// Warm, moist surface over a 500 hPa level.
    fn warm_moist() -> AtmosphericProfile {
        profile(vec![
            Level::new(1000.0, 0.0, 30.0, 22.0, 80.0, 0.0, 0.0),
            Level::new(850.0, 1500.0, 20.0, 15.0, 70.0, 5.0, 5.0),
            Level::new(500.0, 5600.0, -12.0, -20.0, 40.0, 20.0, 10.0),
        ])
    }

    #[test]
    fn reference_arithmetic() {
        let t = derive(&warm_moist());
        // (30-15)*100 - 8*50 = 1100
        assert_relative_eq!(t.cape, 1100.0);
        assert_relative_eq!(t.mucape, 1265.0);
        assert_relative_eq!(t.cin, -80.0);
        // 1000 - 8*30
        assert_relative_eq!(t.lcl, 760.0);
        // -12 - (30-20)
        assert_relative_eq!(t.li, -22.0);
        // 0.8*150*0.01 + 0.7*350*0.01
        assert_relative_eq!(t.pwat, 1.2 + 2.45, epsilon = 1e-12);
    }

    #[test]
    fn cape_clamps_at_zero_for_cold_dry_surfaces() {
        assert_eq!(surface_cape(5.0, 10.0), 0.0);
        assert_eq!(surface_cape(15.0, 0.0), 0.0);
    }

    #[test]
    fn cin_is_never_positive() {
        for depression in [-5.0, 0.0, 0.1, 12.0, 40.0] {
            let cin = convective_inhibition(depression);
            assert!(cin <= 0.0);
            assert!(!cin.is_sign_negative() || cin < 0.0, "no negative zero");
        }
    }

    #[test]
    fn li_defaults_when_profile_stays_below_500_hpa() {
        let shallow = profile(vec![
            Level::new(1010.0, 0.0, 25.0, 20.0, 70.0, 0.0, 0.0),
            Level::new(700.0, 3000.0, 8.0, 0.0, 50.0, 0.0, 0.0),
        ]);
        let t = derive(&shallow);
        // -10 - (25-20)
        assert_relative_eq!(t.li, -15.0);
    }

    #[test]
    fn single_level_profile_has_no_pwat() {
        let single = profile(vec![Level::new(1000.0, 0.0, 20.0, 10.0, 60.0, 0.0, 0.0)]);
        assert_eq!(precipitable_water(&single), 0.0);
    }

    #[test]
    fn mucape_is_exactly_scaled_cape() {
        for (t, td) in [(35.0, 25.0), (18.0, 2.0), (-5.0, -10.0), (40.0, 39.5)] {
            let p = profile(vec![Level::new(1000.0, 0.0, t, td, 50.0, 0.0, 0.0)]);
            let thermo = derive(&p);
            assert!(thermo.cape >= 0.0);
            assert_eq!(thermo.mucape, thermo.cape * 1.15);
        }
    }
}
