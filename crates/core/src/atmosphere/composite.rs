//! Composite severe-weather indices.
//!
//! Each index multiplies normalized thermodynamic and kinematic terms. The
//! inputs are the completed thermodynamic and kinematic groups, so a
//! composite can never be computed from a partially derived set.
//!
//! ```text
//! SCP  = (MUCAPE/1000) · (SRH₀₋₃/50) · (Shear₀₋₆/20)
//! STP  = (CAPE/1500) · (SRH₀₋₁/150) · (Shear₀₋₆/20) · max(0, (2000 - LCL)/1000)
//! EHI  = CAPE · SRH₀₋₃ / 160000
//! SHIP = MUCAPE · Shear₀₋₆ / 50000
//! ```
//!
//! The STP LCL term is fed the LCL pressure (hPa), so for realistic soundings
//! it sits near 1.0-1.2 instead of acting as a height cutoff. That is part
//! of the reference arithmetic and is reproduced as is.

use crate::core_types::{CompositeIndices, KinematicParameters, ThermodynamicParameters};

impl CompositeIndices {
    /// Combine completed thermodynamic and kinematic groups.
    pub fn derive(thermo: &ThermodynamicParameters, kinematic: &KinematicParameters) -> Self {
        Self {
            scp: supercell_composite(thermo.mucape, kinematic.srh_0_3km, kinematic.shear_0_6km),
            stp: significant_tornado(
                thermo.cape,
                kinematic.srh_0_1km,
                kinematic.shear_0_6km,
                thermo.lcl,
            ),
            ehi: energy_helicity(thermo.cape, kinematic.srh_0_3km),
            ship: significant_hail(thermo.mucape, kinematic.shear_0_6km),
        }
    }
}

/// Supercell composite parameter
#[inline]
pub fn supercell_composite(mucape: f64, srh_0_3km: f64, shear_0_6km: f64) -> f64 {
    (mucape / 1000.0) * (srh_0_3km / 50.0) * (shear_0_6km / 20.0)
}

/// Significant tornado parameter
#[inline]
pub fn significant_tornado(cape: f64, srh_0_1km: f64, shear_0_6km: f64, lcl: f64) -> f64 {
    let lcl_term = ((2000.0 - lcl) / 1000.0).max(0.0);
    (cape / 1500.0) * (srh_0_1km / 150.0) * (shear_0_6km / 20.0) * lcl_term
}

/// Energy-helicity index
#[inline]
pub fn energy_helicity(cape: f64, srh_0_3km: f64) -> f64 {
    (cape * srh_0_3km) / 160_000.0
}

/// Significant hail parameter
#[inline]
pub fn significant_hail(mucape: f64, shear_0_6km: f64) -> f64 {
    (mucape * shear_0_6km) / 50_000.0
}
