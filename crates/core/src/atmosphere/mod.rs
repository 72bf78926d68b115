//! Sounding parameter derivation.
//!
//! Turns an [`AtmosphericProfile`] into the fourteen panel parameters in
//! three stages:
//! - Thermodynamic: CAPE, MUCAPE, CIN, LCL, LI, PWAT from the surface and
//!   lower levels
//! - Kinematic: 0-1 km and 0-6 km bulk shear, 0-1 km and 0-3 km helicity proxy
//! - Composite: SCP, STP, EHI, SHIP from the two completed groups
//!
//! All formulas are quick-look approximations kept for output compatibility
//! with existing panels. They are not parcel-theory or hodograph integrals
//! and should not be read as physically authoritative.
//!
//! # References
//!
//! - Thompson, R.L. et al. (2003). "Close proximity soundings within supercell
//!   environments obtained from the Rapid Update Cycle." Weather and Forecasting.
//!   (definitions of the composite indices being approximated)

pub mod composite;
pub mod kinematic;
pub mod thermodynamic;

use tracing::debug;

use crate::core_types::{AtmosphericProfile, CompositeIndices, ParameterSet};

pub use kinematic::HeightBand;

/// Derive the full parameter set from a validated profile.
///
/// Pure function of the profile: the same profile always yields the same set.
pub fn derive_parameters(profile: &AtmosphericProfile) -> ParameterSet {
    let thermodynamic = thermodynamic::derive(profile);
    let kinematic = kinematic::derive(profile);
    let composite = CompositeIndices::derive(&thermodynamic, &kinematic);

    debug!(
        levels = profile.levels().len(),
        cape = thermodynamic.cape,
        shear_0_6km = kinematic.shear_0_6km,
        scp = composite.scp,
        stp = composite.stp,
        "derived sounding parameters"
    );

    ParameterSet {
        thermodynamic,
        kinematic,
        composite,
    }
}
