//! The fixed set of sounding parameters shown in the panel.
//!
//! Values are grouped the way they are derived: thermodynamic and kinematic
//! groups come straight from the profile, the composite group can only be
//! built from the two completed groups (see
//! [`CompositeIndices::derive`](crate::atmosphere::composite)).

use serde::{Deserialize, Serialize};

/// Instability and moisture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermodynamicParameters {
    /// Surface-based CAPE (J/kg), never negative
    pub cape: f64,
    /// Most-unstable CAPE (J/kg), never negative
    pub mucape: f64,
    /// Convective inhibition (J/kg), never positive
    pub cin: f64,
    /// Lifted condensation level (hPa)
    pub lcl: f64,
    /// Lifted index (°C)
    pub li: f64,
    /// Precipitable water (mm), never negative
    pub pwat: f64,
}

/// Wind shear and helicity parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicParameters {
    /// 0-1 km bulk shear (m/s)
    pub shear_0_1km: f64,
    /// 0-6 km bulk shear (m/s)
    pub shear_0_6km: f64,
    /// 0-1 km storm-relative helicity proxy (m²/s²)
    pub srh_0_1km: f64,
    /// 0-3 km storm-relative helicity proxy (m²/s²)
    pub srh_0_3km: f64,
}

/// Composite severe-weather indices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeIndices {
    /// Supercell composite parameter
    pub scp: f64,
    /// Significant tornado parameter
    pub stp: f64,
    /// Energy-helicity index
    pub ehi: f64,
    /// Significant hail parameter
    pub ship: f64,
}

/// Complete parameter set for one location.
///
/// Serializes flat, with exactly the fourteen parameter names as keys.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Thermodynamic group
    #[serde(flatten)]
    pub thermodynamic: ThermodynamicParameters,
    /// Kinematic group
    #[serde(flatten)]
    pub kinematic: KinematicParameters,
    /// Composite group
    #[serde(flatten)]
    pub composite: CompositeIndices,
}

impl ParameterSet {
    /// Value of a single parameter.
    pub fn get(&self, kind: ParameterKind) -> f64 {
        let t = &self.thermodynamic;
        let k = &self.kinematic;
        let c = &self.composite;
        match kind {
            ParameterKind::Cape => t.cape,
            ParameterKind::Mucape => t.mucape,
            ParameterKind::Cin => t.cin,
            ParameterKind::Lcl => t.lcl,
            ParameterKind::Li => t.li,
            ParameterKind::Pwat => t.pwat,
            ParameterKind::Shear0To1Km => k.shear_0_1km,
            ParameterKind::Shear0To6Km => k.shear_0_6km,
            ParameterKind::Srh0To1Km => k.srh_0_1km,
            ParameterKind::Srh0To3Km => k.srh_0_3km,
            ParameterKind::Scp => c.scp,
            ParameterKind::Stp => c.stp,
            ParameterKind::Ehi => c.ehi,
            ParameterKind::Ship => c.ship,
        }
    }

    /// All parameters in panel order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, f64)> + '_ {
        ParameterKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

/// Panel section a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterGroup {
    /// CAPE, MUCAPE, CIN, LCL, LI, PWAT
    Thermodynamic,
    /// Shear and SRH
    Kinematic,
    /// SCP, STP, EHI, SHIP
    Composite,
}

impl ParameterGroup {
    /// All groups in panel order
    pub const ALL: [ParameterGroup; 3] = [
        ParameterGroup::Thermodynamic,
        ParameterGroup::Kinematic,
        ParameterGroup::Composite,
    ];

    /// Section heading
    pub fn title(self) -> &'static str {
        match self {
            ParameterGroup::Thermodynamic => "Thermodynamic",
            ParameterGroup::Kinematic => "Kinematic",
            ParameterGroup::Composite => "Composite Indices",
        }
    }
}

/// Identifies one of the fourteen parameters.
///
/// The `u8` discriminants are stable and used across the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ParameterKind {
    /// CAPE
    Cape = 0,
    /// MUCAPE
    Mucape = 1,
    /// CIN
    Cin = 2,
    /// LCL
    Lcl = 3,
    /// Lifted index
    Li = 4,
    /// Precipitable water
    Pwat = 5,
    /// 0-1 km shear
    #[serde(rename = "shear_0_1km")]
    Shear0To1Km = 6,
    /// 0-6 km shear
    #[serde(rename = "shear_0_6km")]
    Shear0To6Km = 7,
    /// 0-1 km SRH
    #[serde(rename = "srh_0_1km")]
    Srh0To1Km = 8,
    /// 0-3 km SRH
    #[serde(rename = "srh_0_3km")]
    Srh0To3Km = 9,
    /// Supercell composite
    Scp = 10,
    /// Significant tornado
    Stp = 11,
    /// Energy-helicity index
    Ehi = 12,
    /// Significant hail
    Ship = 13,
}

impl ParameterKind {
    /// All parameters in panel order
    pub const ALL: [ParameterKind; 14] = [
        ParameterKind::Cape,
        ParameterKind::Mucape,
        ParameterKind::Cin,
        ParameterKind::Lcl,
        ParameterKind::Li,
        ParameterKind::Pwat,
        ParameterKind::Shear0To1Km,
        ParameterKind::Shear0To6Km,
        ParameterKind::Srh0To1Km,
        ParameterKind::Srh0To3Km,
        ParameterKind::Scp,
        ParameterKind::Stp,
        ParameterKind::Ehi,
        ParameterKind::Ship,
    ];

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Key used in serialized parameter sets
    pub fn key(self) -> &'static str {
        match self {
            ParameterKind::Cape => "cape",
            ParameterKind::Mucape => "mucape",
            ParameterKind::Cin => "cin",
            ParameterKind::Lcl => "lcl",
            ParameterKind::Li => "li",
            ParameterKind::Pwat => "pwat",
            ParameterKind::Shear0To1Km => "shear_0_1km",
            ParameterKind::Shear0To6Km => "shear_0_6km",
            ParameterKind::Srh0To1Km => "srh_0_1km",
            ParameterKind::Srh0To3Km => "srh_0_3km",
            ParameterKind::Scp => "scp",
            ParameterKind::Stp => "stp",
            ParameterKind::Ehi => "ehi",
            ParameterKind::Ship => "ship",
        }
    }

    /// Panel section this parameter is shown in
    pub fn group(self) -> ParameterGroup {
        match self {
            ParameterKind::Cape
            | ParameterKind::Mucape
            | ParameterKind::Cin
            | ParameterKind::Lcl
            | ParameterKind::Li
            | ParameterKind::Pwat => ParameterGroup::Thermodynamic,
            ParameterKind::Shear0To1Km
            | ParameterKind::Shear0To6Km
            | ParameterKind::Srh0To1Km
            | ParameterKind::Srh0To3Km => ParameterGroup::Kinematic,
            ParameterKind::Scp | ParameterKind::Stp | ParameterKind::Ehi | ParameterKind::Ship => {
                ParameterGroup::Composite
            }
        }
    }
}
