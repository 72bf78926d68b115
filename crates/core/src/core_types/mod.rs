//! Core types and utilities

pub mod coordinate;
pub mod parameters;
pub mod profile;
pub mod units;

pub use coordinate::Coordinate;
pub use parameters::{
    CompositeIndices, KinematicParameters, ParameterGroup, ParameterKind, ParameterSet,
    ThermodynamicParameters,
};
pub use profile::{AtmosphericProfile, Level};
pub use units::*;
