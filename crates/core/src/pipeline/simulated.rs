//! Simulated parameter sets for hosts without a profile service.
//!
//! Values are uniform random draws inside fixed ranges, scaled by a coarse
//! climate factor: 1.2 inside the tropics (|lat| < 30°), 0.8 elsewhere. They
//! look plausible on a panel and carry no meteorological information; the
//! composite indices are drawn independently, not derived.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

use crate::core_types::{
    CompositeIndices, Coordinate, KinematicParameters, ParameterSet, ThermodynamicParameters,
};

/// Climate factor inside the tropical band.
pub const TROPICAL_FACTOR: f64 = 1.2;

/// Climate factor outside the tropical band.
pub const EXTRATROPICAL_FACTOR: f64 = 0.8;

/// Random parameter generator.
///
/// Holds its own RNG so a seeded simulator replays the same sequence.
/// Interior mutability keeps sampling available through `&self` on the
/// single UI thread that owns the plugin.
#[derive(Debug)]
pub struct Simulator {
    rng: RefCell<StdRng>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl Simulator {
    /// Simulator seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible simulator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Climate factor for a location
    pub fn climate_factor(coordinate: Coordinate) -> f64 {
        if coordinate.is_tropical() {
            TROPICAL_FACTOR
        } else {
            EXTRATROPICAL_FACTOR
        }
    }

    /// Draw a parameter set for `coordinate`.
    ///
    /// Ranges (U uniform in [0, 1), f the climate factor):
    ///
    /// | parameter | value |
    /// |---|---|
    /// | cape | ⌊U·3000·f⌋ |
    /// | mucape | ⌊U·3500·f⌋ |
    /// | cin | -⌊U·150⌋ |
    /// | lcl | 800 + ⌊U·200⌋ |
    /// | li | -U·8 |
    /// | pwat | ⌊U·60·f⌋ |
    /// | shear 0-1 / 0-6 km | U·25 / U·40 |
    /// | srh 0-1 / 0-3 km | ⌊U·400⌋ / ⌊U·500⌋ |
    /// | scp, stp, ehi, ship | U·8, U·4, U·5, U·2.5 |
    pub fn sample(&self, coordinate: Coordinate) -> ParameterSet {
        let f = Self::climate_factor(coordinate);
        let mut rng = self.rng.borrow_mut();
        let mut unit = || rng.random::<f64>();

        let thermodynamic = ThermodynamicParameters {
            cape: (unit() * 3000.0 * f).floor(),
            mucape: (unit() * 3500.0 * f).floor(),
            cin: 0.0 - (unit() * 150.0).floor(),
            lcl: 800.0 + (unit() * 200.0).floor(),
            li: -unit() * 8.0,
            pwat: (unit() * 60.0 * f).floor(),
        };
        let kinematic = KinematicParameters {
            shear_0_1km: unit() * 25.0,
            shear_0_6km: unit() * 40.0,
            srh_0_1km: (unit() * 400.0).floor(),
            srh_0_3km: (unit() * 500.0).floor(),
        };
        let composite = CompositeIndices {
            scp: unit() * 8.0,
            stp: unit() * 4.0,
            ehi: unit() * 5.0,
            ship: unit() * 2.5,
        };

        ParameterSet {
            thermodynamic,
            kinematic,
            composite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn climate_factor_by_latitude() {
        assert_eq!(Simulator::climate_factor(coord(10.0, 0.0)), 1.2);
        assert_eq!(Simulator::climate_factor(coord(-45.0, 0.0)), 0.8);
    }

    #[test]
    fn samples_stay_in_bounds() {
        let sim = Simulator::seeded(7);
        for (lat, lon) in [(5.0, 100.0), (-37.8136, 144.9631), (60.0, -20.0)] {
            let c = coord(lat, lon);
            let f = Simulator::climate_factor(c);
            for _ in 0..500 {
                let p = sim.sample(c);
                let t = p.thermodynamic;
                assert!((0.0..=3600.0).contains(&t.cape));
                assert!(t.cape < 3000.0 * f);
                assert!(t.mucape >= 0.0 && t.mucape < 3500.0 * f);
                assert!((-150.0..=0.0).contains(&t.cin));
                assert!((800.0..1000.0).contains(&t.lcl));
                assert!(t.li <= 0.0 && t.li > -8.0);
                assert!(t.pwat >= 0.0 && t.pwat < 60.0 * f);
                assert!((0.0..25.0).contains(&p.kinematic.shear_0_1km));
                assert!((0.0..40.0).contains(&p.kinematic.shear_0_6km));
                assert!((0.0..400.0).contains(&p.kinematic.srh_0_1km));
                assert!((0.0..500.0).contains(&p.kinematic.srh_0_3km));
                assert!((0.0..8.0).contains(&p.composite.scp));
                assert!((0.0..2.5).contains(&p.composite.ship));
            }
        }
    }

    #[test]
    fn seeded_simulators_replay() {
        let c = coord(35.4676, -97.5164);
        let a = Simulator::seeded(42);
        let b = Simulator::seeded(42);
        assert_eq!(a.sample(c), b.sample(c));
        assert_eq!(a.sample(c), b.sample(c));
    }

    #[test]
    fn floored_values_are_whole_numbers() {
        let sim = Simulator::seeded(3);
        let p = sim.sample(coord(0.0, 0.0));
        assert_eq!(p.thermodynamic.cape.fract(), 0.0);
        assert_eq!(p.thermodynamic.cin.fract(), 0.0);
        assert_eq!(p.kinematic.srh_0_3km.fract(), 0.0);
    }
}
