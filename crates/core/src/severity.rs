//! Severity classification against fixed per-parameter thresholds.
//!
//! Every parameter carries an ascending-by-tier threshold triple
//! `[moderate, high, extreme]`. A value is checked from the top tier down:
//!
//! ```text
//! value >= t[2] -> extreme
//! value >= t[1] -> high
//! value >= t[0] -> moderate
//! otherwise     -> low
//! missing / NaN -> none
//! ```
//!
//! LCL is listed with a descending triple (900, 850, 800 hPa). Because the
//! extreme tier is tested first, every LCL at or above 800 hPa rates extreme
//! and anything lower rates low. Panels built on this table have always
//! behaved that way, so the triple is kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core_types::{ParameterKind, ParameterSet};

/// Severity tier. Ordered from `None` (lowest) to `Extreme` (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Severity {
    /// No usable value
    None = 0,
    /// Below the moderate threshold
    Low = 1,
    /// At or above the moderate threshold
    Moderate = 2,
    /// At or above the high threshold
    High = 3,
    /// At or above the extreme threshold
    Extreme = 4,
}

impl Severity {
    /// Style class name the panel uses for a card of this tier.
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::None => "severity-none",
            Severity::Low => "severity-low",
            Severity::Moderate => "severity-moderate",
            Severity::High => "severity-high",
            Severity::Extreme => "severity-extreme",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Extreme => "extreme",
        };
        f.write_str(name)
    }
}

/// Threshold triple `[moderate, high, extreme]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thresholds(pub [f64; 3]);

impl Thresholds {
    /// Build a triple
    pub const fn new(moderate: f64, high: f64, extreme: f64) -> Self {
        Thresholds([moderate, high, extreme])
    }
}

/// Classify a value against a threshold triple.
///
/// `None` and NaN both map to [`Severity::None`], whatever the thresholds.
///
/// ```
/// use sounding_core::severity::{classify, Severity, Thresholds};
///
/// let cape = Thresholds::new(1000.0, 2500.0, 4000.0);
/// assert_eq!(classify(Some(999.0), cape), Severity::Low);
/// assert_eq!(classify(Some(1000.0), cape), Severity::Moderate);
/// assert_eq!(classify(Some(4000.0), cape), Severity::Extreme);
/// assert_eq!(classify(None, cape), Severity::None);
/// ```
pub fn classify(value: Option<f64>, thresholds: Thresholds) -> Severity {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return Severity::None;
    };
    let [moderate, high, extreme] = thresholds.0;
    if value >= extreme {
        Severity::Extreme
    } else if value >= high {
        Severity::High
    } else if value >= moderate {
        Severity::Moderate
    } else {
        Severity::Low
    }
}

/// How a raw value is turned into the displayed (and classified) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    /// Use the value as is
    Signed,
    /// Use the absolute value (CIN, LI)
    Absolute,
}

/// Static panel metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    /// Which parameter
    pub kind: ParameterKind,
    /// Card label
    pub label: &'static str,
    /// Unit suffix, empty for dimensionless indices
    pub unit: &'static str,
    /// Severity thresholds
    pub thresholds: Thresholds,
    /// Sign handling before display/classification
    pub magnitude: Magnitude,
    /// Fixed decimal places, or `None` for the shortest exact representation
    pub decimals: Option<u8>,
}

impl ParameterDescriptor {
    /// Value as displayed: sign handling then rounding to `decimals`.
    ///
    /// Classification runs on this value, not the raw one, so a card never
    /// shows `5.96` rated differently from `6.0`. Ties round up (away from
    /// zero), so `0.125` shows as `0.13`.
    pub fn display_value(&self, raw: f64) -> f64 {
        let value = match self.magnitude {
            Magnitude::Signed => raw,
            Magnitude::Absolute => raw.abs(),
        };
        match self.decimals {
            Some(places) => round_half_up(value, places),
            None => value,
        }
    }

    /// Display text for a raw value.
    pub fn format_value(&self, raw: f64) -> String {
        let value = self.display_value(raw);
        match self.decimals {
            Some(places) => format!("{value:.prec$}", prec = usize::from(places)),
            None => format!("{value}"),
        }
    }

    /// Severity of a raw value.
    pub fn classify(&self, raw: f64) -> Severity {
        classify(Some(self.display_value(raw)), self.thresholds)
    }
}

/// Panel metadata for every parameter, in panel order.
pub const PARAMETER_TABLE: [ParameterDescriptor; 14] = [
    descriptor(ParameterKind::Cape, "CAPE", "J/kg", [1000.0, 2500.0, 4000.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Mucape, "MUCAPE", "J/kg", [1000.0, 2500.0, 4000.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Cin, "CIN", "J/kg", [50.0, 100.0, 200.0], Magnitude::Absolute, None),
    descriptor(ParameterKind::Lcl, "LCL", "hPa", [900.0, 850.0, 800.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Li, "LI", "°C", [3.0, 6.0, 8.0], Magnitude::Absolute, Some(1)),
    descriptor(ParameterKind::Pwat, "PWAT", "mm", [30.0, 45.0, 60.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Shear0To1Km, "0-1km Shear", "m/s", [10.0, 15.0, 20.0], Magnitude::Signed, Some(1)),
    descriptor(ParameterKind::Shear0To6Km, "0-6km Shear", "m/s", [15.0, 25.0, 35.0], Magnitude::Signed, Some(1)),
    descriptor(ParameterKind::Srh0To1Km, "0-1km SRH", "m²/s²", [100.0, 200.0, 300.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Srh0To3Km, "0-3km SRH", "m²/s²", [150.0, 300.0, 450.0], Magnitude::Signed, None),
    descriptor(ParameterKind::Scp, "SCP", "", [1.0, 4.0, 10.0], Magnitude::Signed, Some(2)),
    descriptor(ParameterKind::Stp, "STP", "", [1.0, 2.0, 4.0], Magnitude::Signed, Some(2)),
    descriptor(ParameterKind::Ehi, "EHI", "", [1.0, 2.0, 4.0], Magnitude::Signed, Some(2)),
    descriptor(ParameterKind::Ship, "SHIP", "", [0.5, 1.0, 2.0], Magnitude::Signed, Some(2)),
];

fn round_half_up(value: f64, places: u8) -> f64 {
    let scale = 10f64.powi(i32::from(places));
    let scaled = (value * scale).round() / scale;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}

const fn descriptor(
    kind: ParameterKind,
    label: &'static str,
    unit: &'static str,
    thresholds: [f64; 3],
    magnitude: Magnitude,
    decimals: Option<u8>,
) -> ParameterDescriptor {
    ParameterDescriptor {
        kind,
        label,
        unit,
        thresholds: Thresholds(thresholds),
        magnitude,
        decimals,
    }
}

impl ParameterKind {
    /// Panel metadata for this parameter
    pub fn descriptor(self) -> &'static ParameterDescriptor {
        // Table is in discriminant order
        &PARAMETER_TABLE[self as usize]
    }

    /// Severity thresholds for this parameter
    pub fn thresholds(self) -> Thresholds {
        self.descriptor().thresholds
    }
}

/// Supercell potential headline, driven by SCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupercellPotential {
    /// SCP below 1
    Low,
    /// SCP at least 1
    Moderate,
    /// SCP at least 4
    Extreme,
}

/// Tornado potential headline, driven by STP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TornadoPotential {
    /// STP below 1
    Low,
    /// STP at least 1
    Moderate,
    /// STP at least 2
    Significant,
}

/// Headline ratings shown above the parameter cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    /// Supercell potential
    pub supercells: SupercellPotential,
    /// Tornado potential
    pub tornadoes: TornadoPotential,
}

impl Headline {
    /// Rate a parameter set.
    pub fn rate(parameters: &ParameterSet) -> Self {
        let scp = parameters.composite.scp;
        let stp = parameters.composite.stp;

        let supercells = if scp >= 4.0 {
            SupercellPotential::Extreme
        } else if scp >= 1.0 {
            SupercellPotential::Moderate
        } else {
            SupercellPotential::Low
        };
        let tornadoes = if stp >= 2.0 {
            TornadoPotential::Significant
        } else if stp >= 1.0 {
            TornadoPotential::Moderate
        } else {
            TornadoPotential::Low
        };

        Self {
            supercells,
            tornadoes,
        }
    }
}

impl fmt::Display for SupercellPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupercellPotential::Low => "LOW",
            SupercellPotential::Moderate => "MODERATE",
            SupercellPotential::Extreme => "EXTREME",
        })
    }
}

impl fmt::Display for TornadoPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TornadoPotential::Low => "LOW",
            TornadoPotential::Moderate => "MODERATE",
            TornadoPotential::Significant => "SIGNIFICANT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CompositeIndices;

    const CAPE: Thresholds = Thresholds::new(1000.0, 2500.0, 4000.0);

    #[test]
    fn documented_cape_boundaries() {
        assert_eq!(classify(Some(999.0), CAPE), Severity::Low);
        assert_eq!(classify(Some(1000.0), CAPE), Severity::Moderate);
        assert_eq!(classify(Some(2500.0), CAPE), Severity::High);
        assert_eq!(classify(Some(4000.0), CAPE), Severity::Extreme);
    }

    #[test]
    fn missing_and_nan_are_none_for_any_thresholds() {
        for t in [CAPE, Thresholds::new(900.0, 850.0, 800.0), Thresholds::new(0.0, 0.0, 0.0)] {
            assert_eq!(classify(None, t), Severity::None);
            assert_eq!(classify(Some(f64::NAN), t), Severity::None);
        }
    }

    #[test]
    fn classification_is_monotonic() {
        let triples = [
            CAPE,
            Thresholds::new(0.5, 1.0, 2.0),
            Thresholds::new(900.0, 850.0, 800.0),
            Thresholds::new(5.0, 5.0, 5.0),
        ];
        for t in triples {
            let mut previous = Severity::None;
            for step in -100..=5000 {
                let value = f64::from(step);
                let current = classify(Some(value), t);
                assert!(current >= previous, "{value} dropped from {previous} to {current}");
                previous = current;
            }
        }
    }

    #[test]
    fn infinities_classify_at_the_extremes() {
        assert_eq!(classify(Some(f64::INFINITY), CAPE), Severity::Extreme);
        assert_eq!(classify(Some(f64::NEG_INFINITY), CAPE), Severity::Low);
    }

    #[test]
    fn table_is_in_kind_order_with_documented_thresholds() {
        for (index, entry) in PARAMETER_TABLE.iter().enumerate() {
            assert_eq!(entry.kind as usize, index);
        }
        assert_eq!(ParameterKind::Cin.thresholds(), Thresholds::new(50.0, 100.0, 200.0));
        assert_eq!(ParameterKind::Lcl.thresholds(), Thresholds::new(900.0, 850.0, 800.0));
        assert_eq!(ParameterKind::Srh0To3Km.thresholds(), Thresholds::new(150.0, 300.0, 450.0));
        assert_eq!(ParameterKind::Ship.thresholds(), Thresholds::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn cin_and_li_classify_on_magnitude() {
        let cin = ParameterKind::Cin.descriptor();
        assert_eq!(cin.classify(-120.0), Severity::High);
        assert_eq!(cin.format_value(-120.0), "120");

        let li = ParameterKind::Li.descriptor();
        assert_eq!(li.format_value(-5.96), "6.0");
        assert_eq!(li.classify(-5.96), Severity::High);
        assert_eq!(li.classify(-5.94), Severity::Moderate);
    }

    #[test]
    fn lcl_descending_triple_rates_extreme_from_800() {
        let lcl = ParameterKind::Lcl.descriptor();
        assert_eq!(lcl.classify(950.0), Severity::Extreme);
        assert_eq!(lcl.classify(800.0), Severity::Extreme);
        assert_eq!(lcl.classify(799.0), Severity::Low);
    }

    #[test]
    fn composite_values_format_with_two_decimals() {
        let scp = ParameterKind::Scp.descriptor();
        assert_eq!(scp.format_value(3.14159), "3.14");
        assert_eq!(scp.format_value(0.0), "0.00");
    }

    #[test]
    fn exact_ties_round_up() {
        let ship = ParameterKind::Ship.descriptor();
        assert_eq!(ship.format_value(0.125), "0.13");
        assert_eq!(ship.format_value(0.625), "0.63");
        assert_eq!(ship.display_value(0.125), 0.13);

        let shear = ParameterKind::Shear0To1Km.descriptor();
        assert_eq!(shear.format_value(14.25), "14.3");
        assert_eq!(shear.format_value(14.75), "14.8");

        let li = ParameterKind::Li.descriptor();
        assert_eq!(li.format_value(-6.25), "6.3");
        assert_eq!(li.classify(-5.95), Severity::High);
    }

    #[test]
    fn headline_boundaries() {
        let with = |scp, stp| ParameterSet {
            composite: CompositeIndices {
                scp,
                stp,
                ..Default::default()
            },
            ..Default::default()
        };
        let low = Headline::rate(&with(0.99, 0.99));
        assert_eq!(low.supercells, SupercellPotential::Low);
        assert_eq!(low.tornadoes, TornadoPotential::Low);

        let moderate = Headline::rate(&with(1.0, 1.0));
        assert_eq!(moderate.supercells, SupercellPotential::Moderate);
        assert_eq!(moderate.tornadoes, TornadoPotential::Moderate);

        let top = Headline::rate(&with(4.0, 2.0));
        assert_eq!(top.supercells.to_string(), "EXTREME");
        assert_eq!(top.tornadoes.to_string(), "SIGNIFICANT");
    }
}
