//! Vertical atmospheric profile (sounding) as supplied by a profile source.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core_types::units::{Celsius, Hectopascals, Meters, MetersPerSecond, Percent};
use crate::error::ProfileError;

/// One row of a sounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Pressure (hPa)
    pub pressure: Hectopascals,
    /// Geopotential height (m)
    pub height: Meters,
    /// Air temperature (°C)
    pub temperature: Celsius,
    /// Dewpoint temperature (°C)
    pub dewpoint: Celsius,
    /// Relative humidity (%)
    pub relative_humidity: Percent,
    /// Zonal wind component (m/s)
    pub u: MetersPerSecond,
    /// Meridional wind component (m/s)
    pub v: MetersPerSecond,
}

impl Level {
    /// Build a level from raw numbers in the canonical units.
    pub fn new(
        pressure: f64,
        height: f64,
        temperature: f64,
        dewpoint: f64,
        relative_humidity: f64,
        u: f64,
        v: f64,
    ) -> Self {
        Self {
            pressure: Hectopascals::new(pressure),
            height: Meters::new(height),
            temperature: Celsius::new(temperature),
            dewpoint: Celsius::new(dewpoint),
            relative_humidity: Percent::new(relative_humidity),
            u: MetersPerSecond::new(u),
            v: MetersPerSecond::new(v),
        }
    }

    /// Horizontal wind vector (u, v) in m/s
    #[inline]
    pub fn wind(&self) -> Vector2<f64> {
        Vector2::new(*self.u, *self.v)
    }

    fn first_non_finite_field(&self) -> Option<&'static str> {
        [
            ("pressure", *self.pressure),
            ("height", *self.height),
            ("temperature", *self.temperature),
            ("dewpoint", *self.dewpoint),
            ("relative_humidity", *self.relative_humidity),
            ("u", *self.u),
            ("v", *self.v),
        ]
        .into_iter()
        .find_map(|(name, value)| (!value.is_finite()).then_some(name))
    }
}

/// A validated sounding: at least one level, finite fields, heights
/// non-decreasing from the surface (index 0) upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct AtmosphericProfile {
    levels: Vec<Level>,
}

impl AtmosphericProfile {
    /// Validate a level sequence.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::Empty`] for an empty sequence
    /// - [`ProfileError::NonFinite`] for NaN/infinite fields
    /// - [`ProfileError::HeightOrder`] when a level sits below its predecessor
    pub fn new(levels: Vec<Level>) -> Result<Self, ProfileError> {
        if levels.is_empty() {
            return Err(ProfileError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            if let Some(field) = level.first_non_finite_field() {
                return Err(ProfileError::NonFinite { index, field });
            }
        }
        if let Some(index) = levels
            .windows(2)
            .position(|pair| pair[1].height < pair[0].height)
        {
            return Err(ProfileError::HeightOrder { index: index + 1 });
        }
        Ok(Self { levels })
    }

    /// Surface (lowest) level
    #[inline]
    pub fn surface(&self) -> &Level {
        // Non-empty by construction
        &self.levels[0]
    }

    /// All levels, surface first
    #[inline]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// First level whose height is at or above `height`.
    pub fn first_at_or_above_height(&self, height: f64) -> Option<&Level> {
        self.levels.iter().find(|l| *l.height >= height)
    }

    /// First level whose pressure is at or below `pressure` (i.e. at or above
    /// that pressure surface).
    pub fn first_at_or_below_pressure(&self, pressure: f64) -> Option<&Level> {
        self.levels.iter().find(|l| *l.pressure <= pressure)
    }
}

impl TryFrom<Vec<Level>> for AtmosphericProfile {
    type Error = ProfileError;

    fn try_from(levels: Vec<Level>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<AtmosphericProfile> for Vec<Level> {
    fn from(profile: AtmosphericProfile) -> Self {
        profile.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(p: f64, h: f64) -> Level {
        Level::new(p, h, 20.0, 10.0, 50.0, 0.0, 0.0)
    }

    #[test]
    fn rejects_empty_profiles() {
        assert_eq!(AtmosphericProfile::new(vec![]), Err(ProfileError::Empty));
    }

    #[test]
    fn rejects_descending_heights() {
        let err = AtmosphericProfile::new(vec![level(1000.0, 100.0), level(900.0, 50.0)]);
        assert_eq!(err, Err(ProfileError::HeightOrder { index: 1 }));
    }

    #[test]
    fn rejects_non_finite_fields() {
        let mut bad = level(850.0, 1500.0);
        bad.v = MetersPerSecond::new(f64::INFINITY);
        let err = AtmosphericProfile::new(vec![level(1000.0, 0.0), bad]);
        assert_eq!(err, Err(ProfileError::NonFinite { index: 1, field: "v" }));
    }

    #[test]
    fn lookups_pick_the_first_match() {
        let profile = AtmosphericProfile::new(vec![
            level(1000.0, 0.0),
            level(850.0, 1500.0),
            level(500.0, 5500.0),
            level(300.0, 9000.0),
        ])
        .unwrap();

        assert_eq!(*profile.surface().pressure, 1000.0);
        assert_eq!(*profile.first_at_or_above_height(1000.0).unwrap().height, 1500.0);
        assert!(profile.first_at_or_above_height(12_000.0).is_none());
        assert_eq!(*profile.first_at_or_below_pressure(500.0).unwrap().height, 5500.0);
    }

    #[test]
    fn deserializes_from_a_level_array() {
        let json = r#"[
            {"pressure": 1000, "height": 0, "temperature": 25, "dewpoint": 18,
             "relative_humidity": 65, "u": 2, "v": 3}
        ]"#;
        let profile: AtmosphericProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.levels().len(), 1);
        assert!(serde_json::from_str::<AtmosphericProfile>("[]").is_err());
    }
}
