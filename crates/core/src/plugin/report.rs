//! Render payload handed to the host for display.

use serde::Serialize;

use crate::core_types::{Coordinate, ParameterGroup, ParameterKind, ParameterSet};
use crate::severity::{Headline, Severity};

/// A named location offered as a one-click test target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemoLocation {
    /// Button label
    pub name: &'static str,
    /// Latitude (°)
    pub latitude: f64,
    /// Longitude (°)
    pub longitude: f64,
}

/// Quick-test locations shown under every report.
pub const DEMO_LOCATIONS: [DemoLocation; 4] = [
    DemoLocation {
        name: "Melbourne",
        latitude: -37.8136,
        longitude: 144.9631,
    },
    DemoLocation {
        name: "Sydney",
        latitude: -33.8688,
        longitude: 151.2093,
    },
    DemoLocation {
        name: "Tokyo",
        latitude: 35.6762,
        longitude: 139.6503,
    },
    DemoLocation {
        name: "Oklahoma",
        latitude: 35.4676,
        longitude: -97.5164,
    },
];

/// Look up a demo location by case-insensitive name.
pub fn demo_location(name: &str) -> Option<&'static DemoLocation> {
    DEMO_LOCATIONS
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Link to the external analysis tool for a coordinate.
///
/// ```
/// use sounding_core::{analysis_url, Coordinate};
///
/// let c = Coordinate::new(-37.8136, 144.9631).unwrap();
/// assert_eq!(
///     analysis_url("http://localhost:7861", c),
///     "http://localhost:7861?lat=-37.8136&lon=144.9631"
/// );
/// ```
pub fn analysis_url(base_url: &str, coordinate: Coordinate) -> String {
    format!(
        "{}?lat={}&lon={}",
        base_url.trim(),
        coordinate.latitude(),
        coordinate.longitude()
    )
}

/// One parameter card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterCard {
    /// Which parameter
    pub kind: ParameterKind,
    /// Card label
    pub label: &'static str,
    /// Formatted value
    pub value: String,
    /// Unit suffix
    pub unit: &'static str,
    /// Severity tier
    pub severity: Severity,
}

/// Cards of one parameter group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    /// Group shown
    pub group: ParameterGroup,
    /// Section heading
    pub title: &'static str,
    /// Cards in panel order
    pub cards: Vec<ParameterCard>,
}

/// Everything the panel shows for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundingReport {
    /// Analyzed location
    pub coordinate: Coordinate,
    /// Header text, e.g. `-37.814°, 144.963°`
    pub location_label: String,
    /// Supercell/tornado headline
    pub headline: Headline,
    /// Thermodynamic, kinematic and composite sections
    pub sections: Vec<ReportSection>,
    /// Raw values behind the cards
    pub parameters: ParameterSet,
    /// Link to the detailed analysis tool
    pub analysis_url: String,
    /// Quick-test locations
    pub demo_locations: &'static [DemoLocation],
}

impl SoundingReport {
    /// Build the render payload for a parameter set.
    pub fn build(coordinate: Coordinate, parameters: &ParameterSet, analysis_base_url: &str) -> Self {
        let sections = ParameterGroup::ALL
            .into_iter()
            .map(|group| ReportSection {
                group,
                title: group.title(),
                cards: ParameterKind::ALL
                    .into_iter()
                    .filter(|kind| kind.group() == group)
                    .map(|kind| card(kind, parameters.get(kind)))
                    .collect(),
            })
            .collect();

        Self {
            coordinate,
            location_label: coordinate.to_string(),
            headline: Headline::rate(parameters),
            sections,
            parameters: *parameters,
            analysis_url: analysis_url(analysis_base_url, coordinate),
            demo_locations: &DEMO_LOCATIONS,
        }
    }

    /// Card for a given parameter
    pub fn card(&self, kind: ParameterKind) -> Option<&ParameterCard> {
        self.sections
            .iter()
            .flat_map(|s| s.cards.iter())
            .find(|c| c.kind == kind)
    }
}

fn card(kind: ParameterKind, raw: f64) -> ParameterCard {
    let descriptor = kind.descriptor();
    ParameterCard {
        kind,
        label: descriptor.label,
        value: descriptor.format_value(raw),
        unit: descriptor.unit,
        severity: descriptor.classify(raw),
    }
}
