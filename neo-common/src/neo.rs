///! Near-Earth object record

use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A near-Earth object, keyed by its primary designation.
#[derive(Debug, Clone, Serialize)]
pub struct NearEarthObject {
    /// Primary designation, e.g. "433" or "2020 AB"
    designation: String,

    /// IAU name, e.g. "Eros"
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Diameter in kilometers (None when unknown)
    diameter: Option<f64>,

    /// Potentially hazardous asteroid flag
    hazardous: bool,
}

impl NearEarthObject {
    /// Create a new record from typed values.
    ///
    /// Blank names and non-finite or negative diameters are stored as unknown.
    /// The designation is stored as given; `NeoDatabase::new` drops records
    /// whose designation is blank.
    pub fn new(
        designation: impl Into<String>,
        name: Option<String>,
        diameter: Option<f64>,
        hazardous: bool,
    ) -> Self {
        Self {
            designation: designation.into(),
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            diameter: diameter.filter(|d| d.is_finite() && *d >= 0.0),
            hazardous,
        }
    }

    /// Create a record from the raw text fields of the NEO dataset.
    ///
    /// `pha` is the hazard marker: "Y" (or any other non-empty marker) means
    /// hazardous, while an empty field or "N" does not. The "N" exception is
    /// narrower than "non-empty means hazardous" and follows the dataset's Y/N column.
    pub fn from_fields(designation: &str, name: &str, diameter: &str, pha: &str) -> Self {
        let diameter = diameter.trim().parse::<f64>().ok();
        Self::new(
            designation.trim(),
            Some(name.to_string()),
            diameter,
            parse_hazard_marker(pha),
        )
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn diameter(&self) -> Option<f64> {
        self.diameter
    }

    pub fn hazardous(&self) -> bool {
        self.hazardous
    }

    /// "Eros (433)" for named objects, the bare designation otherwise
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.designation),
            None => self.designation.clone(),
        }
    }

    pub fn hazard_text(&self) -> &'static str {
        if self.hazardous {
            "is potentially hazardous"
        } else {
            "is not potentially hazardous"
        }
    }

    /// One-line human-readable summary
    pub fn describe(&self) -> String {
        match self.diameter {
            Some(diameter) => format!(
                "NEO {} has a diameter of {:.3} km and {}.",
                self.fullname(),
                diameter,
                self.hazard_text()
            ),
            None => format!(
                "NEO {} has an unknown diameter and {}.",
                self.fullname(),
                self.hazard_text()
            ),
        }
    }
}

fn parse_hazard_marker(pha: &str) -> bool {
    let pha = pha.trim();
    !pha.is_empty() && !pha.eq_ignore_ascii_case("n")
}

impl PartialEq for NearEarthObject {
    fn eq(&self, other: &Self) -> bool {
        self.designation == other.designation
    }
}

impl Eq for NearEarthObject {}

impl Hash for NearEarthObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.designation.hash(state);
    }
}

impl std::fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fullname())
    }
}
