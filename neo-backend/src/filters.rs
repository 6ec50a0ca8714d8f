///! Close approach filters
///!
///! A filter is one comparison against one attribute of an approach or of
///! the NEO it is linked to. A `FilterSet` is the conjunction of its filters.

use chrono::NaiveDate;
use neo_common::{CloseApproach, NearEarthObject};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ArgumentError;

/// Comparison operator for filter thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Equal to
    Eq,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
}

impl Comparison {
    /// Whether `value <op> threshold` holds. Unordered values (NaN) never match.
    pub fn holds<T: PartialOrd>(self, value: &T, threshold: &T) -> bool {
        match self {
            Comparison::Eq => value == threshold,
            Comparison::Lt => value < threshold,
            Comparison::Le => value <= threshold,
            Comparison::Gt => value > threshold,
            Comparison::Ge => value >= threshold,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Comparison::Eq => "==",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// A single predicate over a close approach.
#[derive(Debug, Clone, PartialEq)]
pub enum ApproachFilter {
    /// Calendar date of the approach; time of day is ignored
    Date(Comparison, NaiveDate),
    /// Approach distance in au
    Distance(Comparison, f64),
    /// Relative velocity in km/s
    Velocity(Comparison, f64),
    /// Diameter of the linked NEO in km; unknown diameters never match
    Diameter(Comparison, f64),
    /// Hazard flag of the linked NEO
    Hazardous(bool),
}

impl ApproachFilter {
    /// Evaluate against an approach and the NEO it is linked to, if any.
    ///
    /// NEO-level filters reject orphan approaches.
    pub fn matches(&self, approach: &CloseApproach, neo: Option<&NearEarthObject>) -> bool {
        match *self {
            ApproachFilter::Date(op, date) => op.holds(&approach.date(), &date),
            ApproachFilter::Distance(op, distance) => op.holds(&approach.distance(), &distance),
            ApproachFilter::Velocity(op, velocity) => op.holds(&approach.velocity(), &velocity),
            ApproachFilter::Diameter(op, diameter) => neo
                .and_then(NearEarthObject::diameter)
                .is_some_and(|d| op.holds(&d, &diameter)),
            ApproachFilter::Hazardous(hazardous) => {
                neo.is_some_and(|neo| neo.hazardous() == hazardous)
            }
        }
    }
}

impl std::fmt::Display for ApproachFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApproachFilter::Date(op, date) => write!(f, "date {} {}", op, date),
            ApproachFilter::Distance(op, v) => write!(f, "distance {} {}", op, v),
            ApproachFilter::Velocity(op, v) => write!(f, "velocity {} {}", op, v),
            ApproachFilter::Diameter(op, v) => write!(f, "diameter {} {}", op, v),
            ApproachFilter::Hazardous(flag) => write!(f, "hazardous == {}", flag),
        }
    }
}

/// Conjunction of filters. An empty set accepts every approach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<ApproachFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: ApproachFilter) {
        self.filters.push(filter);
    }

    pub fn with(mut self, filter: ApproachFilter) -> Self {
        self.push(filter);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApproachFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True when every filter matches
    pub fn matches(&self, approach: &CloseApproach, neo: Option<&NearEarthObject>) -> bool {
        self.filters.iter().all(|filter| filter.matches(approach, neo))
    }
}

impl FromIterator<ApproachFilter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = ApproachFilter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a ApproachFilter;
    type IntoIter = std::slice::Iter<'a, ApproachFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

/// Optional query criteria, as given by a user or a config file.
///
/// Dates are `YYYY-MM-DD`. Numeric bounds are inclusive and may be given as
/// numbers or strings; they are validated by [`create_filters`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub distance_min: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub distance_max: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub velocity_min: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub velocity_max: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub diameter_min: Option<String>,
    #[serde(deserialize_with = "deserialize_bound")]
    pub diameter_max: Option<String>,
    pub hazardous: Option<bool>,
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bound {
        Number(f64),
        Text(String),
    }

    Ok(Option::<Bound>::deserialize(deserializer)?.map(|bound| match bound {
        Bound::Number(value) => value.to_string(),
        Bound::Text(text) => text,
    }))
}

/// Build a filter set from criteria; omitted criteria add no filter.
///
/// `date` is an exact calendar-date match, `start_date`/`end_date` are
/// inclusive bounds, and all of them are ANDed when given together.
pub fn create_filters(criteria: &FilterCriteria) -> Result<FilterSet, ArgumentError> {
    let mut filters = FilterSet::new();

    let dates = [
        ("date", &criteria.date, Comparison::Eq),
        ("start_date", &criteria.start_date, Comparison::Ge),
        ("end_date", &criteria.end_date, Comparison::Le),
    ];
    for (field, value, op) in dates {
        if let Some(value) = value {
            filters.push(ApproachFilter::Date(op, parse_date(field, value)?));
        }
    }

    let bounds: [(&'static str, &Option<String>, fn(Comparison, f64) -> ApproachFilter, Comparison); 6] = [
        ("distance_min", &criteria.distance_min, ApproachFilter::Distance, Comparison::Ge),
        ("distance_max", &criteria.distance_max, ApproachFilter::Distance, Comparison::Le),
        ("velocity_min", &criteria.velocity_min, ApproachFilter::Velocity, Comparison::Ge),
        ("velocity_max", &criteria.velocity_max, ApproachFilter::Velocity, Comparison::Le),
        ("diameter_min", &criteria.diameter_min, ApproachFilter::Diameter, Comparison::Ge),
        ("diameter_max", &criteria.diameter_max, ApproachFilter::Diameter, Comparison::Le),
    ];
    for (field, value, filter, op) in bounds {
        if let Some(value) = value {
            filters.push(filter(op, parse_bound(field, value)?));
        }
    }

    if let Some(hazardous) = criteria.hazardous {
        filters.push(ApproachFilter::Hazardous(hazardous));
    }

    Ok(filters)
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ArgumentError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ArgumentError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_bound(field: &'static str, value: &str) -> Result<f64, ArgumentError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ArgumentError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
