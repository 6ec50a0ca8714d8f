///! NEO database backend
///!
///! Loads the NEO and close-approach datasets, links them into a read-only
///! in-memory database and answers filtered queries over close approaches.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod filters;
pub mod linkage;
pub mod logging;
pub mod query;

pub use database::{ApproachView, DatabaseStats, NeoDatabase, NeoView};
pub use error::ArgumentError;
pub use filters::{ApproachFilter, Comparison, FilterCriteria, FilterSet, create_filters};
pub use linkage::{ApproachId, NeoId};
pub use query::limit;

pub use neo_common::{CloseApproach, FormatError, NearEarthObject};
