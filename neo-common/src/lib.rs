///! Shared record model for near-Earth objects and their close approaches.
///!
///! Both records are plain immutable values. Relations between them live in
///! the backend's linkage index, not on the records themselves.

pub mod approach;
pub mod error;
pub mod neo;
pub mod time;

pub use approach::CloseApproach;
pub use error::FormatError;
pub use neo::NearEarthObject;
