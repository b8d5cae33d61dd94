pub mod analyzer;
mod cache;
pub mod estimate;
pub mod hours;
pub mod milestone;
mod model;
mod overwork;
mod source;
mod tracker;
pub mod velocity;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cache::MetricCache;
pub use model::*;
pub use overwork::{overwork, Overwork};
pub use source::{LookupError, WorkLogSource};
pub use tracker::TimeTracker;
