//! Read entities definitions.

pub mod booking;
pub mod catalog;
pub mod metrics;
pub mod offer;
pub mod order;
pub mod profile;
pub mod schedule;

pub use self::{catalog::Catalog, metrics::Overview};
