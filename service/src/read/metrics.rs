//! Platform metrics read model definitions.

use common::Money;

#[cfg(doc)]
use crate::domain::{offer, Booking, Order, Profile};

/// Aggregated counters of the whole platform.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Overview {
    /// Number of [`Profile`]s.
    pub profiles: i64,

    /// Number of [`offer::Service`]s.
    pub services: i64,

    /// Number of [`offer::Product`]s.
    pub products: i64,

    /// Number of [`Booking`]s.
    pub bookings: i64,

    /// Number of [`Order`]s.
    pub orders: i64,

    /// Sum of all the [`Order`] totals.
    pub revenue: Money,
}
