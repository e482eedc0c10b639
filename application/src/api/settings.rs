//! Platform-wide settings and metrics definitions.

use common::{DateTime, Money};
use derive_more::From;
use juniper::graphql_object;
use service::{domain, read};

use crate::{api, Context};

/// Visual identity of the platform.
#[derive(Clone, Debug, From)]
pub struct Branding(domain::settings::Branding);

/// Visual identity of the platform.
#[graphql_object(context = Context)]
impl Branding {
    /// URL of the platform logo, if any is set.
    pub fn logo_url(&self) -> Option<api::offer::ImageUrl> {
        self.0.logo_url.clone().map(Into::into)
    }

    /// `DateTime` when this `Branding` was changed last time.
    pub fn updated_at(&self) -> Option<DateTime> {
        self.0.updated_at.map(|at| at.coerce())
    }
}

/// Aggregated counters of the whole platform.
#[derive(Clone, Copy, Debug, From)]
pub struct Overview(read::Overview);

/// Aggregated counters of the whole platform.
#[graphql_object(name = "MetricsOverview", context = Context)]
impl Overview {
    /// Number of `Profile`s.
    pub fn profiles(&self) -> f64 {
        counter(self.0.profiles)
    }

    /// Number of service `Offer`s.
    pub fn services(&self) -> f64 {
        counter(self.0.services)
    }

    /// Number of `Product`s.
    pub fn products(&self) -> f64 {
        counter(self.0.products)
    }

    /// Number of `Booking`s.
    pub fn bookings(&self) -> f64 {
        counter(self.0.bookings)
    }

    /// Number of `Order`s.
    pub fn orders(&self) -> f64 {
        counter(self.0.orders)
    }

    /// Sum of all the `Order` totals.
    pub fn revenue(&self) -> Money {
        self.0.revenue
    }
}

/// Converts the provided counter into a GraphQL number.
///
/// GraphQL `Int` is 32-bit only, so counters are exposed as `Float`.
#[expect(clippy::cast_precision_loss, reason = "counters fit into 2^53")]
fn counter(n: i64) -> f64 {
    n as f64
}
