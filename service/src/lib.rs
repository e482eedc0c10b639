//! Service contains the business logic of the condo marketplace: catalog of
//! provider services and products, shopping carts and orders, bookings of
//! provider schedules, and member profiles.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use common::{datetime::LocalTime, DateTime};
use derive_more::Debug;
use time::UtcOffset;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] decoding key of the identity provider tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Expected `aud` claim of the identity provider tokens, if any.
    pub jwt_audience: Option<String>,

    /// [`UtcOffset`] of the residential complex wall clock.
    pub utc_offset: UtcOffset,

    /// [`Clock`] telling the current time.
    pub clock: Clock,
}

/// Source of the current [`DateTime`].
#[derive(Clone, Copy, Debug, Default)]
pub enum Clock {
    /// System clock.
    #[default]
    System,

    /// Clock stopped at the provided [`DateTime`].
    Fixed(DateTime),
}

impl Clock {
    /// Returns the current [`DateTime`] of this [`Clock`].
    #[must_use]
    pub fn now(self) -> DateTime {
        match self {
            Self::System => DateTime::now(),
            Self::Fixed(at) => at,
        }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the current [`DateTime`].
    #[must_use]
    pub fn now(&self) -> DateTime {
        self.config.clock.now()
    }

    /// Returns the current wall-clock [`LocalTime`] of the residential
    /// complex.
    #[must_use]
    pub fn local_time(&self) -> LocalTime {
        self.now().local(self.config.utc_offset)
    }
}

#[cfg(test)]
mod test_support {
    //! Fixtures shared by [`Command`] and [`Query`] tests.

    use common::DateTime;
    use time::UtcOffset;

    use crate::{
        domain::{
            offer::{
                self,
                product::Purpose,
                Description, Product, Service as ServiceOffer,
            },
            profile::{self, ProviderKind, Role},
            Profile,
        },
        infra::Memory,
        Clock, Config, Service,
    };

    /// Secret the test tokens are signed with.
    pub(crate) const SECRET: &[u8] = b"test-secret";

    /// Creates a new [`Service`] on top of an empty [`Memory`] database.
    pub(crate) fn service() -> Service<Memory> {
        service_with(Clock::System)
    }

    /// Creates a new [`Service`] on top of an empty [`Memory`] database,
    /// with its [`Clock`] stopped at the provided UTC [`DateTime`].
    pub(crate) fn service_at(
        (year, month, day): (i32, u8, u8),
        hour: u8,
    ) -> Service<Memory> {
        let at = time::Date::from_calendar_date(
            year,
            month.try_into().unwrap(),
            day,
        )
        .unwrap()
        .with_hms(hour, 0, 0)
        .unwrap()
        .assume_utc();
        service_with(Clock::Fixed(at.try_into().unwrap()))
    }

    fn service_with(clock: Clock) -> Service<Memory> {
        Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    SECRET,
                ),
                jwt_audience: None,
                utc_offset: UtcOffset::UTC,
                clock,
            },
            Memory::new(),
        )
    }

    /// Creates a new [`Profile`] with the provided [`Role`].
    pub(crate) fn profile(role: Role) -> Profile {
        Profile {
            id: profile::Id::new(),
            name: "Maria Silva".parse().unwrap(),
            role,
            provider_kind: (role == Role::Provider)
                .then_some(ProviderKind::Service),
            phone: Some("(11) 98888-7777".parse().unwrap()),
            address: Some("Bloco B, Apto 12".parse().unwrap()),
            condo_name: None,
            document: None,
            categories: vec![],
            is_admin: false,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Creates a new active [`ServiceOffer`] of the provided provider.
    pub(crate) fn service_offer(
        provider_id: profile::Id,
        price: &str,
    ) -> ServiceOffer {
        ServiceOffer {
            id: offer::Id::new(),
            provider_id,
            title: "Corte de cabelo".parse().unwrap(),
            description: Description::default(),
            price: price.parse().unwrap(),
            duration: None,
            image: None,
            is_active: true,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Creates a new available [`Product`] of the provided seller.
    pub(crate) fn product(
        seller_id: profile::Id,
        price: &str,
        purpose: Purpose,
    ) -> Product {
        Product {
            id: offer::Id::new(),
            seller_id,
            title: "Bolo de pote".parse().unwrap(),
            description: Description::default(),
            price: price.parse().unwrap(),
            images: vec![],
            is_available: true,
            purpose,
            condition: None,
            category: None,
            contact_phone: None,
            created_at: DateTime::now().coerce(),
        }
    }
}
