//! [`Booking`]-related definitions.

use std::future;

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{command, domain, query, Query as _};
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Appointment of a resident with a service provider.
#[derive(Clone, Debug, From)]
pub struct Booking(domain::Booking);

/// Appointment of a resident with a service provider.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Booked service `Offer`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OFFER_NOT_EXISTS` - the booked service was deleted by its provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.service",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service(
        &self,
        ctx: &Context,
    ) -> Result<api::offer::Service, Error> {
        ctx.service()
            .execute(query::offer::ById::by(self.0.service_id))
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .and_then(|o| {
                future::ready(match o {
                    Some(domain::Offer::Service(s)) => Ok(s.into()),
                    _ => Err(api::query::OfferError::NotExists.into()),
                })
            })
            .map_err(ctx.error())
            .await
    }

    /// Provider `Profile` of this `Booking`.
    pub fn provider(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Booking` loaded from repository guarantees `Profile` \
                      existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.provider_id)
        }
    }

    /// Customer `Profile` of this `Booking`.
    pub fn customer(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Booking` loaded from repository guarantees `Profile` \
                      existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.customer_id)
        }
    }

    /// Local `Date` of this `Booking`.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// `Period` of the day this `Booking` takes.
    pub fn period(&self) -> Period {
        self.0.period.into()
    }

    /// Price of the service at the booking moment.
    pub fn total_price(&self) -> Money {
        self.0.total_price
    }

    /// Status of this `Booking`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Booking` was requested.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Result of a `Booking` checkout.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "BookingResult")]
pub struct CheckoutResult {
    /// Requested `Booking`.
    pub booking: Booking,

    /// `Order` of the upsell products, if any were picked.
    pub order: Option<api::Order>,
}

impl From<command::confirm_booking::Confirmation> for CheckoutResult {
    fn from(c: command::confirm_booking::Confirmation) -> Self {
        let command::confirm_booking::Confirmation { booking, order } = c;
        Self {
            booking: booking.into(),
            order: order.map(Into::into),
        }
    }
}

/// Unique identifier of a `Booking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Requested, awaiting the provider.
    Pending,

    /// Accepted by the provider.
    Confirmed,

    /// Took place.
    Completed,

    /// Cancelled or rescheduled away.
    Cancelled,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

/// One of the four bookable periods of a day.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Period {
    /// "Manhã I", 07:00 - 09:00.
    M1,

    /// "Manhã II", 09:01 - 12:00.
    M2,

    /// "Tarde I", 13:00 - 15:00.
    T1,

    /// "Tarde II", 15:01 - 18:00.
    T2,
}

impl From<domain::schedule::Period> for Period {
    fn from(period: domain::schedule::Period) -> Self {
        use domain::schedule::Period as P;
        match period {
            P::M1 => Self::M1,
            P::M2 => Self::M2,
            P::T1 => Self::T1,
            P::T2 => Self::T2,
        }
    }
}

impl From<Period> for domain::schedule::Period {
    fn from(period: Period) -> Self {
        match period {
            Period::M1 => Self::M1,
            Period::M2 => Self::M2,
            Period::T1 => Self::T1,
            Period::T2 => Self::T2,
        }
    }
}
