//! GraphQL [`Query`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `Profile`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "me",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn me(ctx: &Context) -> Result<api::Profile, Error> {
        let me = ctx.current_session().await?.profile;
        Ok(me.as_ref().clone().into())
    }

    /// Returns the `Profile` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROFILE_NOT_EXISTS` - the `Profile` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "profile",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn profile(
        id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Profile, Error> {
        ctx.service()
            .execute(query::profile::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProfileError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the provider `Profile`s of the complex, optionally filtered by
    /// what they mainly offer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "providers",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn providers(
        kind: Option<api::profile::ProviderKind>,
        ctx: &Context,
    ) -> Result<Vec<api::Profile>, Error> {
        ctx.service()
            .execute(query::profile::Providers::by(
                service::read::profile::Providers {
                    kind: kind.map(Into::into),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Returns the storefront `Catalog` of the specified provider.
    ///
    /// Unknown providers have an empty `Catalog`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "catalog",
            otel.name = Self::SPAN_NAME,
            provider_id = %provider_id,
        ),
    )]
    pub async fn catalog(
        provider_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Catalog, Error> {
        ctx.service()
            .execute(query::Catalog {
                provider_id: provider_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Offer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "offer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn offer(
        id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        ctx.service()
            .execute(query::offer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| OfferError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `Offer`s of the current `Profile`, including the
    /// unavailable ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myOffers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_offers(
        ctx: &Context,
    ) -> Result<Vec<api::OfferValue>, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        ctx.service()
            .execute(query::offer::OwnedBy::by(
                service::read::offer::OwnedBy(my_id),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// Lists the available secondhand `Product`s of the complex, newest
    /// first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "secondhand",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn secondhand(
        ctx: &Context,
    ) -> Result<Vec<api::offer::Product>, Error> {
        ctx.service()
            .execute(query::offer::Secondhand::by(
                service::read::offer::Secondhand,
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Lists the `Booking`s of the current `Profile`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myBookings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_bookings(
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        ctx.service()
            .execute(query::booking::OfCustomer::by(
                service::read::booking::OfCustomer(my_id),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }

    /// Lists the `Order`s placed by the current `Profile`, newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myOrders",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_orders(ctx: &Context) -> Result<Vec<api::Order>, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        ctx.service()
            .execute(query::order::OfCustomer::by(
                service::read::order::OfCustomer(my_id),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|os| os.into_iter().map(Into::into).collect())
    }

    /// Returns the `OrderBoard` of the current provider `Profile`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_PROVIDER` - the current `Profile` is not a provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "orderBoard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn order_board(ctx: &Context) -> Result<api::order::Board, Error> {
        let me = ctx.current_session().await?.profile;
        if !me.is_provider() {
            return Err(ctx.error()(api::PrivilegeError::Provider.into()));
        }

        ctx.service()
            .execute(query::Board { provider_id: me.id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the schedule of the specified provider for the upcoming days,
    /// today included.
    ///
    /// Defaults to the current `Profile` schedule.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - no provider is specified and the current
    ///                              session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "schedule",
            otel.name = Self::SPAN_NAME,
            provider_id = ?provider_id,
        ),
    )]
    pub async fn schedule(
        provider_id: Option<api::profile::Id>,
        ctx: &Context,
    ) -> Result<Vec<api::schedule::Day>, Error> {
        let provider_id = match provider_id {
            Some(id) => id.into(),
            None => ctx.current_session().await?.profile_id(),
        };

        ctx.service()
            .execute(query::Schedule { provider_id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ds| ds.into_iter().map(Into::into).collect())
    }

    /// Returns the schedule of the specified provider for a single `Date`.
    #[tracing::instrument(
        skip_all,
        fields(
            date = %date,
            gql.name = "scheduleDay",
            otel.name = Self::SPAN_NAME,
            provider_id = %provider_id,
        ),
    )]
    pub async fn schedule_day(
        provider_id: api::profile::Id,
        date: Date,
        ctx: &Context,
    ) -> Result<api::schedule::Day, Error> {
        ctx.service()
            .execute(query::schedule::Day {
                provider_id: provider_id.into(),
                date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Prepares a message for negotiating the platform appointment in the
    /// specified `Slot` of the current provider with its client.
    ///
    /// Returns `null` if there is no platform appointment with a client.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            date = %date,
            gql.name = "negotiation",
            otel.name = Self::SPAN_NAME,
            period = ?period,
        ),
    )]
    pub async fn negotiation(
        date: Date,
        period: api::booking::Period,
        ctx: &Context,
    ) -> Result<Option<api::schedule::Negotiation>, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        ctx.service()
            .execute(query::schedule::Negotiation {
                provider_id: my_id,
                date,
                period: period.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|n| n.map(Into::into))
    }

    /// Returns the `Cart` of the current session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cart",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cart(ctx: &Context) -> Result<api::Cart, Error> {
        let cart = ctx.cart().await?;
        let snapshot = cart.lock().await.clone();
        Ok(snapshot.into())
    }

    /// Returns the `Branding` of the platform.
    ///
    /// Never fails: an unavailable `Branding` is returned without any logo.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "branding",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn branding(ctx: &Context) -> api::settings::Branding {
        ctx.service()
            .execute(query::Branding)
            .await
            .unwrap_or_else(|never| match never {})
            .into()
    }

    /// Returns the `MetricsOverview` of the platform.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_ADMIN` - the current `Profile` is not a platform admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "metrics",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn metrics(
        ctx: &Context,
    ) -> Result<api::settings::Overview, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        ctx.service()
            .execute(query::Overview {
                initiator_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::metrics::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotAdmin(_) => Some(api::PrivilegeError::Admin.into()),
            Self::ProfileNotExists(_) => Some(ProfileError::NotExists.into()),
        }
    }
}

define_error! {
    enum ProfileError {
        #[code = "PROFILE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Profile` with the provided ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum OfferError {
        #[code = "OFFER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Offer` with the provided ID does not exist"]
        NotExists,
    }
}
