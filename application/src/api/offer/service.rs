use common::{DateTime, Money};
use derive_more::From;
use juniper::graphql_object;
use service::domain;

#[cfg(doc)]
use crate::api::Offer;
use crate::{api, Context};

use super::{Description, Id, ImageUrl, Kind, OfferValue, Title};

/// Bookable service [`Offer`].
#[derive(Clone, Debug, From)]
pub struct Service(domain::offer::Service);

/// Bookable service `Offer`.
#[graphql_object(
    name = "ServiceOffer",
    context = Context,
    impl = OfferValue,
)]
impl Service {
    /// Unique identifier of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceOffer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of this `Offer`.
    pub fn kind(&self) -> Kind {
        Kind::Service
    }

    /// Provider `Profile` of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceOffer.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn owner(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Offer` loaded from repository guarantees `Profile` \
                      existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.provider_id)
        }
    }

    /// Title of this `Offer`.
    pub fn title(&self) -> Title {
        self.0.title.clone().into()
    }

    /// Description of this `Offer`.
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Current price of this `Offer`.
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Image of this `Offer`.
    pub fn image(&self) -> Option<ImageUrl> {
        self.0.image.clone().map(Into::into)
    }

    /// Expected duration of an appointment, in minutes.
    pub fn duration_minutes(&self) -> Option<i32> {
        self.0.duration.map(|m| i16::from(m).into())
    }

    /// Indicator whether this `Offer` may currently be booked.
    pub fn is_available(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `Offer` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}
