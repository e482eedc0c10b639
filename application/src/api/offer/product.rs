use common::{DateTime, Money};
use derive_more::From;
use juniper::graphql_object;
use service::domain;

#[cfg(doc)]
use crate::api::Offer;
use crate::{api, Context};

use super::{
    Category, Condition, Description, Id, ImageUrl, Kind, OfferValue,
    Purpose, Title,
};

/// Orderable product [`Offer`].
#[derive(Clone, Debug, From)]
pub struct Product(domain::offer::Product);

/// Orderable product `Offer`, either of a provider storefront or a
/// secondhand listing.
#[graphql_object(context = Context, impl = OfferValue)]
impl Product {
    /// Unique identifier of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of this `Offer`.
    pub fn kind(&self) -> Kind {
        Kind::Product
    }

    /// Seller `Profile` of this `Offer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Product.owner",
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
            api::Profile::new_unchecked(self.0.seller_id)
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

    /// Main image of this `Offer`.
    pub fn image(&self) -> Option<ImageUrl> {
        self.0.images.first().cloned().map(Into::into)
    }

    /// All images of this `Product`.
    pub fn images(&self) -> Vec<ImageUrl> {
        self.0.images.iter().cloned().map(Into::into).collect()
    }

    /// Indicator whether this `Offer` may currently be bought.
    pub fn is_available(&self) -> bool {
        self.0.is_available
    }

    /// Purpose of this `Product`.
    pub fn purpose(&self) -> Purpose {
        self.0.purpose.into()
    }

    /// Condition of this `Product`, if it's a secondhand listing.
    pub fn condition(&self) -> Option<Condition> {
        self.0.condition.map(Into::into)
    }

    /// Category of this `Product`.
    pub fn category(&self) -> Option<Category> {
        self.0.category.clone().map(Into::into)
    }

    /// Phone to negotiate a secondhand `Product` through.
    pub fn contact_phone(&self) -> Option<api::profile::Phone> {
        self.0.contact_phone.clone().map(Into::into)
    }

    /// `DateTime` when this `Offer` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}
