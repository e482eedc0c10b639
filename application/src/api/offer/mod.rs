//! [`Offer`]-related definitions.

mod product;
mod service;

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLEnum, GraphQLInterface, GraphQLScalar};
use ::service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context,
};

pub use self::{product::Product, service::Service};

/// Sellable unit of a provider, or of a resident for secondhand listings.
#[derive(Clone, Debug, GraphQLInterface)]
#[graphql(context = Context, for = [Service, Product])]
pub struct Offer {
    /// Unique identifier of the `Offer`.
    id: Id,

    /// Kind of the `Offer`.
    kind: Kind,

    /// `Profile` owning the `Offer`.
    owner: api::Profile,

    /// Title of the `Offer`.
    title: Title,

    /// Description of the `Offer`.
    description: Description,

    /// Current price of the `Offer`.
    price: Money,

    /// Main image of the `Offer`.
    image: Option<ImageUrl>,

    /// Indicator whether the `Offer` may currently be booked or bought.
    is_available: bool,

    /// `DateTime` when the `Offer` was created.
    created_at: DateTime,
}

impl From<domain::Offer> for OfferValue {
    fn from(offer: domain::Offer) -> Self {
        match offer {
            domain::Offer::Service(s) => Self::Service(s.into()),
            domain::Offer::Product(p) => Self::Product(p.into()),
        }
    }
}

/// Unique identifier of an `Offer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::offer::Id)]
#[into(domain::offer::Id)]
#[graphql(name = "OfferId", transparent)]
pub struct Id(Uuid);

/// Title of an `Offer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferTitle",
    with = scalar::Via::<domain::offer::Title>,
)]
pub struct Title(domain::offer::Title);

/// Description of an `Offer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferDescription",
    with = scalar::Via::<domain::offer::Description>,
)]
pub struct Description(domain::offer::Description);

/// URL of an `Offer` image.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OfferImageUrl",
    with = scalar::Via::<domain::offer::ImageUrl>,
)]
pub struct ImageUrl(domain::offer::ImageUrl);

/// Category of a `Product` (e.g. "Eletrônicos", "Doces").
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProductCategory",
    with = scalar::Via::<domain::offer::product::Category>,
)]
pub struct Category(domain::offer::product::Category);

/// Kind of an `Offer`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OfferKind")]
pub enum Kind {
    /// Bookable service.
    Service,

    /// Orderable product.
    Product,
}

impl From<domain::offer::Kind> for Kind {
    fn from(kind: domain::offer::Kind) -> Self {
        use domain::offer::Kind as K;
        match kind {
            K::Service => Self::Service,
            K::Product => Self::Product,
        }
    }
}

/// Purpose of a `Product`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ProductPurpose")]
pub enum Purpose {
    /// Inventory of a provider storefront.
    Store,

    /// Peer-to-peer secondhand listing.
    Desapego,
}

impl From<domain::offer::product::Purpose> for Purpose {
    fn from(purpose: domain::offer::product::Purpose) -> Self {
        use domain::offer::product::Purpose as P;
        match purpose {
            P::Store => Self::Store,
            P::Desapego => Self::Desapego,
        }
    }
}

/// Condition of a secondhand `Product`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ProductCondition")]
pub enum Condition {
    /// Never used.
    New,

    /// Used, but looks new.
    LikeNew,

    /// Used with light signs of wear.
    Good,

    /// Used with visible wear.
    Fair,

    /// Heavily used.
    Poor,
}

impl From<domain::offer::product::Condition> for Condition {
    fn from(condition: domain::offer::product::Condition) -> Self {
        use domain::offer::product::Condition as C;
        match condition {
            C::New => Self::New,
            C::LikeNew => Self::LikeNew,
            C::Good => Self::Good,
            C::Fair => Self::Fair,
            C::Poor => Self::Poor,
        }
    }
}

impl From<Condition> for domain::offer::product::Condition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::New => Self::New,
            Condition::LikeNew => Self::LikeNew,
            Condition::Good => Self::Good,
            Condition::Fair => Self::Fair,
            Condition::Poor => Self::Poor,
        }
    }
}
