//! [`Product`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, Money};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::profile;

use super::{CreationDateTime, Description, Id, ImageUrl, Title};

/// Product sold either from a provider storefront or as a secondhand listing.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// ID of the selling [`Profile`].
    pub seller_id: profile::Id,

    /// [`Title`] of this [`Product`].
    pub title: Title,

    /// [`Description`] of this [`Product`].
    pub description: Description,

    /// Price of a single unit of this [`Product`].
    pub price: Money,

    /// [`ImageUrl`]s of this [`Product`], the first one being the cover.
    pub images: Vec<ImageUrl>,

    /// Indicator whether this [`Product`] can be bought right now.
    pub is_available: bool,

    /// [`Purpose`] of this [`Product`].
    pub purpose: Purpose,

    /// [`Condition`] of this [`Product`], for secondhand listings.
    pub condition: Option<Condition>,

    /// [`Category`] of this [`Product`].
    pub category: Option<Category>,

    /// [`profile::Phone`] to contact the seller of a secondhand listing.
    pub contact_phone: Option<profile::Phone>,

    /// [`DateTime`] when this [`Product`] was created.
    pub created_at: CreationDateTime,
}

impl Product {
    /// Indicates whether this [`Product`] belongs to the storefront of the
    /// provided seller and can be ordered there.
    #[must_use]
    pub fn is_in_storefront_of(&self, seller_id: profile::Id) -> bool {
        self.seller_id == seller_id
            && self.is_available
            && self.purpose == Purpose::Store
    }
}

define_kind! {
    #[doc = "Purpose of a [`Product`]."]
    enum Purpose {
        #[doc = "Inventory of a provider storefront."]
        Store = "store",

        #[doc = "Peer-to-peer secondhand listing (\"desapego\")."]
        Desapego = "desapego",
    }
}

define_kind! {
    #[doc = "Condition of a secondhand [`Product`]."]
    enum Condition {
        #[doc = "Never used."]
        New = "new",

        #[doc = "Used, but looks new."]
        LikeNew = "like_new",

        #[doc = "Used with light signs of wear."]
        Good = "good",

        #[doc = "Used with visible wear."]
        Fair = "fair",

        #[doc = "Heavily used."]
        Poor = "poor",
    }
}

/// Category of a [`Product`] or of a provider [`Profile`] (e.g.
/// "Eletrônicos", "Doces").
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `category` is valid.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        Self::check(&category).then_some(Self(category))
    }

    /// Checks whether the given `category` is a valid [`Category`].
    fn check(category: impl AsRef<str>) -> bool {
        let category = category.as_ref();
        category.trim() == category
            && !category.is_empty()
            && category.len() <= 64
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}
