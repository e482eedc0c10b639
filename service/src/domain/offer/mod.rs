//! [`Offer`] definitions.

pub mod product;
pub mod service;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::profile;
#[cfg(doc)]
use crate::domain::Profile;

pub use self::{product::Product, service::Service};

/// Sellable unit of a provider (or a resident, for secondhand listings).
#[derive(Clone, Debug, From)]
pub enum Offer {
    /// Bookable [`Service`].
    Service(Service),

    /// Orderable [`Product`].
    Product(Product),
}

impl Offer {
    /// Returns ID of this [`Offer`].
    #[must_use]
    pub fn id(&self) -> Id {
        match self {
            Self::Service(s) => s.id,
            Self::Product(p) => p.id,
        }
    }

    /// Returns [`Kind`] of this [`Offer`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Service(_) => Kind::Service,
            Self::Product(_) => Kind::Product,
        }
    }

    /// Returns ID of the [`Profile`] owning this [`Offer`].
    #[must_use]
    pub fn owner_id(&self) -> profile::Id {
        match self {
            Self::Service(s) => s.provider_id,
            Self::Product(p) => p.seller_id,
        }
    }

    /// Returns [`Title`] of this [`Offer`].
    #[must_use]
    pub fn title(&self) -> &Title {
        match self {
            Self::Service(s) => &s.title,
            Self::Product(p) => &p.title,
        }
    }

    /// Returns [`Description`] of this [`Offer`].
    #[must_use]
    pub fn description(&self) -> &Description {
        match self {
            Self::Service(s) => &s.description,
            Self::Product(p) => &p.description,
        }
    }

    /// Returns the current price of this [`Offer`].
    #[must_use]
    pub fn price(&self) -> Money {
        match self {
            Self::Service(s) => s.price,
            Self::Product(p) => p.price,
        }
    }

    /// Returns the main [`ImageUrl`] of this [`Offer`], if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageUrl> {
        match self {
            Self::Service(s) => s.image.as_ref(),
            Self::Product(p) => p.images.first(),
        }
    }

    /// Indicates whether this [`Offer`] may currently be booked or bought.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match self {
            Self::Service(s) => s.is_active,
            Self::Product(p) => p.is_available,
        }
    }

    /// Sets availability of this [`Offer`].
    pub fn set_available(&mut self, available: bool) {
        match self {
            Self::Service(s) => s.is_active = available,
            Self::Product(p) => p.is_available = available,
        }
    }

    /// Returns [`DateTime`] when this [`Offer`] was created.
    #[must_use]
    pub fn created_at(&self) -> CreationDateTime {
        match self {
            Self::Service(s) => s.created_at,
            Self::Product(p) => p.created_at,
        }
    }
}

/// ID of an [`Offer`].
///
/// Shared by both [`Offer`] kinds, so a [`Service`] and a [`Product`] never
/// have the same ID.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of an [`Offer`]."]
    enum Kind {
        #[doc = "Bookable [`Service`]."]
        Service = "service",

        #[doc = "Orderable [`Product`]."]
        Product = "product",
    }
}

/// Title of an [`Offer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 128
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Free-form description of an [`Offer`], possibly empty.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        (description.len() <= 4096).then_some(Self(description))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Absolute HTTP(S) URL of an image kept in the external object storage.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        Url::parse(url.as_ref())
            .is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// [`DateTime`] of an [`Offer`] creation.
pub type CreationDateTime = DateTimeOf<(Offer, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{ImageUrl, Title};

    #[test]
    fn image_urls_must_be_absolute_http() {
        assert!(ImageUrl::new("https://cdn.example.com/a.png").is_some());
        assert!(ImageUrl::new("http://cdn.example.com/a.png").is_some());
        assert!(ImageUrl::new("ftp://cdn.example.com/a.png").is_none());
        assert!(ImageUrl::new("/a.png").is_none());
    }

    #[test]
    fn titles_are_trimmed() {
        assert!(Title::new("Corte de Cabelo").is_some());
        assert!(Title::new("Corte ").is_none());
        assert!(Title::new("").is_none());
    }
}
