//! [`Service`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::Money;
use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::profile;

use super::{CreationDateTime, Description, Id, ImageUrl, Title};

/// Service booked against a date and a period of the provider's schedule.
#[derive(Clone, Debug)]
pub struct Service {
    /// ID of this [`Service`].
    pub id: Id,

    /// ID of the providing [`Profile`].
    pub provider_id: profile::Id,

    /// [`Title`] of this [`Service`].
    pub title: Title,

    /// [`Description`] of this [`Service`].
    pub description: Description,

    /// Price of a single booking of this [`Service`].
    pub price: Money,

    /// Expected [`Minutes`] a single appointment takes, if announced.
    pub duration: Option<Minutes>,

    /// Cover [`ImageUrl`] of this [`Service`], if any.
    pub image: Option<ImageUrl>,

    /// Indicator whether this [`Service`] accepts bookings.
    pub is_active: bool,

    /// [`DateTime`] when this [`Service`] was created.
    pub created_at: CreationDateTime,
}

/// Positive duration of a [`Service`] appointment, in minutes.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Minutes(i16);

impl Minutes {
    /// Creates new [`Minutes`] if the provided `minutes` are positive.
    #[must_use]
    pub fn new(minutes: i16) -> Option<Self> {
        (minutes > 0).then_some(Self(minutes))
    }
}
