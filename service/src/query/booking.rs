//! [`Query`] collection related to [`Booking`]s.

use common::operations::By;

use crate::{
    domain::{booking, Booking},
    read,
};
#[cfg(doc)]
use crate::{domain::Profile, Query};

use super::DatabaseQuery;

/// Queries a [`Booking`] by its [`booking::Id`].
pub type ById = DatabaseQuery<By<Option<Booking>, booking::Id>>;

/// Queries the [`Booking`]s made by a resident [`Profile`].
pub type OfCustomer = DatabaseQuery<By<Vec<Booking>, read::booking::OfCustomer>>;
