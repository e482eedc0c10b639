//! [`Query`] collection related to [`Offer`]s.

use common::operations::By;

use crate::{
    domain::{offer, Offer},
    read,
};
#[cfg(doc)]
use crate::{domain::Profile, Query};

use super::DatabaseQuery;

/// Queries an [`Offer`] by its [`offer::Id`].
pub type ById = DatabaseQuery<By<Option<Offer>, offer::Id>>;

/// Queries all the [`Offer`]s of a [`Profile`], unavailable ones included.
pub type OwnedBy = DatabaseQuery<By<Vec<Offer>, read::offer::OwnedBy>>;

/// Queries the secondhand feed.
pub type Secondhand =
    DatabaseQuery<By<Vec<offer::Product>, read::offer::Secondhand>>;
