//! [`Query`] collection related to [`Profile`]s.

use common::operations::By;

use crate::{
    domain::{profile, Profile},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Profile`] by its [`profile::Id`].
pub type ById = DatabaseQuery<By<Option<Profile>, profile::Id>>;

/// Queries the provider directory.
pub type Providers = DatabaseQuery<By<Vec<Profile>, read::profile::Providers>>;
