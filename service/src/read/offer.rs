//! [`Offer`] read model definitions.

use crate::domain::profile;
#[cfg(doc)]
use crate::domain::{offer::Product, Offer, Profile};

/// Selector of all the [`Offer`]s owned by a [`Profile`], newest first.
#[derive(Clone, Copy, Debug)]
pub struct OwnedBy(pub profile::Id);

/// Selector of the secondhand feed: available [`Product`]s listed for
/// "desapego", newest first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Secondhand;
