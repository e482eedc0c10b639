//! [`Booking`] read model definitions.

use crate::domain::profile;
#[cfg(doc)]
use crate::domain::{Booking, Profile};

/// Selector of the [`Booking`]s made by a resident [`Profile`], newest
/// first.
#[derive(Clone, Copy, Debug)]
pub struct OfCustomer(pub profile::Id);
