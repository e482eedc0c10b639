//! [`Profile`] read model definitions.

use crate::domain::profile;
#[cfg(doc)]
use crate::domain::Profile;

/// Selector of provider [`Profile`]s, ordered by their names.
#[derive(Clone, Copy, Debug, Default)]
pub struct Providers {
    /// [`profile::ProviderKind`] to filter by, if any.
    pub kind: Option<profile::ProviderKind>,
}
