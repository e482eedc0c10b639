//! Platform-wide settings definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use crate::domain::offer::ImageUrl;

/// Look of the platform, shared by every member.
#[derive(Clone, Debug, Default)]
pub struct Branding {
    /// Logo [`ImageUrl`], if any is uploaded.
    pub logo_url: Option<ImageUrl>,

    /// [`DateTime`] when this [`Branding`] was changed last time.
    pub updated_at: Option<UpdateDateTime>,
}

/// [`DateTime`] of a [`Branding`] modification.
pub type UpdateDateTime = DateTimeOf<(Branding, unit::Modification)>;
