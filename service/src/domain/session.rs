//! [`Session`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, FromStr};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3;

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::profile;

/// Session of an authenticated [`Profile`], as issued by the identity
/// provider.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`Profile`] this [`Session`] belongs to.
    #[serde(rename = "sub")]
    pub profile_id: profile::Id,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Access token of a [`Session`].
#[derive(AsRef, Clone, FromStr)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Returns a [`Fingerprint`] identifying this [`Token`] without exposing
    /// it.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(xxh3::xxh3_128(self.0.as_bytes()))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:032x})", self.fingerprint().0)
    }
}

/// Stable hash of a [`Token`], used to key session-scoped state.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Fingerprint(u128);

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use super::Token;

    #[test]
    fn fingerprint_is_stable_and_distinct() {
        let a: Token = "a.b.c".parse().unwrap();
        let b: Token = "a.b.d".parse().unwrap();

        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert!(!format!("{a:?}").contains("a.b.c"));
    }
}
