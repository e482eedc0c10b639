//! [`Database`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(any(test, feature = "memory"))]
    /// [`Memory`] error.
    Memory(memory::Error),

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Checks whether this [`Error`] is caused by writing a row whose key is
    /// already taken.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            #[cfg(any(test, feature = "memory"))]
            Self::Memory(e) => matches!(e, memory::Error::Conflict(_)),

            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(None),
        }
    }
}
