//! Postgres database clients, handing out pooled [`Connection`]s.
//!
//! [`Connection`]: super::Connection

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};
