//! Session-scoped state definitions.

use std::{collections::HashMap, sync::Arc};

use common::DateTime;
use service::domain::{session::Fingerprint, Cart};
use tokio::sync::{Mutex, RwLock};

/// Registry of the state living as long as an authenticated session does.
///
/// Keyed by [`Fingerprint`]s, so raw access tokens are never kept. Entries of
/// expired sessions are swept on every new session registration.
#[derive(Clone, Debug, Default)]
pub struct Registry(Arc<RwLock<HashMap<Fingerprint, Entry>>>);

/// State of a single session in the [`Registry`].
#[derive(Debug)]
struct Entry {
    /// [`DateTime`] when the session expires.
    expires_at: DateTime,

    /// [`Cart`] of the session.
    cart: Arc<Mutex<Cart>>,
}

impl Registry {
    /// Creates a new empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`Cart`] of the session identified by the provided
    /// [`Fingerprint`], creating an empty one on the first use.
    ///
    /// [`None`] is returned if the session is expired already.
    pub async fn cart(
        &self,
        session: Fingerprint,
        expires_at: DateTime,
    ) -> Option<Arc<Mutex<Cart>>> {
        let now = DateTime::now();
        if expires_at <= now {
            return None;
        }

        if let Some(e) = self.0.read().await.get(&session) {
            return Some(Arc::clone(&e.cart));
        }

        let mut entries = self.0.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        if entries.len() < before {
            tracing::debug!(
                pruned = before - entries.len(),
                "expired sessions state pruned",
            );
        }
        let entry = entries.entry(session).or_insert_with(|| Entry {
            expires_at,
            cart: Arc::default(),
        });
        Some(Arc::clone(&entry.cart))
    }

    /// Drops all the state of the session identified by the provided
    /// [`Fingerprint`].
    ///
    /// Returns `false` if there was no state to drop.
    pub async fn end(&self, session: Fingerprint) -> bool {
        self.0.write().await.remove(&session).is_some()
    }
}

#[cfg(test)]
mod spec {
    use std::{sync::Arc, time::Duration};

    use common::DateTime;
    use service::domain::session::Token;

    use super::Registry;

    fn later() -> DateTime {
        DateTime::now() + Duration::from_secs(3600)
    }

    #[tokio::test]
    async fn keeps_one_cart_per_session() {
        let registry = Registry::new();
        let a = "a.b.c".parse::<Token>().unwrap().fingerprint();
        let b = "d.e.f".parse::<Token>().unwrap().fingerprint();

        let first = registry.cart(a, later()).await.unwrap();
        let again = registry.cart(a, later()).await.unwrap();
        let other = registry.cart(b, later()).await.unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn forgets_ended_and_expired_sessions() {
        let registry = Registry::new();
        let a = "a.b.c".parse::<Token>().unwrap().fingerprint();

        let first = registry.cart(a, later()).await.unwrap();
        assert!(registry.end(a).await);
        assert!(!registry.end(a).await);
        let second = registry.cart(a, later()).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        let expired = DateTime::from_unix_timestamp(1_000).unwrap();
        assert!(registry.cart(a, expired).await.is_none());
    }
}
