//! GraphQL [`Subscription`]s definitions.

use common::DateTime;
use futures::{
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::graphql_subscription;

use crate::{context, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription waiting for the current authenticated session to expire.
    ///
    /// Once it does, the session `Cart` is dropped and the stream yields an
    /// error.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if the current session is not
    ///                              authenticated or session expired.
    pub async fn wait_session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<bool, Error>>, Error> {
        let session = ctx.current_session().await?;
        let sessions = ctx.sessions().clone();
        let fingerprint = session.token.fingerprint();
        let timeout = session.expires_at - DateTime::now();

        Ok(stream::once(async move {
            tokio::time::sleep(timeout).await;
            if sessions.end(fingerprint).await {
                tracing::debug!(
                    profile_id = %session.profile_id(),
                    "expired session state dropped",
                );
            }
            Err(context::AuthError::AuthorizationRequired.into())
        })
        .boxed())
    }
}
