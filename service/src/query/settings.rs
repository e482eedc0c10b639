//! [`Branding`] definition.

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::settings,
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] of the platform [`settings::Branding`].
///
/// Never fails: a storage failure or missing settings degrade to the default
/// [`settings::Branding`] without any logo.
#[derive(Clone, Copy, Debug, Default)]
pub struct Branding;

impl<Db> Query<Branding> for Service<Db>
where
    Db: Database<
        Select<By<Option<settings::Branding>, ()>>,
        Ok = Option<settings::Branding>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = settings::Branding;
    type Err = Infallible;

    async fn execute(&self, _: Branding) -> Result<Self::Ok, Self::Err> {
        let branding = self
            .database()
            .execute(Select(By::<Option<settings::Branding>, _>::new(())))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("failed to load `Branding`, no logo shown: {e}");
                None
            });

        Ok(branding.unwrap_or_default())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Update;

    use crate::{
        domain::settings, infra::memory::Table, test_support::service,
        Query as _,
    };

    use super::Branding;

    #[tokio::test]
    async fn returns_stored_logo() {
        let svc = service();
        let logo = "https://cdn.example.com/logo.svg".parse().unwrap();
        svc.database()
            .execute(Update(settings::Branding {
                logo_url: Some(logo),
                updated_at: None,
            }))
            .await
            .unwrap();

        let branding = svc.execute(Branding).await.unwrap();

        assert!(branding.logo_url.is_some());
    }

    #[tokio::test]
    async fn degrades_to_no_logo() {
        let svc = service();
        assert!(svc.execute(Branding).await.unwrap().logo_url.is_none());

        svc.database().fail_on(Table::Settings);
        assert!(svc.execute(Branding).await.unwrap().logo_url.is_none());
    }
}
