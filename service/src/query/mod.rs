//! [`Query`] definition.

pub mod booking;
pub mod catalog;
pub mod metrics;
pub mod offer;
pub mod order;
pub mod profile;
pub mod schedule;
pub mod settings;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

pub use self::{
    catalog::Catalog, metrics::Overview, order::Board, schedule::Schedule,
    settings::Branding,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::{
            profile::{ProviderKind, Role},
            Profile,
        },
        read,
        test_support::{profile, service},
        Query as _,
    };

    use super::profile::{ById, Providers};

    #[tokio::test]
    async fn selects_through_database() {
        let svc = service();
        let resident = profile(Role::Resident);
        let mut baker = profile(Role::Provider);
        baker.provider_kind = Some(ProviderKind::Product);
        let stylist = profile(Role::Provider);
        for p in [&resident, &baker, &stylist] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }

        let found = svc.execute(ById::by(resident.id)).await.unwrap();
        assert_eq!(found.map(|p: Profile| p.id), Some(resident.id));

        let all = svc
            .execute(Providers::by(read::profile::Providers { kind: None }))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let bakers = svc
            .execute(Providers::by(read::profile::Providers {
                kind: Some(ProviderKind::Product),
            }))
            .await
            .unwrap();
        assert_eq!(bakers.len(), 1);
        assert_eq!(bakers[0].id, baker.id);
    }
}
