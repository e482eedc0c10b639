//! [`Overview`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{profile, Profile},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] of the platform [`read::Overview`], available to admins only.
#[derive(Clone, Copy, Debug)]
pub struct Overview {
    /// ID of the [`Profile`] requesting the [`read::Overview`].
    pub initiator_id: profile::Id,
}

impl<Db> Query<Overview> for Service<Db>
where
    Db: Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::Overview, ()>>,
            Ok = read::Overview,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::Overview;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Overview { initiator_id }: Overview,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let initiator = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_admin {
            return Err(tracerr::new!(E::NotAdmin(initiator_id)));
        }

        self.database()
            .execute(Select(By::<read::Overview, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`Overview`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] is not an admin.
    #[display("`Profile(id: {_0})` is not an admin")]
    #[from(ignore)]
    NotAdmin(#[error(not(source))] profile::Id),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::{offer::product::Purpose, order, profile::Role, Offer, Order},
        test_support::{product, profile, service, service_offer},
        Query as _,
    };

    use super::{ExecutionError, Overview};

    #[tokio::test]
    async fn counts_everything_for_admins() {
        let svc = service();
        let mut admin = profile(Role::Resident);
        admin.is_admin = true;
        let provider = profile(Role::Provider);
        for p in [&admin, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        for o in [
            Offer::from(service_offer(provider.id, "10.00")),
            Offer::from(product(provider.id, "2.00", Purpose::Store)),
            Offer::from(product(admin.id, "5.00", Purpose::Desapego)),
        ] {
            svc.database().execute(Insert(o)).await.unwrap();
        }
        let item = |price: &str| {
            order::Item::new(
                crate::domain::offer::Id::new(),
                order::Quantity::ONE,
                price.parse().unwrap(),
            )
        };
        for price in ["3.50", "6.50"] {
            let o = Order::new(admin.id, provider.id, None, vec![item(price)]);
            svc.database().execute(Insert(o)).await.unwrap();
        }

        let overview = svc
            .execute(Overview {
                initiator_id: admin.id,
            })
            .await
            .unwrap();

        assert_eq!(overview.profiles, 2);
        assert_eq!(overview.services, 1);
        assert_eq!(overview.products, 2);
        assert_eq!(overview.bookings, 0);
        assert_eq!(overview.orders, 2);
        assert_eq!(overview.revenue, "10.00".parse().unwrap());
    }

    #[tokio::test]
    async fn rejects_non_admins() {
        let svc = service();
        let provider = profile(Role::Provider);
        svc.database().execute(Insert(provider.clone())).await.unwrap();

        let err = svc
            .execute(Overview {
                initiator_id: provider.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::NotAdmin(_)));
    }
}
