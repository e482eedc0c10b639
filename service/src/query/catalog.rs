//! [`Catalog`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Profile;
use crate::{
    domain::{profile, Offer},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] resolving the storefront [`read::Catalog`] of a provider.
///
/// An unknown provider has an empty [`read::Catalog`].
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    /// ID of the provider [`Profile`].
    pub provider_id: profile::Id,
}

impl<Db> Query<Catalog> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Offer>, read::offer::OwnedBy>>,
        Ok = Vec<Offer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::Catalog;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Catalog { provider_id }: Catalog,
    ) -> Result<Self::Ok, Self::Err> {
        let offers = self
            .database()
            .execute(Select(By::<Vec<Offer>, _>::new(read::offer::OwnedBy(
                provider_id,
            ))))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(read::Catalog::assemble(provider_id, offers))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::{offer::product::Purpose, profile, Offer},
        infra::memory::Table,
        read::catalog::Mode,
        test_support::{product, service, service_offer},
        Query as _,
    };

    use super::Catalog;

    #[tokio::test]
    async fn resolves_storefront_of_provider() {
        let svc = service();
        let provider_id = profile::Id::new();
        let offers = [
            Offer::from(service_offer(provider_id, "60.00")),
            Offer::from(product(provider_id, "4.50", Purpose::Store)),
            Offer::from(product(provider_id, "90.00", Purpose::Desapego)),
            Offer::from(product(profile::Id::new(), "4.50", Purpose::Store)),
        ];
        for o in offers {
            svc.database().execute(Insert(o)).await.unwrap();
        }

        let catalog = svc.execute(Catalog { provider_id }).await.unwrap();

        assert_eq!(catalog.services.len(), 1);
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.mode(), Mode::Hybrid);
    }

    #[tokio::test]
    async fn unknown_provider_has_empty_catalog() {
        let svc = service();

        let catalog = svc
            .execute(Catalog {
                provider_id: profile::Id::new(),
            })
            .await
            .unwrap();

        assert_eq!(catalog.mode(), Mode::Empty);
    }

    #[tokio::test]
    async fn propagates_storage_failure() {
        let svc = service();
        svc.database().fail_on(Table::Offers);

        let res = svc
            .execute(Catalog {
                provider_id: profile::Id::new(),
            })
            .await;

        assert!(res.is_err());
    }
}
