//! [`Query`] collection related to [`Order`]s.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Profile;
use crate::{
    domain::{order, profile, Order},
    infra::{database, Database},
    read, Query, Service,
};

use super::DatabaseQuery;

/// Queries an [`Order`] by its [`order::Id`].
pub type ById = DatabaseQuery<By<Option<Order>, order::Id>>;

/// Queries the [`Order`]s placed by a resident [`Profile`].
pub type OfCustomer = DatabaseQuery<By<Vec<Order>, read::order::OfCustomer>>;

/// [`Query`] arranging the [`Order`]s of a provider into its
/// [`read::order::Board`].
#[derive(Clone, Copy, Debug)]
pub struct Board {
    /// ID of the provider [`Profile`].
    pub provider_id: profile::Id,
}

impl<Db> Query<Board> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Order>, read::order::OfProvider>>,
        Ok = Vec<Order>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::order::Board;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Board { provider_id }: Board,
    ) -> Result<Self::Ok, Self::Err> {
        let orders = self
            .database()
            .execute(Select(By::<Vec<Order>, _>::new(
                read::order::OfProvider(provider_id),
            )))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(read::order::Board::arrange(orders))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, DateTime};

    use crate::{
        domain::{
            offer,
            order::{self, Status},
            profile, Order,
        },
        test_support::service,
        Query as _,
    };

    use super::Board;

    #[tokio::test]
    async fn lists_newest_first_per_tab() {
        let svc = service();
        let provider_id = profile::Id::new();
        let mut placed = vec![];
        for (secs, status) in
            (0..).zip([Status::New, Status::New, Status::Cancelled])
        {
            let mut o = Order::new(
                profile::Id::new(),
                provider_id,
                None,
                vec![order::Item::new(
                    offer::Id::new(),
                    order::Quantity::ONE,
                    "2.00".parse().unwrap(),
                )],
            );
            o.status = status;
            o.created_at = (DateTime::now() + Duration::from_secs(secs)).coerce();
            svc.database().execute(Insert(o.clone())).await.unwrap();
            placed.push(o);
        }

        let board = svc.execute(Board { provider_id }).await.unwrap();

        assert_eq!(board.new.len(), 2);
        assert_eq!(board.new[0].id, placed[1].id);
        assert_eq!(board.new[0].items.len(), 1);
        assert!(board.preparing.is_empty());
        assert!(board.ready.is_empty());
    }
}
