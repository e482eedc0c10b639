//! [`Command`] for moving an [`Order`] through its lifecycle.

use common::operations::{By, Commit, Lock, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Profile;
use crate::{
    domain::{order, profile, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for changing [`order::Status`] of an [`Order`] by its
/// provider.
#[derive(Clone, Copy, Debug)]
pub struct UpdateOrderStatus {
    /// ID of the [`Order`] to be updated.
    pub order_id: order::Id,

    /// ID of the provider [`Profile`] performing the update.
    pub initiator_id: profile::Id,

    /// New [`order::Status`] of the [`Order`].
    pub status: order::Status,
}

impl<Db> Command<UpdateOrderStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Order, order::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Order>, order::Id>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<Update<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateOrderStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateOrderStatus {
            order_id,
            initiator_id,
            status,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Order`.
        tx.execute(Lock(By::new(order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut order = tx
            .execute(Select(By::<Option<Order>, _>::new(order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;

        if order.provider_id != initiator_id {
            return Err(tracerr::new!(E::NotOrderProvider(initiator_id)));
        }

        order.transition(status).map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`UpdateOrderStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`order::Status`] can't be changed this way.
    #[display("{_0}")]
    InvalidTransition(order::InvalidTransition),

    /// [`Profile`] doesn't sell the [`Order`].
    #[display("`Profile(id: {_0})` is not the provider of the `Order`")]
    #[from(ignore)]
    NotOrderProvider(#[error(not(source))] profile::Id),

    /// [`Order`] with the provided ID does not exist.
    #[display("`Order(id: {_0})` does not exist")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] order::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            order::{self, Status},
            profile::{self, Role},
            Order,
        },
        test_support::{profile, service},
        Command as _,
    };

    use super::{ExecutionError, UpdateOrderStatus};

    async fn placed(
        svc: &crate::Service<crate::infra::Memory>,
    ) -> (Order, profile::Id) {
        let provider = profile(Role::Provider);
        let order = Order::new(
            profile::Id::new(),
            provider.id,
            None,
            vec![order::Item::new(
                crate::domain::offer::Id::new(),
                order::Quantity::ONE,
                "5.00".parse().unwrap(),
            )],
        );
        svc.database().execute(Insert(order.clone())).await.unwrap();
        (order, provider.id)
    }

    #[tokio::test]
    async fn walks_the_lifecycle() {
        let svc = service();
        let (order, provider_id) = placed(&svc).await;

        for status in [Status::Preparing, Status::Ready, Status::Completed] {
            let updated = svc
                .execute(UpdateOrderStatus {
                    order_id: order.id,
                    initiator_id: provider_id,
                    status,
                })
                .await
                .unwrap();
            assert_eq!(updated.status, status);
            assert_eq!(updated.items, order.items);
        }
    }

    #[tokio::test]
    async fn rejects_invalid_transition_and_strangers() {
        let svc = service();
        let (order, provider_id) = placed(&svc).await;

        let err = svc
            .execute(UpdateOrderStatus {
                order_id: order.id,
                initiator_id: provider_id,
                status: Status::Ready,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::InvalidTransition(order::InvalidTransition {
                from: Status::New,
                to: Status::Ready,
            }),
        ));

        let err = svc
            .execute(UpdateOrderStatus {
                order_id: order.id,
                initiator_id: profile::Id::new(),
                status: Status::Preparing,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::NotOrderProvider(_),
        ));

        let stored = svc
            .database()
            .execute(Select(By::<Option<Order>, _>::new(order.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, Status::New);

        let err = svc
            .execute(UpdateOrderStatus {
                order_id: order::Id::new(),
                initiator_id: provider_id,
                status: Status::Preparing,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::OrderNotExists(_)));
    }
}
