//! [`Command`] for deleting an [`Offer`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Profile;
use crate::{
    domain::{offer, profile, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Offer`] by its owner.
///
/// Already placed [`Order`]s and made [`Booking`]s keep their snapshotted
/// prices, so they are left intact.
///
/// [`Booking`]: crate::domain::Booking
/// [`Order`]: crate::domain::Order
#[derive(Clone, Copy, Debug)]
pub struct DeleteOffer {
    /// ID of the [`Offer`] to be deleted.
    pub offer_id: offer::Id,

    /// ID of the [`Profile`] performing the deletion.
    pub initiator_id: profile::Id,
}

impl<Db> Command<DeleteOffer> for Service<Db>
where
    Db: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Offer, offer::Id>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteOffer {
            offer_id,
            initiator_id,
        } = cmd;

        let offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;
        if offer.owner_id() != initiator_id {
            return Err(tracerr::new!(E::NotOfferOwner(initiator_id)));
        }

        self.database()
            .execute(Delete(By::<Offer, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(offer_id = %offer_id, kind = %offer.kind(), "offer deleted");

        Ok(offer)
    }
}

/// Error of [`DeleteOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] doesn't own the [`Offer`].
    #[display("`Profile(id: {_0})` is not the owner of the `Offer`")]
    #[from(ignore)]
    NotOfferOwner(#[error(not(source))] profile::Id),

    /// [`Offer`] with the provided ID does not exist.
    #[display("`Offer(id: {_0})` does not exist")]
    #[from(ignore)]
    OfferNotExists(#[error(not(source))] offer::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{offer::product::Purpose, profile, Offer},
        test_support::{product, service},
        Command as _,
    };

    use super::{DeleteOffer, ExecutionError};

    #[tokio::test]
    async fn only_owner_deletes() {
        let svc = service();
        let seller_id = profile::Id::new();
        let bike = Offer::from(product(seller_id, "150.00", Purpose::Desapego));
        svc.database().execute(Insert(bike.clone())).await.unwrap();

        let err = svc
            .execute(DeleteOffer {
                offer_id: bike.id(),
                initiator_id: profile::Id::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotOfferOwner(_)));

        let deleted = svc
            .execute(DeleteOffer {
                offer_id: bike.id(),
                initiator_id: seller_id,
            })
            .await
            .unwrap();
        assert_eq!(deleted.id(), bike.id());

        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(bike.id())))
            .await
            .unwrap();
        assert!(stored.is_none());

        let err = svc
            .execute(DeleteOffer {
                offer_id: bike.id(),
                initiator_id: seller_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::OfferNotExists(_)));
    }
}
