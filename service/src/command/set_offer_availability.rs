//! [`Command`] for toggling availability of an [`Offer`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{offer::Product, Profile};
use crate::{
    domain::{offer, profile, Offer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for toggling availability of an [`Offer`] by its owner.
///
/// Sets the active flag of an [`offer::Service`], or the availability flag of
/// a [`Product`].
#[derive(Clone, Copy, Debug)]
pub struct SetOfferAvailability {
    /// ID of the [`Offer`] to be updated.
    pub offer_id: offer::Id,

    /// ID of the [`Profile`] performing the update.
    pub initiator_id: profile::Id,

    /// Whether the [`Offer`] should be available.
    pub available: bool,
}

impl<Db> Command<SetOfferAvailability> for Service<Db>
where
    Db: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<Update<Offer>, Err = Traced<database::Error>>,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetOfferAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetOfferAvailability {
            offer_id,
            initiator_id,
            available,
        } = cmd;

        let mut offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;
        if offer.owner_id() != initiator_id {
            return Err(tracerr::new!(E::NotOfferOwner(initiator_id)));
        }
        if offer.is_available() == available {
            return Ok(offer);
        }

        offer.set_available(available);
        self.database()
            .execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(offer)
    }
}

/// Error of [`SetOfferAvailability`] [`Command`] execution.
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
        read::Catalog,
        test_support::{product, service, service_offer},
        Command as _,
    };

    use super::{ExecutionError, SetOfferAvailability};

    #[tokio::test]
    async fn owner_hides_and_shows_offers() {
        let svc = service();
        let provider_id = profile::Id::new();
        let haircut = Offer::from(service_offer(provider_id, "40.00"));
        let cake = Offer::from(product(provider_id, "9.90", Purpose::Store));
        for o in [&haircut, &cake] {
            svc.database().execute(Insert(o.clone())).await.unwrap();
        }

        for o in [&haircut, &cake] {
            let hidden = svc
                .execute(SetOfferAvailability {
                    offer_id: o.id(),
                    initiator_id: provider_id,
                    available: false,
                })
                .await
                .unwrap();
            assert!(!hidden.is_available());
        }
        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(cake.id())))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_available());
        let catalog = Catalog::assemble(provider_id, [stored]);
        assert!(catalog.products.is_empty());

        let shown = svc
            .execute(SetOfferAvailability {
                offer_id: haircut.id(),
                initiator_id: provider_id,
                available: true,
            })
            .await
            .unwrap();
        assert!(shown.is_available());
    }

    #[tokio::test]
    async fn rejects_strangers_and_unknown_offers() {
        let svc = service();
        let provider_id = profile::Id::new();
        let haircut = Offer::from(service_offer(provider_id, "40.00"));
        svc.database().execute(Insert(haircut.clone())).await.unwrap();

        let err = svc
            .execute(SetOfferAvailability {
                offer_id: haircut.id(),
                initiator_id: profile::Id::new(),
                available: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotOfferOwner(_)));

        let err = svc
            .execute(SetOfferAvailability {
                offer_id: crate::domain::offer::Id::new(),
                initiator_id: provider_id,
                available: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::OfferNotExists(_)));
    }
}
