//! [`Command`] for creating a new [`Offer`].

use common::{
    operations::{By, Insert, Select},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        offer::{
            self,
            product::{Category, Condition, Purpose},
            service::Minutes,
            Description, ImageUrl, Product, Service as ServiceOffer, Title,
        },
        profile, Offer, Profile,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Offer`] on behalf of its owner.
#[derive(Clone, Debug)]
pub struct CreateOffer {
    /// ID of the [`Profile`] owning the new [`Offer`].
    pub owner_id: profile::Id,

    /// [`Draft`] of the new [`Offer`].
    pub draft: Draft,
}

/// Details of a new [`Offer`].
#[derive(Clone, Debug)]
pub enum Draft {
    /// Bookable [`ServiceOffer`] of a provider.
    Service {
        /// [`Title`] of the [`ServiceOffer`].
        title: Title,

        /// [`Description`] of the [`ServiceOffer`].
        description: Description,

        /// Price of the [`ServiceOffer`].
        price: Money,

        /// Expected [`Minutes`] the [`ServiceOffer`] takes.
        duration: Option<Minutes>,

        /// [`ImageUrl`] of the [`ServiceOffer`].
        image: Option<ImageUrl>,
    },

    /// [`Product`] of a provider storefront.
    StoreProduct {
        /// [`Title`] of the [`Product`].
        title: Title,

        /// [`Description`] of the [`Product`].
        description: Description,

        /// Price of the [`Product`].
        price: Money,

        /// [`ImageUrl`]s of the [`Product`].
        images: Vec<ImageUrl>,

        /// [`Category`] of the [`Product`].
        category: Option<Category>,
    },

    /// Secondhand [`Product`] listed by any resident.
    Listing {
        /// [`Title`] of the [`Product`].
        title: Title,

        /// [`Description`] of the [`Product`].
        description: Description,

        /// Asking price of the [`Product`].
        price: Money,

        /// [`ImageUrl`]s of the [`Product`].
        images: Vec<ImageUrl>,

        /// [`Condition`] of the [`Product`].
        condition: Option<Condition>,

        /// [`Category`] of the [`Product`].
        category: Option<Category>,

        /// Phone to negotiate through, defaulting to the [`Profile`] one.
        contact_phone: Option<profile::Phone>,
    },
}

impl<Db> Command<CreateOffer> for Service<Db>
where
    Db: Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<Insert<Offer>, Err = Traced<database::Error>>,
{
    type Ok = Offer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOffer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOffer { owner_id, draft } = cmd;

        let owner = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(owner_id))
            .map_err(tracerr::wrap!())?;
        if !matches!(draft, Draft::Listing { .. }) && !owner.is_provider() {
            return Err(tracerr::new!(E::NotProvider(owner_id)));
        }

        let id = offer::Id::new();
        let created_at = self.now().coerce();
        let offer = match draft {
            Draft::Service {
                title,
                description,
                price,
                duration,
                image,
            } => Offer::Service(ServiceOffer {
                id,
                provider_id: owner.id,
                title,
                description,
                price,
                duration,
                image,
                is_active: true,
                created_at,
            }),
            Draft::StoreProduct {
                title,
                description,
                price,
                images,
                category,
            } => Offer::Product(Product {
                id,
                seller_id: owner.id,
                title,
                description,
                price,
                images,
                is_available: true,
                purpose: Purpose::Store,
                condition: None,
                category,
                contact_phone: None,
                created_at,
            }),
            Draft::Listing {
                title,
                description,
                price,
                images,
                condition,
                category,
                contact_phone,
            } => Offer::Product(Product {
                id,
                seller_id: owner.id,
                title,
                description,
                price,
                images,
                is_available: true,
                purpose: Purpose::Desapego,
                condition,
                category,
                contact_phone: contact_phone.or(owner.phone),
                created_at,
            }),
        };

        self.database()
            .execute(Insert(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(offer)
    }
}

/// Error of [`CreateOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] is not a provider, while the [`Draft`] requires one.
    #[display("`Profile(id: {_0})` is not a provider")]
    #[from(ignore)]
    NotProvider(#[error(not(source))] profile::Id),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            offer::{product::Purpose, Description, Product},
            profile::Role,
            Offer,
        },
        read,
        test_support::{profile, service},
        Command as _,
    };

    use super::{CreateOffer, Draft, ExecutionError};

    fn listing() -> Draft {
        Draft::Listing {
            title: "Bicicleta aro 26".parse().unwrap(),
            description: Description::default(),
            price: "150.00".parse().unwrap(),
            images: vec![],
            condition: None,
            category: None,
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn any_profile_lists_secondhand() {
        let svc = service();
        let resident = profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();

        let offer = svc
            .execute(CreateOffer {
                owner_id: resident.id,
                draft: listing(),
            })
            .await
            .unwrap();
        let Offer::Product(product) = &offer else {
            panic!("expected `Product`, got: {offer:?}");
        };
        assert_eq!(product.purpose, Purpose::Desapego);
        assert_eq!(product.contact_phone, resident.phone);

        let feed = svc
            .database()
            .execute(Select(By::<Vec<Product>, _>::new(
                read::offer::Secondhand,
            )))
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, offer.id());
    }

    #[tokio::test]
    async fn only_providers_create_services_and_store_products() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        let draft = Draft::Service {
            title: "Manicure".parse().unwrap(),
            description: Description::default(),
            price: "35.00".parse().unwrap(),
            duration: None,
            image: None,
        };

        let err = svc
            .execute(CreateOffer {
                owner_id: resident.id,
                draft: draft.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotProvider(_)));

        let offer = svc
            .execute(CreateOffer {
                owner_id: provider.id,
                draft,
            })
            .await
            .unwrap();
        assert!(offer.is_available());
        assert_eq!(offer.owner_id(), provider.id);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(offer.id())))
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
