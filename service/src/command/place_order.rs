//! [`Command`] for placing an [`Order`] out of a [`Cart`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Cart;
use crate::{
    domain::{cart, offer, order, profile, Order, Profile},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing a storefront [`Order`] out of the [`Cart`]
/// contents, with the prices snapshotted in it.
#[derive(Clone, Debug)]
pub struct PlaceOrder {
    /// ID of the resident [`Profile`] placing the [`Order`].
    pub customer_id: profile::Id,

    /// [`cart::Item`]s to be ordered.
    pub items: Vec<cart::Item>,
}

impl<Db> Command<PlaceOrder> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PlaceOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PlaceOrder { customer_id, items } = cmd;

        let provider_id = items
            .first()
            .map(|i| i.provider_id)
            .ok_or(E::EmptyCart)
            .map_err(tracerr::wrap!())?;
        if let Some(i) = items.iter().find(|i| i.kind != offer::Kind::Product) {
            return Err(tracerr::new!(E::NotProduct(i.offer_id)));
        }
        if let Some(i) = items.iter().find(|i| i.provider_id != provider_id) {
            return Err(tracerr::new!(E::MixedProviders(i.offer_id)));
        }

        let customer = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let order = Order::new(
            customer.id,
            provider_id,
            customer.address,
            items
                .iter()
                .map(|i| order::Item::new(i.offer_id, i.quantity, i.price))
                .collect(),
        );

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            "order placed",
        );

        Ok(order)
    }
}

/// Error of [`PlaceOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Cart`] has nothing to order.
    #[display("`Cart` is empty")]
    EmptyCart,

    /// [`Cart`] holds [`offer::Product`]s of different providers.
    #[display("`Offer(id: {_0})` is sold by another provider")]
    MixedProviders(#[error(not(source))] offer::Id),

    /// [`Cart`] holds something other than an [`offer::Product`].
    #[display("`Offer(id: {_0})` is not a product")]
    NotProduct(#[error(not(source))] offer::Id),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    ProfileNotExists(#[error(not(source))] profile::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            offer::product::Purpose, order, profile::Role, Cart, Offer, Order,
        },
        infra::memory::Table,
        read,
        test_support::{product, profile, service, service_offer},
        Command as _,
    };

    use super::{ExecutionError, PlaceOrder};

    #[tokio::test]
    async fn persists_cart_snapshot() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        svc.database().execute(Insert(resident.clone())).await.unwrap();
        let cake = Offer::from(product(provider.id, "12.50", Purpose::Store));
        let pie = Offer::from(product(provider.id, "7.00", Purpose::Store));
        let mut cart = Cart::default();
        cart.add(&cake);
        cart.add(&cake);
        cart.add(&pie);

        let order = svc
            .execute(PlaceOrder {
                customer_id: resident.id,
                items: cart.items().to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(order.total, cart.total());
        assert_eq!(order.status, order::Status::New);
        assert_eq!(order.provider_id, provider.id);
        assert_eq!(order.items.len(), 2);
        assert_eq!(
            order.delivery_address.to_string(),
            resident.address.unwrap().to_string(),
        );

        let stored = svc
            .database()
            .execute(Select(By::<Vec<Order>, _>::new(
                read::order::OfProvider(provider.id),
            )))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].items, order.items);
    }

    #[tokio::test]
    async fn rejects_invalid_carts() {
        let svc = service();
        let resident = profile(Role::Resident);
        svc.database().execute(Insert(resident.clone())).await.unwrap();
        let provider = profile(Role::Provider);
        let other = profile(Role::Provider);

        let err = svc
            .execute(PlaceOrder {
                customer_id: resident.id,
                items: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::EmptyCart));

        let mut cart = Cart::default();
        cart.add(&product(provider.id, "1.00", Purpose::Store).into());
        cart.add(&Offer::from(service_offer(provider.id, "50.00")));
        let err = svc
            .execute(PlaceOrder {
                customer_id: resident.id,
                items: cart.items().to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotProduct(_)));

        let mut cart = Cart::default();
        cart.add(&product(provider.id, "1.00", Purpose::Store).into());
        cart.add(&product(other.id, "2.00", Purpose::Store).into());
        let err = svc
            .execute(PlaceOrder {
                customer_id: resident.id,
                items: cart.items().to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::MixedProviders(_)));
    }

    #[tokio::test]
    async fn nothing_persists_on_failure() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        svc.database().execute(Insert(resident.clone())).await.unwrap();
        svc.database().fail_on(Table::OrderItems);
        let mut cart = Cart::default();
        cart.add(&product(provider.id, "3.00", Purpose::Store).into());

        let err = svc
            .execute(PlaceOrder {
                customer_id: resident.id,
                items: cart.items().to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::Db(_)));

        let stored = svc
            .database()
            .execute(Select(By::<Vec<Order>, _>::new(
                read::order::OfCustomer(resident.id),
            )))
            .await
            .unwrap();
        assert!(stored.is_empty());
    }
}
