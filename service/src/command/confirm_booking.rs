//! [`Command`] for confirming a [`Booking`] checkout.

use std::collections::HashMap;

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, DayIndex},
        cart::Upsell,
        offer::{self, product::Purpose},
        order, profile,
        schedule::{self, Client, Period},
        Booking, Offer, Order, Profile, Slot,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for booking a service appointment, optionally ordering store
/// products of the same provider along with it.
///
/// The [`Booking`], the pending [`Slot`] and the upsell [`Order`] are
/// persisted atomically.
#[derive(Clone, Debug)]
pub struct ConfirmBooking {
    /// ID of the resident [`Profile`] booking the appointment.
    pub customer_id: profile::Id,

    /// ID of the booked [`offer::Service`].
    pub service_id: offer::Id,

    /// [`DayIndex`] of the appointment.
    pub day: DayIndex,

    /// [`Period`] of the appointment.
    pub period: Period,

    /// [`Upsell`] to be ordered along with the appointment.
    pub upsell: Upsell,
}

/// Result of the [`ConfirmBooking`] [`Command`].
#[derive(Clone, Debug)]
pub struct Confirmation {
    /// Created [`Booking`].
    pub booking: Booking,

    /// [`Order`] created out of the [`Upsell`], if it wasn't empty.
    pub order: Option<Order>,
}

impl<Db> Command<ConfirmBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<offer::Id, Offer>, Vec<offer::Id>>>,
            Ok = HashMap<offer::Id, Offer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Slot, schedule::Key>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Slot>, schedule::Key>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Insert<Slot>, Err = Traced<database::Error>>
        + Database<Insert<Order>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Confirmation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ConfirmBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ConfirmBooking {
            customer_id,
            service_id,
            day,
            period,
            upsell,
        } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let service = match self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            Some(Offer::Service(s)) if s.is_active => s,
            Some(Offer::Service(_) | Offer::Product(_)) | None => {
                return Err(tracerr::new!(E::ServiceNotExists(service_id)));
            }
        };

        let now = self.local_time();
        let date = day
            .resolve(now.date)
            .ok_or(E::DayOutOfRange(day))
            .map_err(tracerr::wrap!())?;
        if period.is_past(date, now) {
            return Err(tracerr::new!(E::PeriodPast(period)));
        }

        let items = if upsell.is_empty() {
            vec![]
        } else {
            let ids = upsell.iter().map(|(id, _)| id).collect::<Vec<_>>();
            let products = self
                .database()
                .execute(Select(By::<HashMap<_, Offer>, _>::new(ids)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            upsell
                .iter()
                .filter_map(|(id, quantity)| match products.get(&id) {
                    Some(Offer::Product(p))
                        if p.is_available
                            && p.purpose == Purpose::Store
                            && p.seller_id == service.provider_id =>
                    {
                        Some(order::Item::new(id, quantity, p.price))
                    }
                    Some(Offer::Product(_) | Offer::Service(_)) | None => {
                        tracing::debug!(
                            product_id = %id,
                            "upsell product is not on sale, skipping",
                        );
                        None
                    }
                })
                .collect()
        };

        let key = schedule::Key {
            provider_id: service.provider_id,
            date,
            period,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent bookings of the same `Slot`.
        tx.execute(Lock(By::new(key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if tx
            .execute(Select(By::<Option<Slot>, _>::new(key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some_and(|s| !s.is_free())
        {
            return Err(tracerr::new!(E::SlotUnavailable(period)));
        }

        let booking = Booking {
            id: booking::Id::new(),
            service_id: service.id,
            provider_id: service.provider_id,
            customer_id: customer.id,
            date,
            period,
            total_price: service.price,
            status: booking::Status::Pending,
            created_at: self.now().coerce(),
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let rest = async {
            let mut slot = Slot::free(key);
            slot.request(
                booking.id,
                Client {
                    service: service.title.clone(),
                    address: customer
                        .address
                        .clone()
                        .unwrap_or_else(profile::Address::placeholder),
                    phone: customer.phone.clone(),
                    name: customer.name.clone(),
                },
            )
            .map_err(|_| tracerr::new!(E::SlotUnavailable(period)))?;
            tx.execute(Insert(slot)).await.map_err(|e| {
                if e.as_ref().is_conflict() {
                    tracerr::new!(E::SlotUnavailable(period))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;

            let order = (!items.is_empty()).then(|| {
                Order::new(
                    customer.id,
                    service.provider_id,
                    customer.address.clone(),
                    items,
                )
            });
            if let Some(o) = &order {
                tx.execute(Insert(o.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }

            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            Ok::<_, Traced<E>>(order)
        };
        let order = rest.await.inspect_err(|e| {
            tracing::error!(
                booking_id = %booking.id,
                customer_id = %booking.customer_id,
                service_id = %booking.service_id,
                date = %booking.date,
                period = %booking.period,
                "partial checkout aborted: {e}",
            );
        })?;

        Ok(Confirmation { booking, order })
    }
}

/// Error of [`ConfirmBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`DayIndex`] resolves into a [`Date`] out of the calendar.
    ///
    /// [`Date`]: common::Date
    #[display("Day #{_0} is out of the calendar")]
    DayOutOfRange(#[error(not(source))] DayIndex),

    /// [`Period`] is already over.
    #[display("`Period({_0})` is already over")]
    PeriodPast(#[error(not(source))] Period),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    ProfileNotExists(#[error(not(source))] profile::Id),

    /// Active [`offer::Service`] with the provided ID does not exist.
    #[display("`Service(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] offer::Id),

    /// [`Slot`] of the [`Period`] is taken already.
    #[display("`Slot(period: {_0})` is not available")]
    SlotUnavailable(#[error(not(source))] Period),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            booking::{self, DayIndex},
            cart::Upsell,
            offer::product::Purpose,
            order,
            profile::Role,
            schedule::{self, Period, Source, Status},
            Booking, Offer, Order, Slot,
        },
        infra::{memory::Table, Memory},
        read,
        test_support::{product, profile, service, service_at, service_offer},
        Command as _, Service,
    };

    use super::{ConfirmBooking, ExecutionError};

    /// Returns the first [`Period`] that is not over at the moment.
    fn open_period(svc: &Service<Memory>) -> (DayIndex, Period) {
        let now = svc.local_time();
        Period::ALL
            .iter()
            .find(|p| !p.is_past(now.date, now))
            .map_or((DayIndex::new(1).unwrap(), Period::M1), |&p| {
                (DayIndex::new(0).unwrap(), p)
            })
    }

    #[tokio::test]
    async fn books_with_upsell_atomically() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        let haircut = service_offer(provider.id, "80.00");
        let cake = product(provider.id, "12.50", Purpose::Store);
        let foreign = product(resident.id, "1.00", Purpose::Store);
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        for o in [
            Offer::from(haircut.clone()),
            cake.clone().into(),
            foreign.clone().into(),
        ] {
            svc.database().execute(Insert(o)).await.unwrap();
        }
        let (day, period) = open_period(&svc);

        let done = svc
            .execute(ConfirmBooking {
                customer_id: resident.id,
                service_id: haircut.id,
                day,
                period,
                upsell: Upsell::try_from(vec![(cake.id, 2), (foreign.id, 1)]).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(done.booking.status, booking::Status::Pending);
        assert_eq!(done.booking.total_price, haircut.price);
        let order = done.order.expect("upsell order");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, "25.00".parse().unwrap());
        assert_eq!(order.status, order::Status::New);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Order>, _>::new(order.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items, order.items);

        let slot = svc
            .database()
            .execute(Select(By::<Option<Slot>, _>::new(schedule::Key {
                provider_id: provider.id,
                date: done.booking.date,
                period,
            })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(slot.status, Status::Pending);
        assert_eq!(slot.source, Some(Source::Platform));
        assert_eq!(slot.booking_id, Some(done.booking.id));
        assert_eq!(
            slot.client.map(|c| c.name.to_string()),
            Some(resident.name.to_string()),
        );
    }

    #[tokio::test]
    async fn rejects_taken_slot() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        let haircut = service_offer(provider.id, "80.00");
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        svc.database()
            .execute(Insert(Offer::from(haircut.clone())))
            .await
            .unwrap();
        let (day, period) = open_period(&svc);
        let cmd = ConfirmBooking {
            customer_id: resident.id,
            service_id: haircut.id,
            day,
            period,
            upsell: Upsell::default(),
        };

        let first = svc.execute(cmd.clone()).await.unwrap();
        assert!(first.order.is_none());

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::SlotUnavailable(p) if p == period,
        ));

        let bookings = svc
            .database()
            .execute(Select(By::<Vec<Booking>, _>::new(
                read::booking::OfCustomer(resident.id),
            )))
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn rolls_back_on_item_failure() {
        let svc = service();
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        let haircut = service_offer(provider.id, "80.00");
        let cake = product(provider.id, "12.50", Purpose::Store);
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        for o in [Offer::from(haircut.clone()), cake.clone().into()] {
            svc.database().execute(Insert(o)).await.unwrap();
        }
        svc.database().fail_on(Table::OrderItems);
        let (day, period) = open_period(&svc);

        let err = svc
            .execute(ConfirmBooking {
                customer_id: resident.id,
                service_id: haircut.id,
                day,
                period,
                upsell: Upsell::try_from(vec![(cake.id, 1)]).unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::Db(_)));

        let bookings = svc
            .database()
            .execute(Select(By::<Vec<Booking>, _>::new(
                read::booking::OfCustomer(resident.id),
            )))
            .await
            .unwrap();
        assert!(bookings.is_empty());
        let orders = svc
            .database()
            .execute(Select(By::<Vec<Order>, _>::new(
                read::order::OfCustomer(resident.id),
            )))
            .await
            .unwrap();
        assert!(orders.is_empty());
        let slots = svc
            .database()
            .execute(Select(By::<Vec<Slot>, _>::new(read::schedule::Span {
                provider_id: provider.id,
                from: svc.local_time().date,
                to: svc.local_time().date.checked_add_days(30).unwrap(),
            })))
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn rejects_past_period_and_inactive_service() {
        let svc = service_at((2026, 10, 19), 12);
        let resident = profile(Role::Resident);
        let provider = profile(Role::Provider);
        let mut haircut = service_offer(provider.id, "80.00");
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        svc.database()
            .execute(Insert(Offer::from(haircut.clone())))
            .await
            .unwrap();
        let request = |day, period| ConfirmBooking {
            customer_id: resident.id,
            service_id: haircut.id,
            day: DayIndex::new(day).unwrap(),
            period,
            upsell: Upsell::default(),
        };

        for past in [Period::M1, Period::M2] {
            let err = svc.execute(request(0, past)).await.unwrap_err();
            assert!(matches!(
                err.into_inner(),
                ExecutionError::PeriodPast(p) if p == past,
            ));
        }
        let open = svc.execute(request(0, Period::T1)).await.unwrap();
        assert_eq!(open.booking.date, svc.local_time().date);
        let tomorrow = svc.execute(request(1, Period::M1)).await.unwrap();
        assert_eq!(
            tomorrow.booking.date.days_since(svc.local_time().date),
            1,
        );

        haircut.is_active = false;
        svc.database()
            .execute(Insert(Offer::from(haircut.clone())))
            .await
            .unwrap();
        let err = svc
            .execute(ConfirmBooking {
                customer_id: resident.id,
                service_id: haircut.id,
                day: DayIndex::new(1).unwrap(),
                period: Period::M1,
                upsell: Upsell::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::ServiceNotExists(id) if id == haircut.id,
        ));
    }
}
