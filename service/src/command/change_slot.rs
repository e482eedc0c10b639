//! [`Command`] for changing a [`Slot`] of a provider schedule.

use common::{
    operations::{By, Commit, Delete, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, WINDOW_DAYS},
        profile,
        schedule::{self, Client, Period, TransitionError, SCHEDULE_DAYS},
        Booking, Profile, Slot,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for changing a [`Slot`] of a provider schedule by the
/// provider.
#[derive(Clone, Debug)]
pub struct ChangeSlot {
    /// ID of the provider [`Profile`] owning the schedule.
    pub provider_id: profile::Id,

    /// [`Date`] of the [`Slot`].
    pub date: Date,

    /// [`Period`] of the [`Slot`].
    pub period: Period,

    /// [`Change`] to be applied.
    pub change: Change,
}

/// Change of a [`Slot`].
#[derive(Clone, Debug)]
pub enum Change {
    /// Book a free [`Slot`] for an off-platform [`Client`].
    Book(Client),

    /// Confirm a pending [`Slot`] along with its [`Booking`].
    Confirm,

    /// Free the [`Slot`], cancelling its [`Booking`] (if any).
    Reschedule,

    /// Close a free [`Slot`].
    Block,
}

impl<Db> Command<ChangeSlot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Profile>, profile::Id>>,
            Ok = Option<Profile>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Slot, schedule::Key>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Slot>, schedule::Key>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<Update<Slot>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Slot, schedule::Key>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Slot;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ChangeSlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeSlot {
            provider_id,
            date,
            period,
            change,
        } = cmd;

        // Platform requests span the whole booking window.
        let now = self.local_time();
        let window = match change {
            Change::Book(_) | Change::Block => SCHEDULE_DAYS,
            Change::Confirm | Change::Reschedule => u16::from(WINDOW_DAYS),
        };
        if !(0..i64::from(window)).contains(&date.days_since(now.date)) {
            return Err(tracerr::new!(E::DateOutOfSchedule(date)));
        }
        if matches!(change, Change::Book(_) | Change::Block)
            && period.is_past(date, now)
        {
            return Err(tracerr::new!(E::PeriodPast(period)));
        }

        let provider = self
            .database()
            .execute(Select(By::<Option<Profile>, _>::new(provider_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(provider_id))
            .map_err(tracerr::wrap!())?;
        if !provider.is_provider() {
            return Err(tracerr::new!(E::NotProvider(provider_id)));
        }

        let key = schedule::Key {
            provider_id,
            date,
            period,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent changes of the same `Slot`.
        tx.execute(Lock(By::new(key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut slot = tx
            .execute(Select(By::<Option<Slot>, _>::new(key)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Slot::free(key));

        let booking_id = match change {
            Change::Book(client) => {
                slot.book_manually(client)
                    .map_err(tracerr::from_and_wrap!(=> E))?;
                None
            }
            Change::Block => {
                slot.block().map_err(tracerr::from_and_wrap!(=> E))?;
                None
            }
            Change::Confirm => {
                slot.confirm().map_err(tracerr::from_and_wrap!(=> E))?;
                slot.booking_id
            }
            Change::Reschedule => slot.reschedule(),
        };

        if slot.is_free() {
            tx.execute(Delete(By::new(key)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        } else {
            tx.execute(Update(slot.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        if let Some(id) = booking_id {
            let booking = tx
                .execute(Select(By::<Option<Booking>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(mut booking) = booking {
                let changed = if slot.is_free() {
                    booking.cancel()
                } else {
                    booking.confirm()
                };
                if changed {
                    tx.execute(Update(booking))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                }
            } else {
                tracing::warn!(booking_id = %id, "`Slot` refers missing `Booking`");
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(slot)
    }
}

/// Error of [`ChangeSlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Date`] is outside of the provider schedule.
    #[display("`Date({_0})` is out of the schedule")]
    #[from(ignore)]
    DateOutOfSchedule(#[error(not(source))] Date),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Profile`] is not a provider.
    #[display("`Profile(id: {_0})` is not a provider")]
    #[from(ignore)]
    NotProvider(#[error(not(source))] profile::Id),

    /// [`Period`] is already over.
    #[display("`Period({_0})` is already over")]
    #[from(ignore)]
    PeriodPast(#[error(not(source))] Period),

    /// [`Profile`] with the provided ID does not exist.
    #[display("`Profile(id: {_0})` does not exist")]
    #[from(ignore)]
    ProfileNotExists(#[error(not(source))] profile::Id),

    /// [`Slot`] is not in the [`schedule::Status`] the [`Change`] requires.
    #[display("{_0}")]
    Transition(TransitionError),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::{confirm_booking::ConfirmBooking, Command as _},
        domain::{
            booking::{self, DayIndex},
            cart::Upsell,
            profile::Role,
            schedule::{self, Client, Period, Source, Status},
            Booking, Offer, Slot,
        },
        read,
        test_support::{profile, service, service_offer},
    };

    use super::{Change, ChangeSlot, ExecutionError};

    #[tokio::test]
    async fn books_blocks_and_frees_manually() {
        let svc = service();
        let provider = profile(Role::Provider);
        svc.database().execute(Insert(provider.clone())).await.unwrap();
        let date = svc.local_time().date.checked_add_days(1).unwrap();

        let booked = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date,
                period: Period::M2,
                change: Change::Book(Client::manual(None, None, None, None)),
            })
            .await
            .unwrap();
        assert_eq!(booked.status, Status::Booked);
        assert_eq!(booked.source, Some(Source::Manual));

        let err = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date,
                period: Period::M2,
                change: Change::Block,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::Transition(_)));

        let freed = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date,
                period: Period::M2,
                change: Change::Reschedule,
            })
            .await
            .unwrap();
        assert!(freed.is_free());
        assert!(freed.client.is_none());

        let stored = svc
            .database()
            .execute(Select(By::<Vec<Slot>, _>::new(read::schedule::Span {
                provider_id: provider.id,
                from: date,
                to: date.checked_add_days(1).unwrap(),
            })))
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn confirms_and_cancels_bound_booking() {
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
        let done = svc
            .execute(ConfirmBooking {
                customer_id: resident.id,
                service_id: haircut.id,
                day: DayIndex::new(2).unwrap(),
                period: Period::T1,
                upsell: Upsell::default(),
            })
            .await
            .unwrap();
        let booking_of = |id| Select(By::<Option<Booking>, _>::new(id));

        let confirmed = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date: done.booking.date,
                period: Period::T1,
                change: Change::Confirm,
            })
            .await
            .unwrap();
        assert_eq!(confirmed.status, Status::Booked);
        assert_eq!(confirmed.source, Some(Source::Platform));
        let b = svc
            .database()
            .execute(booking_of(done.booking.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(b.status, booking::Status::Confirmed);

        _ = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date: done.booking.date,
                period: Period::T1,
                change: Change::Reschedule,
            })
            .await
            .unwrap();
        let b = svc
            .database()
            .execute(booking_of(done.booking.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(b.status, booking::Status::Cancelled);
        let slot = svc
            .database()
            .execute(Select(By::<Option<Slot>, _>::new(schedule::Key {
                provider_id: provider.id,
                date: done.booking.date,
                period: Period::T1,
            })))
            .await
            .unwrap();
        assert!(slot.is_none());
    }

    #[tokio::test]
    async fn rejects_out_of_schedule_and_non_providers() {
        let svc = service();
        let provider = profile(Role::Provider);
        let resident = profile(Role::Resident);
        for p in [&resident, &provider] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        let today = svc.local_time().date;

        let err = svc
            .execute(ChangeSlot {
                provider_id: provider.id,
                date: today.checked_add_days(14).unwrap(),
                period: Period::M1,
                change: Change::Block,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::DateOutOfSchedule(_),
        ));

        let err = svc
            .execute(ChangeSlot {
                provider_id: resident.id,
                date: today.checked_add_days(1).unwrap(),
                period: Period::M1,
                change: Change::Block,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotProvider(_)));
    }

    #[tokio::test]
    async fn handles_requests_beyond_schedule() {
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
        let request = |period| ConfirmBooking {
            customer_id: resident.id,
            service_id: haircut.id,
            day: DayIndex::new(20).unwrap(),
            period,
            upsell: Upsell::default(),
        };
        let change = |date, period, change| ChangeSlot {
            provider_id: provider.id,
            date,
            period,
            change,
        };

        let late = svc.execute(request(Period::T1)).await.unwrap();
        let date = late.booking.date;
        let confirmed = svc
            .execute(change(date, Period::T1, Change::Confirm))
            .await
            .unwrap();
        assert_eq!(confirmed.status, Status::Booked);

        let other = svc.execute(request(Period::T2)).await.unwrap();
        let freed = svc
            .execute(change(date, Period::T2, Change::Reschedule))
            .await
            .unwrap();
        assert!(freed.is_free());
        let b = svc
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(other.booking.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(b.status, booking::Status::Cancelled);

        let err = svc
            .execute(change(date, Period::M1, Change::Block))
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::DateOutOfSchedule(_),
        ));
    }
}
