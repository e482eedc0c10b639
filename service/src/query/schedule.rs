//! [`Query`] collection related to provider schedules.

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Profile;
use crate::{
    domain::{
        profile,
        schedule::{self, Period, SCHEDULE_DAYS},
        Slot,
    },
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] of the whole provider schedule: [`SCHEDULE_DAYS`] starting
/// from today.
#[derive(Clone, Copy, Debug)]
pub struct Schedule {
    /// ID of the provider [`Profile`].
    pub provider_id: profile::Id,
}

impl<Db> Query<Schedule> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Slot>, read::schedule::Span>>,
        Ok = Vec<Slot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<read::schedule::Day>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Schedule { provider_id }: Schedule,
    ) -> Result<Self::Ok, Self::Err> {
        let now = self.local_time();
        let dates = (0..SCHEDULE_DAYS)
            .map_while(|n| now.date.checked_add_days(n))
            .collect::<Vec<_>>();
        let Some(&last) = dates.last() else {
            return Ok(vec![]);
        };

        let slots = self
            .database()
            .execute(Select(By::<Vec<Slot>, _>::new(read::schedule::Span {
                provider_id,
                from: now.date,
                to: last.checked_add_days(1).unwrap_or(last),
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(dates
            .into_iter()
            .map(|date| {
                read::schedule::Day::assemble(provider_id, date, &slots, now)
            })
            .collect())
    }
}

/// [`Query`] of a single [`Date`] of a provider schedule, listing every
/// [`Period`] along with its availability.
#[derive(Clone, Copy, Debug)]
pub struct Day {
    /// ID of the provider [`Profile`].
    pub provider_id: profile::Id,

    /// [`Date`] to be viewed.
    pub date: Date,
}

impl<Db> Query<Day> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Slot>, read::schedule::Span>>,
        Ok = Vec<Slot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::schedule::Day;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Day { provider_id, date }: Day,
    ) -> Result<Self::Ok, Self::Err> {
        let slots = self
            .database()
            .execute(Select(By::<Vec<Slot>, _>::new(read::schedule::Span {
                provider_id,
                from: date,
                to: date.checked_add_days(1).unwrap_or(date),
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(read::schedule::Day::assemble(
            provider_id,
            date,
            &slots,
            self.local_time(),
        ))
    }
}

/// [`Query`] of the [`schedule::Negotiation`] with the client of a platform
/// appointment.
///
/// [`None`] is returned if the [`Slot`] holds no such appointment.
#[derive(Clone, Copy, Debug)]
pub struct Negotiation {
    /// ID of the provider [`Profile`].
    pub provider_id: profile::Id,

    /// [`Date`] of the [`Slot`].
    pub date: Date,

    /// [`Period`] of the [`Slot`].
    pub period: Period,
}

impl<Db> Query<Negotiation> for Service<Db>
where
    Db: Database<
        Select<By<Option<Slot>, schedule::Key>>,
        Ok = Option<Slot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<schedule::Negotiation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        query: Negotiation,
    ) -> Result<Self::Ok, Self::Err> {
        let Negotiation {
            provider_id,
            date,
            period,
        } = query;

        let slot = self
            .database()
            .execute(Select(By::<Option<Slot>, _>::new(schedule::Key {
                provider_id,
                date,
                period,
            })))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(slot.as_ref().and_then(Slot::negotiation))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::{
            profile,
            schedule::{Client, Key, Period, Status},
            Slot,
        },
        test_support::service,
        Query as _,
    };

    use super::{Day, Negotiation, Schedule};

    #[tokio::test]
    async fn spans_two_weeks_of_four_periods() {
        let svc = service();
        let provider_id = profile::Id::new();
        let date = svc.local_time().date.checked_add_days(3).unwrap();
        let mut slot = Slot::free(Key {
            provider_id,
            date,
            period: Period::T2,
        });
        slot.block().unwrap();
        svc.database().execute(Insert(slot)).await.unwrap();

        let days = svc.execute(Schedule { provider_id }).await.unwrap();

        assert_eq!(days.len(), 14);
        assert!(days.iter().all(|d| d.entries.len() == 4));
        assert_eq!(days[3].date, date);
        assert_eq!(days[3].entries[3].slot.status, Status::Blocked);
        assert!(days[4].entries.iter().all(|e| e.slot.is_free()));
    }

    #[tokio::test]
    async fn views_single_day() {
        let svc = service();
        let provider_id = profile::Id::new();
        let date = svc.local_time().date.checked_add_days(1).unwrap();

        let day = svc.execute(Day { provider_id, date }).await.unwrap();

        assert_eq!(day.date, date);
        assert!(day.entries.iter().all(|e| e.unavailability().is_none()));
    }

    #[tokio::test]
    async fn negotiates_platform_appointments_only() {
        let svc = service();
        let provider_id = profile::Id::new();
        let date = svc.local_time().date.checked_add_days(1).unwrap();
        let key = |period| Key {
            provider_id,
            date,
            period,
        };

        let mut manual = Slot::free(key(Period::M1));
        manual
            .book_manually(Client::manual(None, None, None, None))
            .unwrap();
        let mut requested = Slot::free(key(Period::M2));
        requested
            .request(
                crate::domain::booking::Id::new(),
                Client {
                    name: "Ana".parse().unwrap(),
                    phone: Some("(11) 91234-5678".parse().unwrap()),
                    service: "Escova".parse().unwrap(),
                    address: "Bloco A, Apto 3".parse().unwrap(),
                },
            )
            .unwrap();
        for s in [manual, requested] {
            svc.database().execute(Insert(s)).await.unwrap();
        }

        let none = svc
            .execute(Negotiation {
                provider_id,
                date,
                period: Period::M1,
            })
            .await
            .unwrap();
        assert!(none.is_none());

        let negotiation = svc
            .execute(Negotiation {
                provider_id,
                date,
                period: Period::M2,
            })
            .await
            .unwrap()
            .unwrap();
        assert!(negotiation.link.starts_with("https://wa.me/11912345678?text="));
        assert!(negotiation.message.starts_with("Olá Ana"));
    }
}
