//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Profile;
use crate::domain::{offer, profile, schedule::Period};

/// Appointment of a resident for a provider's service, on a given [`Date`]
/// and [`Period`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`offer::Service`].
    pub service_id: offer::Id,

    /// ID of the providing [`Profile`].
    pub provider_id: profile::Id,

    /// ID of the booking resident [`Profile`].
    pub customer_id: profile::Id,

    /// [`Date`] of the appointment.
    pub date: Date,

    /// [`Period`] of the appointment.
    pub period: Period,

    /// Price of the [`offer::Service`] at the booking moment.
    pub total_price: Money,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

impl Booking {
    /// Confirms this [`Booking`] if it's still [`Status::Pending`].
    ///
    /// Returns whether the [`Status`] has been changed.
    pub fn confirm(&mut self) -> bool {
        if self.status != Status::Pending {
            return false;
        }
        self.status = Status::Confirmed;
        true
    }

    /// Cancels this [`Booking`] if it hasn't been finished yet.
    ///
    /// Returns whether the [`Status`] has been changed.
    pub fn cancel(&mut self) -> bool {
        if !matches!(self.status, Status::Pending | Status::Confirmed) {
            return false;
        }
        self.status = Status::Cancelled;
        true
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Requested by a resident, awaiting the provider."]
        Pending = "pending",

        #[doc = "Accepted by the provider."]
        Confirmed = "confirmed",

        #[doc = "Appointment took place."]
        Completed = "completed",

        #[doc = "Appointment won't take place."]
        Cancelled = "cancelled",
    }
}

/// Number of days ahead (today included) a [`Booking`] may be requested for.
pub const WINDOW_DAYS: u8 = 30;

/// Offset in days from the current local [`Date`], in `0..WINDOW_DAYS`
/// range.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct DayIndex(u8);

impl DayIndex {
    /// Creates a new [`DayIndex`] if the provided `index` is inside the
    /// booking window.
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        (index < WINDOW_DAYS).then_some(Self(index))
    }

    /// Resolves this [`DayIndex`] into the [`Date`] relative to `today`.
    #[must_use]
    pub fn resolve(self, today: Date) -> Option<Date> {
        today.checked_add_days(self.0.into())
    }
}

/// [`DateTime`] of a [`Booking`] creation.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Money};

    use crate::domain::{offer, profile, schedule::Period};

    use super::{Booking, DayIndex, Id, Status};

    fn booking(status: Status) -> Booking {
        Booking {
            id: Id::new(),
            service_id: offer::Id::new(),
            provider_id: profile::Id::new(),
            customer_id: profile::Id::new(),
            date: Date::from_calendar_date(2024, 3, 10).unwrap(),
            period: Period::M1,
            total_price: Money::ZERO,
            status,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn day_index_is_bounded_by_window() {
        assert!(DayIndex::new(0).is_some());
        assert!(DayIndex::new(29).is_some());
        assert!(DayIndex::new(30).is_none());
    }

    #[test]
    fn day_index_resolves_across_months() {
        let today = Date::from_calendar_date(2024, 2, 28).unwrap();

        assert_eq!(
            DayIndex::new(2).unwrap().resolve(today),
            Date::from_calendar_date(2024, 3, 1),
        );
    }

    #[test]
    fn confirms_only_pending() {
        let mut pending = booking(Status::Pending);
        assert!(pending.confirm());
        assert_eq!(pending.status, Status::Confirmed);
        assert!(!pending.confirm());

        let mut cancelled = booking(Status::Cancelled);
        assert!(!cancelled.confirm());
        assert_eq!(cancelled.status, Status::Cancelled);
    }

    #[test]
    fn cancels_only_unfinished() {
        for status in [Status::Pending, Status::Confirmed] {
            let mut b = booking(status);
            assert!(b.cancel());
            assert_eq!(b.status, Status::Cancelled);
        }

        let mut completed = booking(Status::Completed);
        assert!(!completed.cancel());
        assert_eq!(completed.status, Status::Completed);
    }
}
