//! Provider schedule read model definitions.

use common::{datetime::LocalTime, Date};

#[cfg(doc)]
use crate::domain::{schedule::Status, Profile};
use crate::domain::{
    profile,
    schedule::{Key, Period, Unavailability},
    Slot,
};

/// Selector of the stored [`Slot`]s of a provider in a [`Date`] range.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    /// ID of the [`Profile`] owning the schedule.
    pub provider_id: profile::Id,

    /// First [`Date`] of the range (inclusive).
    pub from: Date,

    /// Last [`Date`] of the range (exclusive).
    pub to: Date,
}

/// Provider schedule of a single [`Date`].
#[derive(Clone, Debug)]
pub struct Day {
    /// [`Date`] of this [`Day`].
    pub date: Date,

    /// [`Entry`] for every [`Period`], in their natural order.
    pub entries: Vec<Entry>,
}

impl Day {
    /// Builds the [`Day`] of the provided [`Date`] out of the stored
    /// [`Slot`]s, synthesizing [`Status::Free`] ones for missing periods.
    #[must_use]
    pub fn assemble(
        provider_id: profile::Id,
        date: Date,
        slots: &[Slot],
        now: LocalTime,
    ) -> Self {
        let entries = Period::ALL
            .iter()
            .map(|&period| {
                let slot = slots
                    .iter()
                    .find(|s| s.date == date && s.period == period)
                    .cloned()
                    .unwrap_or_else(|| {
                        Slot::free(Key {
                            provider_id,
                            date,
                            period,
                        })
                    });
                Entry {
                    past: period.is_past(date, now),
                    slot,
                }
            })
            .collect();

        Self { date, entries }
    }
}

/// [`Slot`] of a [`Day`] along with its availability.
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Slot`] itself.
    pub slot: Slot,

    /// Indicator whether the [`Period`] is already over.
    pub past: bool,
}

impl Entry {
    /// Indicates whether the [`Slot`] is taken.
    #[must_use]
    pub fn occupied(&self) -> bool {
        !self.slot.is_free()
    }

    /// Returns the reason this [`Entry`] can't be picked, if any.
    #[must_use]
    pub fn unavailability(&self) -> Option<Unavailability> {
        Unavailability::of(self.past, self.occupied())
    }
}

#[cfg(test)]
mod spec {
    use common::{datetime::LocalTime, Date};

    use crate::domain::{
        profile,
        schedule::{Client, Key, Period, Status, Unavailability},
        Slot,
    };

    use super::Day;

    #[test]
    fn always_lists_four_periods() {
        let provider_id = profile::Id::new();
        let date = Date::from_calendar_date(2024, 3, 11).unwrap();
        let mut booked = Slot::free(Key {
            provider_id,
            date,
            period: Period::T1,
        });
        booked
            .book_manually(Client::manual(None, None, None, None))
            .unwrap();
        let now = LocalTime { date, hour: 10 };

        let day = Day::assemble(provider_id, date, &[booked], now);

        let periods = day.entries.iter().map(|e| e.slot.period).collect::<Vec<_>>();
        assert_eq!(periods, Period::ALL);
        assert_eq!(day.entries[2].slot.status, Status::Booked);
        assert_eq!(day.entries[0].unavailability(), Some(Unavailability::Past));
        assert_eq!(day.entries[1].unavailability(), None);
        assert_eq!(
            day.entries[2].unavailability(),
            Some(Unavailability::Occupied),
        );
    }

    #[test]
    fn future_days_are_never_past() {
        let today = Date::from_calendar_date(2024, 3, 11).unwrap();
        let tomorrow = Date::from_calendar_date(2024, 3, 12).unwrap();
        let now = LocalTime {
            date: today,
            hour: 23,
        };

        let day = Day::assemble(profile::Id::new(), tomorrow, &[], now);

        assert!(day.entries.iter().all(|e| !e.past && !e.occupied()));
    }
}
