//! Provider schedule definitions.

#[cfg(doc)]
use common::DateTime;
use common::{datetime::LocalTime, define_kind, unit, Date, DateTimeOf};
use derive_more::{Display, Error};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

#[cfg(doc)]
use crate::domain::{Booking, Profile};
use crate::domain::{booking, offer, profile};

/// Number of days (today included) the provider schedule spans.
pub const SCHEDULE_DAYS: u16 = 14;

define_kind! {
    #[doc = "Fixed part of a day a [`Slot`] occupies."]
    enum Period {
        #[doc = "Early morning."]
        M1 = "m1",

        #[doc = "Late morning."]
        M2 = "m2",

        #[doc = "Early afternoon."]
        T1 = "t1",

        #[doc = "Late afternoon."]
        T2 = "t2",
    }
}

impl Period {
    /// Returns the human-readable label of this [`Period`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::M1 => "Manhã I",
            Self::M2 => "Manhã II",
            Self::T1 => "Tarde I",
            Self::T2 => "Tarde II",
        }
    }

    /// Returns the human-readable time range of this [`Period`].
    #[must_use]
    pub const fn time_range(self) -> &'static str {
        match self {
            Self::M1 => "07:00 - 09:00",
            Self::M2 => "09:01 - 12:00",
            Self::T1 => "13:00 - 15:00",
            Self::T2 => "15:01 - 18:00",
        }
    }

    /// Returns the local hour this [`Period`] ends at.
    #[must_use]
    pub const fn end_hour(self) -> u8 {
        match self {
            Self::M1 => 9,
            Self::M2 => 12,
            Self::T1 => 15,
            Self::T2 => 18,
        }
    }

    /// Indicates whether this [`Period`] of the provided `date` is already
    /// over at the provided local time.
    ///
    /// Only the current day may have past [`Period`]s, future dates never do.
    #[must_use]
    pub fn is_past(self, date: Date, now: LocalTime) -> bool {
        date == now.date && now.hour >= self.end_hour()
    }
}

define_kind! {
    #[doc = "Status of a [`Slot`]."]
    enum Status {
        #[doc = "Nothing is scheduled."]
        Free = "free",

        #[doc = "Requested through the platform, awaiting the provider."]
        Pending = "pending",

        #[doc = "Appointment is settled."]
        Booked = "booked",

        #[doc = "Closed by the provider."]
        Blocked = "blocked",
    }
}

define_kind! {
    #[doc = "Origin of a [`Slot`] appointment."]
    enum Source {
        #[doc = "Requested by a resident through the platform."]
        Platform = "platform",

        #[doc = "Added by the provider for an off-platform client."]
        Manual = "manual",
    }
}

/// Client an appointment in a [`Slot`] is made for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    /// [`profile::Name`] of this [`Client`].
    pub name: profile::Name,

    /// Contact [`profile::Phone`] of this [`Client`], if known.
    pub phone: Option<profile::Phone>,

    /// Label of the requested service.
    pub service: offer::Title,

    /// [`profile::Address`] of this [`Client`].
    pub address: profile::Address,
}

impl Client {
    /// Creates a [`Client`] of a [`Source::Manual`] appointment, filling the
    /// omitted details with the defaults.
    #[must_use]
    pub fn manual(
        name: Option<profile::Name>,
        phone: Option<profile::Phone>,
        service: Option<offer::Title>,
        address: Option<profile::Address>,
    ) -> Self {
        #[expect(unsafe_code, reason = "valid by construction")]
        let (default_name, default_service, default_address) = unsafe {
            (
                profile::Name::new_unchecked("Cliente Externo"),
                offer::Title::new_unchecked("Serviço Diverso"),
                profile::Address::new_unchecked("Externo"),
            )
        };

        Self {
            name: name.unwrap_or(default_name),
            phone,
            service: service.unwrap_or(default_service),
            address: address.unwrap_or(default_address),
        }
    }
}

/// Key uniquely identifying a [`Slot`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// ID of the [`Profile`] owning the schedule.
    pub provider_id: profile::Id,

    /// [`Date`] of the [`Slot`].
    pub date: Date,

    /// [`Period`] of the [`Slot`].
    pub period: Period,
}

/// Single [`Period`] of a provider's schedule on a specific [`Date`].
///
/// [`Status::Free`] [`Slot`]s are never stored: a missing one is free.
#[derive(Clone, Debug)]
pub struct Slot {
    /// ID of the [`Profile`] owning the schedule.
    pub provider_id: profile::Id,

    /// [`Date`] of this [`Slot`].
    pub date: Date,

    /// [`Period`] of this [`Slot`].
    pub period: Period,

    /// [`Status`] of this [`Slot`].
    pub status: Status,

    /// [`Source`] of the appointment in this [`Slot`], if any.
    pub source: Option<Source>,

    /// [`Client`] of the appointment in this [`Slot`], if any.
    pub client: Option<Client>,

    /// ID of the [`Booking`] bound to this [`Slot`], if any.
    pub booking_id: Option<booking::Id>,

    /// [`DateTime`] when this [`Slot`] was changed last time.
    pub updated_at: UpdateDateTime,
}

impl Slot {
    /// Creates a new [`Status::Free`] [`Slot`] for the provided [`Key`].
    #[must_use]
    pub fn free(key: Key) -> Self {
        let Key {
            provider_id,
            date,
            period,
        } = key;

        Self {
            provider_id,
            date,
            period,
            status: Status::Free,
            source: None,
            client: None,
            booking_id: None,
            updated_at: DateTimeOf::now(),
        }
    }

    /// Returns the [`Key`] of this [`Slot`].
    #[must_use]
    pub fn key(&self) -> Key {
        Key {
            provider_id: self.provider_id,
            date: self.date,
            period: self.period,
        }
    }

    /// Indicates whether this [`Slot`] has nothing scheduled.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.status == Status::Free
    }

    /// Books this [`Slot`] for an off-platform [`Client`].
    ///
    /// # Errors
    ///
    /// If this [`Slot`] is not [`Status::Free`].
    pub fn book_manually(
        &mut self,
        client: Client,
    ) -> Result<(), TransitionError> {
        self.expect(Status::Free)?;

        self.status = Status::Booked;
        self.source = Some(Source::Manual);
        self.client = Some(client);
        self.booking_id = None;
        self.touch();
        Ok(())
    }

    /// Marks this [`Slot`] as requested by a resident through the platform.
    ///
    /// # Errors
    ///
    /// If this [`Slot`] is not [`Status::Free`].
    pub fn request(
        &mut self,
        booking_id: booking::Id,
        client: Client,
    ) -> Result<(), TransitionError> {
        self.expect(Status::Free)?;

        self.status = Status::Pending;
        self.source = Some(Source::Platform);
        self.client = Some(client);
        self.booking_id = Some(booking_id);
        self.touch();
        Ok(())
    }

    /// Confirms the pending appointment in this [`Slot`].
    ///
    /// # Errors
    ///
    /// If this [`Slot`] is not [`Status::Pending`].
    pub fn confirm(&mut self) -> Result<(), TransitionError> {
        self.expect(Status::Pending)?;

        self.status = Status::Booked;
        self.touch();
        Ok(())
    }

    /// Closes this [`Slot`] for any appointments.
    ///
    /// # Errors
    ///
    /// If this [`Slot`] is not [`Status::Free`].
    pub fn block(&mut self) -> Result<(), TransitionError> {
        self.expect(Status::Free)?;

        self.status = Status::Blocked;
        self.touch();
        Ok(())
    }

    /// Frees this [`Slot`] from whatever it holds.
    ///
    /// Returns ID of the [`Booking`] that was bound to this [`Slot`], if any.
    pub fn reschedule(&mut self) -> Option<booking::Id> {
        self.status = Status::Free;
        self.source = None;
        self.client = None;
        self.touch();
        self.booking_id.take()
    }

    /// Returns the [`Negotiation`] with the [`Client`] of a platform
    /// appointment in this [`Slot`].
    ///
    /// [`None`] is returned if there is no such appointment.
    #[must_use]
    pub fn negotiation(&self) -> Option<Negotiation> {
        if self.source != Some(Source::Platform) {
            return None;
        }
        let client = self.client.as_ref()?;

        let message = format!(
            "Olá {}, vi seu pedido de agendamento para {}. \
             Podemos confirmar ou prefere outro horário?",
            client.name,
            self.period.label(),
        );
        let phone = client
            .phone
            .as_ref()
            .map(profile::Phone::digits)
            .unwrap_or_default();
        let link = format!(
            "https://wa.me/{phone}?text={}",
            utf8_percent_encode(&message, URI_COMPONENT),
        );

        Some(Negotiation { message, link })
    }

    /// Ensures this [`Slot`] is in the `expected` [`Status`].
    fn expect(&self, expected: Status) -> Result<(), TransitionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(TransitionError {
                status: self.status,
                expected,
            })
        }
    }

    /// Updates the modification [`DateTime`] of this [`Slot`].
    fn touch(&mut self) {
        self.updated_at = DateTimeOf::now();
    }
}

/// Characters escaped in a URI component, leaving the unreserved ones as is.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Outbound message to a [`Client`] for negotiating an appointment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Negotiation {
    /// Plain text of the message.
    pub message: String,

    /// Messaging link opening a chat with the [`Client`], prefilled with the
    /// `message`.
    pub link: String,
}

/// Reason a [`Period`] can't be picked.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Unavailability {
    /// [`Period`] is over.
    #[display("Encerrado")]
    Past,

    /// [`Slot`] is not [`Status::Free`].
    #[display("Ocupado")]
    Occupied,
}

impl Unavailability {
    /// Resolves the [`Unavailability`] of a [`Period`] out of its independent
    /// past-ness and occupancy.
    ///
    /// Past-ness takes precedence.
    #[must_use]
    pub fn of(past: bool, occupied: bool) -> Option<Self> {
        if past {
            Some(Self::Past)
        } else if occupied {
            Some(Self::Occupied)
        } else {
            None
        }
    }
}

/// Error of an illegal [`Slot`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Slot` is `{status}`, but `{expected}` is required")]
pub struct TransitionError {
    /// Current [`Status`] of the [`Slot`].
    pub status: Status,

    /// [`Status`] required for the transition.
    pub expected: Status,
}

/// [`DateTime`] of a [`Slot`] modification.
pub type UpdateDateTime = DateTimeOf<(Slot, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::{datetime::LocalTime, Date};

    use crate::domain::{booking, offer, profile};

    use super::{Client, Key, Period, Slot, Source, Status, Unavailability};

    fn date(day: u8) -> Date {
        Date::from_calendar_date(2024, 3, day).unwrap()
    }

    fn slot() -> Slot {
        Slot::free(Key {
            provider_id: profile::Id::new(),
            date: date(10),
            period: Period::M1,
        })
    }

    fn client(phone: Option<&str>) -> Client {
        Client {
            name: "João da Silva".parse().unwrap(),
            phone: phone.map(|p| p.parse().unwrap()),
            service: "Orçamento Elétrica".parse().unwrap(),
            address: "Bl. A - 101".parse().unwrap(),
        }
    }

    #[test]
    fn periods_are_past_only_today_after_end() {
        let now = LocalTime {
            date: date(10),
            hour: 10,
        };

        assert!(Period::M1.is_past(date(10), now));
        assert!(!Period::M2.is_past(date(10), now));
        assert!(!Period::T1.is_past(date(10), now));
        assert!(!Period::M1.is_past(date(11), now));

        let evening = LocalTime {
            date: date(10),
            hour: 18,
        };
        assert!(Period::ALL.iter().all(|p| p.is_past(date(10), evening)));
    }

    #[test]
    fn past_reason_wins_over_occupancy() {
        assert_eq!(Unavailability::of(true, true), Some(Unavailability::Past));
        assert_eq!(
            Unavailability::of(false, true),
            Some(Unavailability::Occupied),
        );
        assert_eq!(Unavailability::of(false, false), None);
        assert_eq!(Unavailability::Past.to_string(), "Encerrado");
        assert_eq!(Unavailability::Occupied.to_string(), "Ocupado");
    }

    #[test]
    fn manual_client_falls_back_to_defaults() {
        let client = Client::manual(None, None, None, None);

        assert_eq!(client.name.to_string(), "Cliente Externo");
        assert_eq!(client.service.to_string(), "Serviço Diverso");
        assert_eq!(client.address.to_string(), "Externo");
        assert_eq!(client.phone, None);
    }

    #[test]
    fn manual_booking_of_free_slot() {
        let mut slot = slot();

        slot.book_manually(client(None)).unwrap();

        assert_eq!(slot.status, Status::Booked);
        assert_eq!(slot.source, Some(Source::Manual));
        assert!(slot.client.is_some());
        assert!(slot.book_manually(client(None)).is_err());
    }

    #[test]
    fn platform_request_then_confirm_keeps_source() {
        let mut slot = slot();
        let booking_id = booking::Id::new();

        assert!(slot.confirm().is_err());
        slot.request(booking_id, client(None)).unwrap();
        assert_eq!(slot.status, Status::Pending);

        slot.confirm().unwrap();

        assert_eq!(slot.status, Status::Booked);
        assert_eq!(slot.source, Some(Source::Platform));
        assert_eq!(slot.booking_id, Some(booking_id));
    }

    #[test]
    fn reschedule_frees_any_slot() {
        let booking_id = booking::Id::new();
        let mut slot = slot();
        slot.request(booking_id, client(None)).unwrap();

        assert_eq!(slot.reschedule(), Some(booking_id));
        assert!(slot.is_free());
        assert_eq!(slot.source, None);
        assert_eq!(slot.client, None);

        slot.block().unwrap();
        assert_eq!(slot.reschedule(), None);
        assert!(slot.is_free());
    }

    #[test]
    fn blocks_only_free_slot() {
        let mut slot = slot();
        slot.block().unwrap();

        assert_eq!(slot.status, Status::Blocked);
        assert!(slot.block().is_err());
        assert!(slot.book_manually(client(None)).is_err());
    }

    #[test]
    fn negotiates_only_platform_appointments() {
        let mut manual = slot();
        manual.book_manually(client(Some("5511999999999"))).unwrap();
        assert_eq!(manual.negotiation(), None);

        let mut platform = slot();
        platform
            .request(booking::Id::new(), client(Some("+55 11 99999-9999")))
            .unwrap();
        let negotiation = platform.negotiation().unwrap();

        assert_eq!(
            negotiation.message,
            "Olá João da Silva, vi seu pedido de agendamento para Manhã I. \
             Podemos confirmar ou prefere outro horário?",
        );
        assert_eq!(
            negotiation.link,
            "https://wa.me/5511999999999?text=Ol%C3%A1%20Jo%C3%A3o%20da%20\
             Silva%2C%20vi%20seu%20pedido%20de%20agendamento%20para%20Manh%C3%\
             A3%20I.%20Podemos%20confirmar%20ou%20prefere%20outro%20hor%C3%\
             A1rio%3F",
        );
    }

    #[test]
    fn negotiation_link_tolerates_missing_phone() {
        let mut slot = slot();
        slot.request(booking::Id::new(), client(None)).unwrap();

        assert!(slot
            .negotiation()
            .unwrap()
            .link
            .starts_with("https://wa.me/?text=Ol%C3%A1"));
    }

    #[test]
    fn manual_defaults_are_valid() {
        assert!(profile::Name::new("Cliente Externo").is_some());
        assert!(offer::Title::new("Serviço Diverso").is_some());
        assert!(profile::Address::new("Externo").is_some());
        assert!(profile::Address::new("Endereço do Cliente").is_some());
    }
}
