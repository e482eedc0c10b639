//! Provider schedule definitions.

use common::{Date, DateTime};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject};
use service::{domain, read};

use crate::{
    api::{self, booking::Period},
    Context,
};

/// Provider schedule of a single [`Date`].
#[derive(Clone, Debug, From)]
pub struct Day(read::schedule::Day);

/// Provider schedule of a single `Date`.
#[graphql_object(name = "ScheduleDay", context = Context)]
impl Day {
    /// `Date` of this day.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// Every `Period` of this day, in their natural order.
    pub fn entries(&self) -> Vec<Entry> {
        self.0.entries.iter().cloned().map(Into::into).collect()
    }
}

/// [`Slot`] of a [`Day`] along with its availability.
#[derive(Clone, Debug, From)]
pub struct Entry(read::schedule::Entry);

/// `Slot` of a `ScheduleDay` along with its availability.
#[graphql_object(name = "ScheduleEntry", context = Context)]
impl Entry {
    /// `Slot` itself.
    pub fn slot(&self) -> Slot {
        self.0.slot.clone().into()
    }

    /// Indicator whether the `Period` is already over.
    pub fn past(&self) -> bool {
        self.0.past
    }

    /// Indicator whether the `Slot` is taken.
    pub fn occupied(&self) -> bool {
        self.0.occupied()
    }

    /// Reason this `Period` can't be picked, if any.
    pub fn unavailability(&self) -> Option<Unavailability> {
        self.0.unavailability().map(Into::into)
    }
}

/// Single [`Period`] of a provider's schedule on a specific [`Date`].
#[derive(Clone, Debug, From)]
pub struct Slot(domain::Slot);

/// Single `Period` of a provider's schedule on a specific `Date`.
#[graphql_object(context = Context)]
impl Slot {
    /// Provider `Profile` owning the schedule.
    pub fn provider(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Slot` is only resolved for existing providers"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.provider_id)
        }
    }

    /// `Date` of this `Slot`.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// `Period` of this `Slot`.
    pub fn period(&self) -> Period {
        self.0.period.into()
    }

    /// Human-readable label of the `Period` (e.g. "Manhã I").
    pub fn label(&self) -> String {
        self.0.period.label().to_owned()
    }

    /// Human-readable time range of the `Period` (e.g. "07:00 - 09:00").
    pub fn time_range(&self) -> String {
        self.0.period.time_range().to_owned()
    }

    /// Status of this `Slot`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Where the appointment in this `Slot` came from, if any.
    pub fn source(&self) -> Option<Source> {
        self.0.source.map(Into::into)
    }

    /// Client of the appointment in this `Slot`, if any.
    pub fn client(&self) -> Option<Client> {
        self.0.client.clone().map(Into::into)
    }

    /// `Booking` bound to this `Slot`, if any.
    pub fn booking_id(&self) -> Option<api::booking::Id> {
        self.0.booking_id.map(Into::into)
    }

    /// `DateTime` when this `Slot` was changed last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Client of an appointment.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "SlotClient", context = Context)]
pub struct Client {
    /// Name of the client.
    pub name: api::profile::Name,

    /// Phone of the client.
    pub phone: Option<api::profile::Phone>,

    /// Title of the appointment service.
    pub service: api::offer::Title,

    /// Address of the client.
    pub address: api::profile::Address,
}

impl From<domain::schedule::Client> for Client {
    fn from(client: domain::schedule::Client) -> Self {
        let domain::schedule::Client {
            name,
            phone,
            service,
            address,
        } = client;
        Self {
            name: name.into(),
            phone: phone.map(Into::into),
            service: service.into(),
            address: address.into(),
        }
    }
}

/// Outbound message to a client for negotiating an appointment.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Negotiation {
    /// Plain text of the message.
    pub message: String,

    /// Messaging link opening a chat with the client, prefilled with the
    /// `message`.
    pub link: String,
}

impl From<domain::schedule::Negotiation> for Negotiation {
    fn from(n: domain::schedule::Negotiation) -> Self {
        let domain::schedule::Negotiation { message, link } = n;
        Self { message, link }
    }
}

/// Status of a `Slot`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SlotStatus")]
pub enum Status {
    /// Nothing scheduled.
    Free,

    /// Requested through the platform, awaiting the provider.
    Pending,

    /// Taken.
    Booked,

    /// Closed by the provider.
    Blocked,
}

impl From<domain::schedule::Status> for Status {
    fn from(status: domain::schedule::Status) -> Self {
        use domain::schedule::Status as S;
        match status {
            S::Free => Self::Free,
            S::Pending => Self::Pending,
            S::Booked => Self::Booked,
            S::Blocked => Self::Blocked,
        }
    }
}

/// Origin of an appointment in a `Slot`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SlotSource")]
pub enum Source {
    /// Requested by a resident through the platform.
    Platform,

    /// Registered by the provider.
    Manual,
}

impl From<domain::schedule::Source> for Source {
    fn from(source: domain::schedule::Source) -> Self {
        use domain::schedule::Source as S;
        match source {
            S::Platform => Self::Platform,
            S::Manual => Self::Manual,
        }
    }
}

/// Reason a `Period` can't be picked.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Unavailability {
    /// `Period` is over ("Encerrado").
    Past,

    /// `Slot` is taken ("Ocupado").
    Occupied,
}

impl From<domain::schedule::Unavailability> for Unavailability {
    fn from(u: domain::schedule::Unavailability) -> Self {
        use domain::schedule::Unavailability as U;
        match u {
            U::Past => Self::Past,
            U::Occupied => Self::Occupied,
        }
    }
}

/// Manual action of a provider upon a `Slot`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum SlotAction {
    /// Book a free `Slot` for an off-platform client.
    Book,

    /// Confirm a pending `Slot` along with its `Booking`.
    Confirm,

    /// Free the `Slot`, cancelling its `Booking` (if any).
    Reschedule,

    /// Close a free `Slot`.
    Block,
}
