//! [`Order`] definitions.

use std::ops;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{offer::Product, Profile};
use crate::domain::{offer, profile};

/// Purchase of provider products by a resident.
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// ID of the purchasing resident [`Profile`].
    pub customer_id: profile::Id,

    /// ID of the selling provider [`Profile`].
    pub provider_id: profile::Id,

    /// [`Status`] of this [`Order`].
    pub status: Status,

    /// Total amount of this [`Order`].
    pub total: Money,

    /// [`PaymentMethod`] of this [`Order`].
    pub payment_method: PaymentMethod,

    /// [`profile::Address`] to deliver this [`Order`] to.
    pub delivery_address: profile::Address,

    /// Purchased [`Item`]s.
    pub items: Vec<Item>,

    /// [`DateTime`] when this [`Order`] was created.
    pub created_at: CreationDateTime,
}

impl Order {
    /// Creates a new [`Status::New`] [`Order`] out of the provided [`Item`]s,
    /// totalling their subtotals.
    #[must_use]
    pub fn new(
        customer_id: profile::Id,
        provider_id: profile::Id,
        delivery_address: Option<profile::Address>,
        items: Vec<Item>,
    ) -> Self {
        Self {
            id: Id::new(),
            customer_id,
            provider_id,
            status: Status::New,
            total: items.iter().map(Item::subtotal).sum(),
            payment_method: PaymentMethod::default(),
            delivery_address: delivery_address
                .unwrap_or_else(profile::Address::placeholder),
            items,
            created_at: DateTimeOf::now(),
        }
    }

    /// Moves this [`Order`] into the provided [`Status`].
    ///
    /// # Errors
    ///
    /// If this [`Order`] can't go from its current [`Status`] to the `next`
    /// one. The [`Order`] stays unchanged then.
    pub fn transition(&mut self, next: Status) -> Result<(), InvalidTransition> {
        if !self.status.can_become(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Returns the board [`Tab`] this [`Order`] is listed in, if any.
    #[must_use]
    pub fn tab(&self) -> Option<Tab> {
        Tab::of(self.status)
    }
}

/// ID of an [`Order`].
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
    #[doc = "Status of an [`Order`]."]
    enum Status {
        #[doc = "Just placed, not seen by the provider yet."]
        New = "new",

        #[doc = "Accepted and being prepared."]
        Preparing = "preparing",

        #[doc = "Ready to be picked up or delivered."]
        Ready = "ready",

        #[doc = "Handed over to the resident."]
        Completed = "completed",

        #[doc = "Rejected by the provider."]
        Cancelled = "cancelled",
    }
}

impl Status {
    /// Indicates whether an [`Order`] may go from this [`Status`] to the
    /// `next` one.
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Preparing | Self::Cancelled)
                | (Self::Preparing, Self::Ready)
                | (Self::Ready, Self::Completed)
        )
    }
}

define_kind! {
    #[doc = "Payment method of an [`Order`]."]
    enum PaymentMethod {
        #[doc = "Brazilian instant payment."]
        Pix = "pix",
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Pix
    }
}

/// Tab of a provider's [`Order`]s board.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Tab {
    /// [`Status::New`] [`Order`]s.
    New,

    /// [`Status::Preparing`] [`Order`]s.
    Preparing,

    /// [`Status::Ready`] and [`Status::Completed`] [`Order`]s.
    Ready,
}

impl Tab {
    /// Returns the [`Tab`] listing [`Order`]s of the provided [`Status`].
    ///
    /// [`Status::Cancelled`] [`Order`]s aren't listed anywhere.
    #[must_use]
    pub fn of(status: Status) -> Option<Self> {
        match status {
            Status::New => Some(Self::New),
            Status::Preparing => Some(Self::Preparing),
            Status::Ready | Status::Completed => Some(Self::Ready),
            Status::Cancelled => None,
        }
    }
}

/// Line of an [`Order`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: ItemId,

    /// ID of the purchased [`Product`].
    pub product_id: offer::Id,

    /// Purchased [`Quantity`].
    pub quantity: Quantity,

    /// Unit price of the [`Product`] at the purchase moment.
    pub price_at_purchase: Money,
}

impl Item {
    /// Creates a new [`Item`] of the provided [`Product`].
    #[must_use]
    pub fn new(
        product_id: offer::Id,
        quantity: Quantity,
        price_at_purchase: Money,
    ) -> Self {
        Self {
            id: ItemId::new(),
            product_id,
            quantity,
            price_at_purchase,
        }
    }

    /// Returns the amount paid for this [`Item`].
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.price_at_purchase * self.quantity
    }
}

/// ID of an [`Item`].
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
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random [`ItemId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Positive number of purchased units.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(i32);

impl Quantity {
    /// Single unit.
    pub const ONE: Self = Self(1);

    /// Creates a new [`Quantity`] if the provided `quantity` is positive.
    #[must_use]
    pub fn new(quantity: i32) -> Option<Self> {
        (quantity > 0).then_some(Self(quantity))
    }

    /// Returns the next [`Quantity`], saturating at the maximum.
    #[must_use]
    pub fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the previous [`Quantity`], if it's still positive.
    #[must_use]
    pub fn decremented(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    /// Returns this [`Quantity`] as an unsigned number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl ops::Mul<Quantity> for Money {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self::Output {
        self * rhs.get()
    }
}

/// Error of an illegal [`Order`] [`Status`] change.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Order` can't go from `{from}` to `{to}`")]
pub struct InvalidTransition {
    /// Current [`Status`] of the [`Order`].
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// [`DateTime`] of an [`Order`] creation.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::domain::{offer, profile};

    use super::{Item, Order, Quantity, Status, Tab};

    fn order(status: Status) -> Order {
        let mut order = Order::new(
            profile::Id::new(),
            profile::Id::new(),
            None,
            vec![],
        );
        order.status = status;
        order
    }

    #[test]
    fn allows_only_forward_transitions() {
        use Status as S;

        let allowed = [
            (S::New, S::Preparing),
            (S::Preparing, S::Ready),
            (S::Ready, S::Completed),
            (S::New, S::Cancelled),
        ];
        for &from in S::ALL {
            for &to in S::ALL {
                assert_eq!(
                    from.can_become(to),
                    allowed.contains(&(from, to)),
                    "`{from}` -> `{to}`",
                );
            }
        }
    }

    #[test]
    fn rejected_transition_leaves_order_unchanged() {
        let mut o = order(Status::Completed);

        assert!(o.transition(Status::Preparing).is_err());
        assert_eq!(o.status, Status::Completed);

        let mut o = order(Status::New);
        o.transition(Status::Preparing).unwrap();
        assert_eq!(o.status, Status::Preparing);
    }

    #[test]
    fn tabs_skip_cancelled() {
        assert_eq!(Tab::of(Status::New), Some(Tab::New));
        assert_eq!(Tab::of(Status::Preparing), Some(Tab::Preparing));
        assert_eq!(Tab::of(Status::Ready), Some(Tab::Ready));
        assert_eq!(Tab::of(Status::Completed), Some(Tab::Ready));
        assert_eq!(Tab::of(Status::Cancelled), None);
    }

    #[test]
    fn totals_items_and_defaults_to_placeholder_address() {
        let items = vec![
            Item::new(
                offer::Id::new(),
                Quantity::new(2).unwrap(),
                "10.00".parse::<Money>().unwrap(),
            ),
            Item::new(
                offer::Id::new(),
                Quantity::ONE,
                "5.50".parse::<Money>().unwrap(),
            ),
        ];

        let o = Order::new(profile::Id::new(), profile::Id::new(), None, items);

        assert_eq!(o.total, "25.50".parse().unwrap());
        assert_eq!(o.status, Status::New);
        assert_eq!(o.payment_method.code(), "pix");
        assert_eq!(o.delivery_address.to_string(), "Endereço do Cliente");
    }

    #[test]
    fn quantity_steps() {
        assert_eq!(Quantity::ONE.incremented(), Quantity::new(2).unwrap());
        assert_eq!(Quantity::ONE.decremented(), None);
        assert!(Quantity::new(0).is_none());
    }
}
