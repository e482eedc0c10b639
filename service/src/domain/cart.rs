//! [`Cart`] definitions.

use std::collections::HashMap;

use common::Money;
use derive_more::{Display, Error};

#[cfg(doc)]
use crate::domain::{offer::Product, Profile};
use crate::domain::{
    offer::{self, ImageUrl, Offer, Title},
    order::Quantity,
    profile,
};

/// Shopping cart of a single session.
///
/// Holds at most one [`Item`] per [`Offer`], in the order they were first
/// added.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    /// [`Item`]s of this [`Cart`].
    items: Vec<Item>,
}

impl Cart {
    /// Adds a single unit of the provided [`Offer`] to this [`Cart`].
    ///
    /// The [`Offer`] details are snapshotted on its first addition.
    pub fn add(&mut self, offer: &Offer) {
        let id = offer.id();
        if let Some(item) = self.items.iter_mut().find(|i| i.offer_id == id) {
            item.quantity = item.quantity.incremented();
            return;
        }

        self.items.push(Item {
            offer_id: id,
            title: offer.title().clone(),
            price: offer.price(),
            quantity: Quantity::ONE,
            image: offer.image().cloned(),
            provider_id: offer.owner_id(),
            kind: offer.kind(),
        });
    }

    /// Removes a single unit of the provided [`Offer`] from this [`Cart`].
    ///
    /// Does nothing if there is no such [`Offer`] in this [`Cart`].
    pub fn remove(&mut self, offer_id: offer::Id) {
        let Some(pos) = self.items.iter().position(|i| i.offer_id == offer_id)
        else {
            return;
        };

        match self.items[pos].quantity.decremented() {
            Some(q) => self.items[pos].quantity = q,
            None => {
                _ = self.items.remove(pos);
            }
        }
    }

    /// Removes everything from this [`Cart`].
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns [`Item`]s of this [`Cart`].
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Indicates whether this [`Cart`] has no [`Item`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total price of all the [`Item`]s in this [`Cart`].
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(Item::subtotal).sum()
    }

    /// Returns the total number of units in this [`Cart`].
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity.get()).sum()
    }
}

/// Line of a [`Cart`].
#[derive(Clone, Debug)]
pub struct Item {
    /// ID of the added [`Offer`].
    pub offer_id: offer::Id,

    /// [`Title`] of the [`Offer`] at the moment of addition.
    pub title: Title,

    /// Unit price of the [`Offer`] at the moment of addition.
    pub price: Money,

    /// Added [`Quantity`].
    pub quantity: Quantity,

    /// Cover [`ImageUrl`] of the [`Offer`], if any.
    pub image: Option<ImageUrl>,

    /// ID of the [`Profile`] selling the [`Offer`].
    pub provider_id: profile::Id,

    /// [`offer::Kind`] of the [`Offer`].
    pub kind: offer::Kind,
}

impl Item {
    /// Returns the price of all the units of this [`Item`].
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.price * self.quantity
    }
}

/// Store [`Product`]s picked to be ordered along with a booking.
///
/// Zero quantities are never kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Upsell(HashMap<offer::Id, Quantity>);

impl Upsell {
    /// Sets the quantity of the provided [`Product`], removing it on zero.
    ///
    /// # Errors
    ///
    /// If the `quantity` doesn't fit into a [`Quantity`]. Nothing is changed
    /// then.
    pub fn set(
        &mut self,
        product_id: offer::Id,
        quantity: u32,
    ) -> Result<(), QuantityOverflow> {
        if quantity == 0 {
            _ = self.0.remove(&product_id);
            return Ok(());
        }
        let q = i32::try_from(quantity)
            .ok()
            .and_then(Quantity::new)
            .ok_or(QuantityOverflow { product_id })?;
        _ = self.0.insert(product_id, q);
        Ok(())
    }

    /// Adds the provided `quantity` of the [`Product`] to the already picked
    /// one.
    ///
    /// # Errors
    ///
    /// If the total overflows a [`Quantity`]. Nothing is changed then.
    pub fn add(
        &mut self,
        product_id: offer::Id,
        quantity: u32,
    ) -> Result<(), QuantityOverflow> {
        let current = self.0.get(&product_id).map_or(0, |q| q.get());
        let total = current
            .checked_add(quantity)
            .ok_or(QuantityOverflow { product_id })?;
        self.set(product_id, total)
    }

    /// Changes the quantity of the provided [`Product`] by the `delta`,
    /// clamping it into the [`Quantity`] range or dropping it on zero.
    pub fn adjust(&mut self, product_id: offer::Id, delta: i32) {
        let current = self.0.get(&product_id).map_or(0, |q| i32::from(*q));
        match Quantity::new(current.saturating_add(delta)) {
            Some(q) => {
                _ = self.0.insert(product_id, q);
            }
            None => {
                _ = self.0.remove(&product_id);
            }
        }
    }

    /// Returns the picked [`Quantity`] of the provided [`Product`], if any.
    #[must_use]
    pub fn get(&self, product_id: offer::Id) -> Option<Quantity> {
        self.0.get(&product_id).copied()
    }

    /// Indicates whether nothing is picked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the picked [`Product`]s and their [`Quantity`]s.
    pub fn iter(&self) -> impl Iterator<Item = (offer::Id, Quantity)> + '_ {
        self.0.iter().map(|(id, q)| (*id, *q))
    }

    /// Drops everything picked.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl TryFrom<Vec<(offer::Id, u32)>> for Upsell {
    type Error = QuantityOverflow;

    /// Sums the quantities of the repeated [`Product`]s.
    fn try_from(picks: Vec<(offer::Id, u32)>) -> Result<Self, Self::Error> {
        let mut upsell = Self::default();
        for (id, quantity) in picks {
            upsell.add(id, quantity)?;
        }
        Ok(upsell)
    }
}

/// Error of a picked [`Product`] quantity not fitting into a [`Quantity`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("Quantity of `Product(id: {product_id})` is too large")]
pub struct QuantityOverflow {
    /// ID of the overflowed [`Product`].
    pub product_id: offer::Id,
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::domain::{
        offer::{self, Offer, Service},
        order::Quantity,
        profile,
    };

    use super::{Cart, Upsell};

    fn service(price: &str) -> Offer {
        Offer::Service(Service {
            id: offer::Id::new(),
            provider_id: profile::Id::new(),
            title: "Corte".parse().unwrap(),
            description: offer::Description::default(),
            price: price.parse().unwrap(),
            duration: None,
            image: None,
            is_active: true,
            created_at: DateTime::now().coerce(),
        })
    }

    #[test]
    fn adding_twice_increments_quantity() {
        let offer = service("30.00");
        let mut cart = Cart::default();

        cart.add(&offer);
        cart.add(&offer);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, Quantity::new(2).unwrap());
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), "60.00".parse().unwrap());
    }

    #[test]
    fn removal_undoes_addition() {
        let a = service("10.00");
        let b = service("2.50");
        let mut cart = Cart::default();
        cart.add(&a);
        cart.add(&b);
        let (count, total) = (cart.item_count(), cart.total());

        cart.add(&a);
        cart.remove(a.id());

        assert_eq!(cart.item_count(), count);
        assert_eq!(cart.total(), total);
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn removing_last_unit_drops_item() {
        let a = service("10.00");
        let mut cart = Cart::default();
        cart.add(&a);

        cart.remove(a.id());

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[test]
    fn removing_absent_offer_is_noop() {
        let a = service("10.00");
        let mut cart = Cart::default();
        cart.add(&a);

        cart.remove(offer::Id::new());

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn snapshot_survives_price_change() {
        let mut offer = service("10.00");
        let mut cart = Cart::default();
        cart.add(&offer);

        if let Offer::Service(s) = &mut offer {
            s.price = "99.00".parse().unwrap();
        }
        cart.add(&offer);

        assert_eq!(cart.total(), "20.00".parse().unwrap());
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::default();
        cart.add(&service("1.00"));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn upsell_never_keeps_zeros() {
        let a = offer::Id::new();
        let b = offer::Id::new();
        let mut upsell = Upsell::default();

        upsell.set(a, 2).unwrap();
        upsell.set(b, 0).unwrap();
        assert_eq!(upsell.get(a), Quantity::new(2));
        assert_eq!(upsell.get(b), None);

        upsell.adjust(a, -5);
        assert_eq!(upsell.get(a), None);
        assert!(upsell.is_empty());

        upsell.adjust(b, 1);
        assert_eq!(upsell.get(b), Some(Quantity::ONE));
    }

    #[test]
    fn upsell_sums_repeated_products() {
        let a = offer::Id::new();
        let b = offer::Id::new();

        let upsell = Upsell::try_from(vec![(a, 2), (b, 0), (a, 3)]).unwrap();

        assert_eq!(upsell.iter().count(), 1);
        assert_eq!(upsell.get(a), Quantity::new(5));
        assert_eq!(upsell.get(b), None);
    }

    #[test]
    fn upsell_rejects_oversized_quantity() {
        let a = offer::Id::new();
        let mut upsell = Upsell::default();
        upsell.set(a, 1).unwrap();

        let err = upsell.set(a, u32::MAX).unwrap_err();
        assert_eq!(err.product_id, a);
        assert_eq!(upsell.get(a), Some(Quantity::ONE));

        let max = i32::MAX.unsigned_abs();
        assert!(upsell.add(a, max).is_err());
        assert_eq!(upsell.get(a), Some(Quantity::ONE));

        assert!(Upsell::try_from(vec![(a, max), (a, 1)]).is_err());
        assert!(Upsell::try_from(vec![(a, max)]).is_ok());
    }
}
