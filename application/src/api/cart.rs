//! [`Cart`]-related definitions.

use common::Money;
use derive_more::From;
use juniper::graphql_object;
use service::domain;

use crate::{api, Context};

/// Snapshot of the [`Cart`] of the current session.
///
/// [`Cart`]: domain::Cart
#[derive(Clone, Debug, From)]
pub struct Cart(domain::Cart);

/// Shopping cart of the current session.
#[graphql_object(context = Context)]
impl Cart {
    /// Lines of this `Cart`, in the order they were first added.
    pub fn items(&self) -> Vec<Item> {
        self.0.items().iter().cloned().map(Into::into).collect()
    }

    /// Total price of all the lines of this `Cart`.
    pub fn total(&self) -> Money {
        self.0.total()
    }

    /// Total number of units in this `Cart`.
    pub fn item_count(&self) -> i32 {
        i32::try_from(self.0.item_count()).unwrap_or(i32::MAX)
    }

    /// Indicator whether this `Cart` is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Line of a [`Cart`].
#[derive(Clone, Debug, From)]
pub struct Item(domain::cart::Item);

/// Line of a `Cart`.
#[graphql_object(name = "CartItem", context = Context)]
impl Item {
    /// ID of the added `Offer`.
    pub fn offer_id(&self) -> api::offer::Id {
        self.0.offer_id.into()
    }

    /// Kind of the added `Offer`.
    pub fn kind(&self) -> api::offer::Kind {
        self.0.kind.into()
    }

    /// Title of the `Offer` at the moment of addition.
    pub fn title(&self) -> api::offer::Title {
        self.0.title.clone().into()
    }

    /// Unit price of the `Offer` at the moment of addition.
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Added quantity.
    pub fn quantity(&self) -> i32 {
        i32::try_from(self.0.quantity.get()).unwrap_or(i32::MAX)
    }

    /// Price of all the added units.
    pub fn subtotal(&self) -> Money {
        self.0.subtotal()
    }

    /// Cover image of the `Offer`.
    pub fn image(&self) -> Option<api::offer::ImageUrl> {
        self.0.image.clone().map(Into::into)
    }

    /// `Profile` selling the `Offer`.
    pub fn provider(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Offer` snapshot guarantees `Profile` existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.provider_id)
        }
    }
}
