//! [`Order`] read model definitions.

use crate::domain::{order::Tab, profile, Order};
#[cfg(doc)]
use crate::domain::{order::Status, Profile};

/// Selector of the [`Order`]s sold by a provider [`Profile`], newest first.
#[derive(Clone, Copy, Debug)]
pub struct OfProvider(pub profile::Id);

/// Selector of the [`Order`]s placed by a resident [`Profile`], newest
/// first.
#[derive(Clone, Copy, Debug)]
pub struct OfCustomer(pub profile::Id);

/// Provider [`Order`]s split into the [`Tab`]s of their board.
#[derive(Clone, Debug, Default)]
pub struct Board {
    /// [`Tab::New`] [`Order`]s.
    pub new: Vec<Order>,

    /// [`Tab::Preparing`] [`Order`]s.
    pub preparing: Vec<Order>,

    /// [`Tab::Ready`] [`Order`]s.
    pub ready: Vec<Order>,
}

impl Board {
    /// Distributes the provided [`Order`]s over the [`Tab`]s, keeping their
    /// order and dropping [`Status::Cancelled`] ones.
    #[must_use]
    pub fn arrange(orders: impl IntoIterator<Item = Order>) -> Self {
        let mut board = Self::default();
        for order in orders {
            match order.tab() {
                Some(Tab::New) => board.new.push(order),
                Some(Tab::Preparing) => board.preparing.push(order),
                Some(Tab::Ready) => board.ready.push(order),
                None => {}
            }
        }
        board
    }

    /// Returns the [`Order`]s listed in the provided [`Tab`].
    #[must_use]
    pub fn tab(&self, tab: Tab) -> &[Order] {
        match tab {
            Tab::New => &self.new,
            Tab::Preparing => &self.preparing,
            Tab::Ready => &self.ready,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{
        order::{Status, Tab},
        profile, Order,
    };

    use super::Board;

    #[test]
    fn partitions_by_status() {
        let orders = [
            Status::New,
            Status::New,
            Status::Preparing,
            Status::Ready,
            Status::Completed,
            Status::Cancelled,
        ]
        .into_iter()
        .map(|status| {
            let mut o =
                Order::new(profile::Id::new(), profile::Id::new(), None, vec![]);
            o.status = status;
            o
        });

        let board = Board::arrange(orders);

        assert_eq!(board.tab(Tab::New).len(), 2);
        assert_eq!(board.tab(Tab::Preparing).len(), 1);
        assert_eq!(board.tab(Tab::Ready).len(), 2);
        assert!(board
            .ready
            .iter()
            .all(|o| matches!(o.status, Status::Ready | Status::Completed)));
    }
}
