//! [`Order`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, Context};

/// Purchase of store products from a single provider.
#[derive(Clone, Debug, From)]
pub struct Order(domain::Order);

/// Purchase of store products from a single provider.
#[graphql_object(context = Context)]
impl Order {
    /// Unique identifier of this `Order`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Order.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Customer `Profile` of this `Order`.
    pub fn customer(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Order` loaded from repository guarantees `Profile` \
                      existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.customer_id)
        }
    }

    /// Provider `Profile` of this `Order`.
    pub fn provider(&self) -> api::Profile {
        #[expect(
            unsafe_code,
            reason = "`Order` loaded from repository guarantees `Profile` \
                      existence"
        )]
        unsafe {
            api::Profile::new_unchecked(self.0.provider_id)
        }
    }

    /// Status of this `Order`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Total amount of this `Order`.
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Payment method tag of this `Order`.
    pub fn payment_method(&self) -> String {
        self.0.payment_method.code().to_owned()
    }

    /// Address this `Order` is delivered to.
    pub fn delivery_address(&self) -> api::profile::Address {
        self.0.delivery_address.clone().into()
    }

    /// Lines of this `Order`.
    pub fn items(&self) -> Vec<Item> {
        self.0.items.iter().cloned().map(Into::into).collect()
    }

    /// `DateTime` when this `Order` was placed.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Line of an [`Order`].
#[derive(Clone, Debug, From)]
pub struct Item(domain::order::Item);

/// Line of an `Order`.
#[graphql_object(name = "OrderItem", context = Context)]
impl Item {
    /// ID of the purchased `Product`.
    pub fn product_id(&self) -> api::offer::Id {
        self.0.product_id.into()
    }

    /// Purchased quantity.
    pub fn quantity(&self) -> i32 {
        self.0.quantity.into()
    }

    /// Unit price of the `Product` at the purchase moment.
    pub fn price_at_purchase(&self) -> Money {
        self.0.price_at_purchase
    }

    /// Amount paid for this line.
    pub fn subtotal(&self) -> Money {
        self.0.subtotal()
    }
}

/// Provider's [`Order`]s board.
#[derive(Clone, Debug, From)]
pub struct Board(read::order::Board);

/// Provider's `Order`s split into the fulfillment tabs, newest first.
///
/// Cancelled `Order`s appear in no tab.
#[graphql_object(name = "OrderBoard", context = Context)]
impl Board {
    /// `Order`s in the provided tab.
    pub fn tab(&self, tab: Tab) -> Vec<Order> {
        self.0.tab(tab.into()).iter().cloned().map(Into::into).collect()
    }

    /// Number of `Order`s awaiting preparation.
    pub fn new_count(&self) -> i32 {
        count(&self.0.new)
    }

    /// Number of `Order`s being prepared.
    pub fn preparing_count(&self) -> i32 {
        count(&self.0.preparing)
    }

    /// Number of ready or completed `Order`s.
    pub fn ready_count(&self) -> i32 {
        count(&self.0.ready)
    }
}

/// Returns the number of the provided [`Order`]s as a GraphQL integer.
fn count(orders: &[domain::Order]) -> i32 {
    i32::try_from(orders.len()).unwrap_or(i32::MAX)
}

/// Unique identifier of an `Order`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::order::Id)]
#[into(domain::order::Id)]
#[graphql(name = "OrderId", transparent)]
pub struct Id(Uuid);

/// Status of an `Order`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderStatus")]
pub enum Status {
    /// Placed, awaiting the provider.
    New,

    /// Being prepared.
    Preparing,

    /// Ready for pickup or delivery.
    Ready,

    /// Handed over.
    Completed,

    /// Rejected by the provider.
    Cancelled,
}

impl From<domain::order::Status> for Status {
    fn from(status: domain::order::Status) -> Self {
        use domain::order::Status as S;
        match status {
            S::New => Self::New,
            S::Preparing => Self::Preparing,
            S::Ready => Self::Ready,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::order::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::New => Self::New,
            Status::Preparing => Self::Preparing,
            Status::Ready => Self::Ready,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Tab of an `OrderBoard`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "OrderTab")]
pub enum Tab {
    /// New `Order`s.
    New,

    /// `Order`s being prepared.
    Preparing,

    /// Ready and completed `Order`s.
    Ready,
}

impl From<Tab> for domain::order::Tab {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::New => Self::New,
            Tab::Preparing => Self::Preparing,
            Tab::Ready => Self::Ready,
        }
    }
}
