//! GraphQL API definitions.

pub mod booking;
pub mod cart;
pub mod catalog;
mod mutation;
pub mod offer;
pub mod order;
pub mod profile;
mod query;
pub mod scalar;
pub mod schedule;
pub mod settings;
mod subscription;

use crate::define_error;

pub use self::{
    booking::Booking,
    cart::Cart,
    catalog::Catalog,
    mutation::Mutation,
    offer::{Offer, OfferValue},
    order::Order,
    profile::Profile,
    query::Query,
    subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

/// Creates a new GraphQL [`Schema`] of the marketplace.
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, Subscription)
}

define_error! {
    enum PrivilegeError {
        #[code = "NOT_PROVIDER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `Profile` must be a provider"]
        Provider,

        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `Profile` must be a platform admin"]
        Admin,

        #[code = "NOT_OFFER_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `Profile` must own the `Offer`"]
        OfferOwner,

        #[code = "NOT_ORDER_PROVIDER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `Profile` must be the `Order` provider"]
        OrderProvider,
    }
}

#[cfg(test)]
mod spec {
    #[test]
    fn schema_exposes_marketplace() {
        let sdl = super::schema().as_sdl();

        for expected in [
            "interface Offer",
            "type ServiceOffer implements Offer",
            "type Product implements Offer",
            "type ScheduleDay",
            "enum OrderTab",
            "placeOrder",
            "confirmBooking",
            "input UpsellItemInput",
            "changeSlot",
            "updateProfile",
            "input ProviderDetailsInput",
            "waitSession",
        ] {
            assert!(sdl.contains(expected), "missing `{expected}`");
        }
    }
}
