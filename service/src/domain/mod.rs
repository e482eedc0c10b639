//! Domain definitions.

pub mod booking;
pub mod cart;
pub mod offer;
pub mod order;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod settings;

pub use self::{
    booking::Booking, cart::Cart, offer::Offer, order::Order,
    profile::Profile, schedule::Slot, session::Session,
};
