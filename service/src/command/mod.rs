//! [`Command`] definition.

pub mod authorize_session;
pub mod change_slot;
pub mod confirm_booking;
pub mod create_offer;
pub mod delete_offer;
pub mod place_order;
pub mod set_offer_availability;
pub mod update_branding;
pub mod update_order_status;
pub mod update_profile;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_session::AuthorizeSession, change_slot::ChangeSlot,
    confirm_booking::ConfirmBooking, create_offer::CreateOffer,
    delete_offer::DeleteOffer, place_order::PlaceOrder,
    set_offer_availability::SetOfferAvailability,
    update_branding::UpdateBranding, update_order_status::UpdateOrderStatus,
    update_profile::UpdateProfile,
};
