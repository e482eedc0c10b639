//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::{graphql_object, GraphQLInputObject};
use service::{
    command::{self, change_slot, create_offer, update_profile},
    domain::{self, booking::DayIndex, cart::Upsell, schedule::Client},
    query, Command as _, Query as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Adds a single unit of the specified `Offer` to the `Cart` of the
    /// current session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the specified ID does not
    ///                        exist;
    /// - `OFFER_UNAVAILABLE` - the `Offer` can't be bought currently.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addToCart",
            offer_id = %offer_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn add_to_cart(
        offer_id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        let cart = ctx.cart().await?;

        let offer = ctx
            .service()
            .execute(query::offer::ById::by(offer_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::OfferError::NotExists.into())
            .map_err(ctx.error())?;
        if !offer.is_available() {
            return Err(ctx.error()(CartError::OfferUnavailable.into()));
        }

        let mut cart = cart.lock().await;
        cart.add(&offer);
        Ok(cart.clone().into())
    }

    /// Removes a single unit of the specified `Offer` from the `Cart` of the
    /// current session.
    ///
    /// Does nothing if there is no such `Offer` in the `Cart`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeFromCart",
            offer_id = %offer_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_from_cart(
        offer_id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::Cart, Error> {
        let cart = ctx.cart().await?;
        let mut cart = cart.lock().await;
        cart.remove(offer_id.into());
        Ok(cart.clone().into())
    }

    /// Removes everything from the `Cart` of the current session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "clearCart",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn clear_cart(ctx: &Context) -> Result<api::Cart, Error> {
        let cart = ctx.cart().await?;
        let mut cart = cart.lock().await;
        cart.clear();
        Ok(cart.clone().into())
    }

    /// Places an `Order` of the `Cart` contents of the current session, at
    /// the prices they were added with.
    ///
    /// The `Cart` is cleared on success only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `EMPTY_CART` - the `Cart` has nothing to order;
    /// - `NOT_PRODUCT` - the `Cart` holds something other than a `Product`;
    /// - `MIXED_PROVIDERS` - the `Cart` holds `Product`s of different
    ///                       providers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "placeOrder",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn place_order(ctx: &Context) -> Result<api::Order, Error> {
        let my_id = ctx.current_session().await?.profile_id();
        let cart = ctx.cart().await?;

        // Hold the `Cart` until the `Order` is placed, so nothing added
        // meanwhile is lost by the clearing.
        let mut cart = cart.lock().await;
        let order = ctx
            .service()
            .execute(command::PlaceOrder {
                customer_id: my_id,
                items: cart.items().to_vec(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        cart.clear();

        Ok(order.into())
    }

    /// Requests a `Booking` of the specified service for the `Period` of a
    /// day, optionally ordering store `Product`s of the same provider along
    /// with it.
    ///
    /// `day` is an offset in days from today, in `[0, 30)` range.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `DAY_OUT_OF_RANGE` - `day` is out of the booking window;
    /// - `INVALID_QUANTITY` - the total quantity of an `upsell` `Product` is
    ///                        too large;
    /// - `SERVICE_NOT_EXISTS` - there is no active service with the specified
    ///                          ID;
    /// - `PERIOD_PAST` - the `Period` is already over;
    /// - `SLOT_UNAVAILABLE` - the `Slot` of the `Period` is taken already.
    #[tracing::instrument(
        skip_all,
        fields(
            day = day,
            gql.name = "confirmBooking",
            otel.name = Self::SPAN_NAME,
            period = ?period,
            service_id = %service_id,
            upsell = upsell.as_ref().map_or(0, Vec::len),
        ),
    )]
    pub async fn confirm_booking(
        service_id: api::offer::Id,
        day: i32,
        period: api::booking::Period,
        upsell: Option<Vec<UpsellItem>>,
        ctx: &Context,
    ) -> Result<api::booking::CheckoutResult, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        let day = u8::try_from(day)
            .ok()
            .and_then(DayIndex::new)
            .ok_or_else(|| BookingError::DayOutOfRange.into())
            .map_err(ctx.error())?;
        let upsell = upsell
            .unwrap_or_default()
            .into_iter()
            .map(|i| {
                (i.product_id.into(), u32::try_from(i.quantity).unwrap_or(0))
            })
            .collect::<Vec<_>>();
        let upsell = Upsell::try_from(upsell)
            .map_err(|_| BookingError::InvalidQuantity.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::ConfirmBooking {
                customer_id: my_id,
                service_id: service_id.into(),
                day,
                period: period.into(),
                upsell,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the `Slot` of the current provider schedule.
    ///
    /// `client` details are used for the `BOOK` action only, with the blank
    /// ones defaulted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_PROVIDER` - the current `Profile` is not a provider;
    /// - `DATE_OUT_OF_SCHEDULE` - the `Date` is out of the schedule;
    /// - `PERIOD_PAST` - the `Period` is already over;
    /// - `INVALID_SLOT_TRANSITION` - the `Slot` is not in the status the
    ///                               action requires.
    #[tracing::instrument(
        skip_all,
        fields(
            action = ?action,
            date = %date,
            gql.name = "changeSlot",
            otel.name = Self::SPAN_NAME,
            period = ?period,
        ),
    )]
    pub async fn change_slot(
        date: Date,
        period: api::booking::Period,
        action: api::schedule::SlotAction,
        client: Option<ManualClient>,
        ctx: &Context,
    ) -> Result<api::schedule::Slot, Error> {
        use api::schedule::SlotAction as A;

        let my_id = ctx.current_session().await?.profile_id();

        let change = match action {
            A::Book => {
                let ManualClient {
                    name,
                    phone,
                    service,
                    address,
                } = client.unwrap_or_default();
                change_slot::Change::Book(Client::manual(
                    name.map(Into::into),
                    phone.map(Into::into),
                    service.map(Into::into),
                    address.map(Into::into),
                ))
            }
            A::Confirm => change_slot::Change::Confirm,
            A::Reschedule => change_slot::Change::Reschedule,
            A::Block => change_slot::Change::Block,
        };

        ctx.service()
            .execute(command::ChangeSlot {
                provider_id: my_id,
                date,
                period: period.into(),
                change,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the specified `Order` of the current provider into the provided
    /// status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `ORDER_NOT_EXISTS` - the `Order` with the specified ID does not
    ///                        exist;
    /// - `NOT_ORDER_PROVIDER` - the `Order` is sold by another provider;
    /// - `INVALID_ORDER_TRANSITION` - the `Order` can't get the status from
    ///                                its current one.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateOrderStatus",
            order_id = %order_id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_order_status(
        order_id: api::order::Id,
        status: api::order::Status,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        ctx.service()
            .execute(command::UpdateOrderStatus {
                order_id: order_id.into(),
                initiator_id: my_id,
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new bookable service `Offer` of the current provider.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_PROVIDER` - the current `Profile` is not a provider;
    /// - `INVALID_DURATION` - `durationMinutes` is not a positive number of
    ///                        minutes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createService",
            otel.name = Self::SPAN_NAME,
            price = %price,
            title = %title,
        ),
    )]
    pub async fn create_service(
        title: api::offer::Title,
        description: Option<api::offer::Description>,
        price: Money,
        duration_minutes: Option<i32>,
        image: Option<api::offer::ImageUrl>,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        let duration = duration_minutes
            .map(|m| {
                i16::try_from(m)
                    .ok()
                    .and_then(domain::offer::service::Minutes::new)
                    .ok_or_else(|| OfferInputError::InvalidDuration.into())
                    .map_err(ctx.error())
            })
            .transpose()?;

        Self::create_offer(
            my_id,
            create_offer::Draft::Service {
                title: title.into(),
                description: description.map(Into::into).unwrap_or_default(),
                price,
                duration,
                image: image.map(Into::into),
            },
            ctx,
        )
        .await
    }

    /// Creates a new store `Product` of the current provider.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_PROVIDER` - the current `Profile` is not a provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createStoreProduct",
            otel.name = Self::SPAN_NAME,
            price = %price,
            title = %title,
        ),
    )]
    pub async fn create_store_product(
        title: api::offer::Title,
        description: Option<api::offer::Description>,
        price: Money,
        images: Option<Vec<api::offer::ImageUrl>>,
        category: Option<api::offer::Category>,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        Self::create_offer(
            my_id,
            create_offer::Draft::StoreProduct {
                title: title.into(),
                description: description.map(Into::into).unwrap_or_default(),
                price,
                images: images
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                category: category.map(Into::into),
            },
            ctx,
        )
        .await
    }

    /// Lists a secondhand `Product` of the current `Profile`.
    ///
    /// `contactPhone` defaults to the `Profile` phone.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createListing",
            otel.name = Self::SPAN_NAME,
            price = %price,
            title = %title,
        ),
    )]
    pub async fn create_listing(
        title: api::offer::Title,
        description: Option<api::offer::Description>,
        price: Money,
        images: Option<Vec<api::offer::ImageUrl>>,
        condition: Option<api::offer::Condition>,
        category: Option<api::offer::Category>,
        contact_phone: Option<api::profile::Phone>,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        Self::create_offer(
            my_id,
            create_offer::Draft::Listing {
                title: title.into(),
                description: description.map(Into::into).unwrap_or_default(),
                price,
                images: images
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                condition: condition.map(Into::into),
                category: category.map(Into::into),
                contact_phone: contact_phone.map(Into::into),
            },
            ctx,
        )
        .await
    }

    /// Makes the specified `Offer` of the current `Profile` (un)available.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the specified ID does not
    ///                        exist;
    /// - `NOT_OFFER_OWNER` - the `Offer` belongs to another `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            available = available,
            gql.name = "setOfferAvailability",
            offer_id = %offer_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_offer_availability(
        offer_id: api::offer::Id,
        available: bool,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        ctx.service()
            .execute(command::SetOfferAvailability {
                offer_id: offer_id.into(),
                initiator_id: my_id,
                available,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the specified `Offer` of the current `Profile`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `OFFER_NOT_EXISTS` - the `Offer` with the specified ID does not
    ///                        exist;
    /// - `NOT_OFFER_OWNER` - the `Offer` belongs to another `Profile`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteOffer",
            offer_id = %offer_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_offer(
        offer_id: api::offer::Id,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        ctx.service()
            .execute(command::DeleteOffer {
                offer_id: offer_id.into(),
                initiator_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the logo of the platform, or removes it if `null` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_ADMIN` - the current `Profile` is not a platform admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateBranding",
            logo_url = ?logo_url.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_branding(
        logo_url: Option<api::offer::ImageUrl>,
        ctx: &Context,
    ) -> Result<api::settings::Branding, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        ctx.service()
            .execute(command::UpdateBranding {
                initiator_id: my_id,
                logo_url: logo_url.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the details of the current `Profile`.
    ///
    /// Omitted details are left untouched. `provider` details replace the
    /// current ones as a whole.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated;
    /// - `NOT_PROVIDER` - `provider` details are given, but the current
    ///                    `Profile` is not a provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProfile",
            otel.name = Self::SPAN_NAME,
            provider = provider.is_some(),
        ),
    )]
    pub async fn update_profile(
        name: Option<api::profile::Name>,
        phone: Option<api::profile::Phone>,
        address: Option<api::profile::Address>,
        condo_name: Option<api::profile::CondoName>,
        provider: Option<ProviderDetails>,
        ctx: &Context,
    ) -> Result<api::Profile, Error> {
        let my_id = ctx.current_session().await?.profile_id();

        ctx.service()
            .execute(command::UpdateProfile {
                profile_id: my_id,
                name: name.map(Into::into),
                phone: phone.map(Into::into),
                address: address.map(Into::into),
                condo_name: condo_name.map(Into::into),
                provider: provider.map(|p| update_profile::ProviderDetails {
                    kind: p.kind.into(),
                    document: p.document.map(Into::into),
                    categories: p
                        .categories
                        .unwrap_or_default()
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Ends the current session, dropping its `Cart`.
    ///
    /// Returns `false` if the session had no state to drop.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current session is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "endSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn end_session(ctx: &Context) -> Result<bool, Error> {
        ctx.end_session().await
    }
}

impl Mutation {
    /// Executes the [`command::CreateOffer`] on behalf of the provided owner.
    async fn create_offer(
        owner_id: domain::profile::Id,
        draft: create_offer::Draft,
        ctx: &Context,
    ) -> Result<api::OfferValue, Error> {
        ctx.service()
            .execute(command::CreateOffer { owner_id, draft })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Store `Product` picked to be ordered along with a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "UpsellItemInput")]
pub struct UpsellItem {
    /// ID of the store `Product`.
    pub product_id: api::offer::Id,

    /// Picked quantity. Non-positive quantities are ignored, and the ones of
    /// a repeated `Product` are summed.
    pub quantity: i32,
}

/// Details of an off-platform client, booked manually by a provider.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "ManualClientInput")]
pub struct ManualClient {
    /// Name of the client.
    pub name: Option<api::profile::Name>,

    /// Phone of the client.
    pub phone: Option<api::profile::Phone>,

    /// Title of the appointment service.
    pub service: Option<api::offer::Title>,

    /// Address of the client.
    pub address: Option<api::profile::Address>,
}

/// Details of the current provider `Profile`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ProviderDetailsInput")]
pub struct ProviderDetails {
    /// What the provider mainly offers.
    pub kind: api::profile::ProviderKind,

    /// Tax document (CPF or CNPJ) of the provider.
    pub document: Option<api::profile::Document>,

    /// Categories the provider works in.
    pub categories: Option<Vec<api::offer::Category>>,
}

define_error! {
    enum CartError {
        #[code = "OFFER_UNAVAILABLE"]
        #[status = CONFLICT]
        #[message = "`Offer` can't be bought currently"]
        OfferUnavailable,
    }
}

define_error! {
    enum BookingError {
        #[code = "DAY_OUT_OF_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Day is out of the booking window"]
        DayOutOfRange,

        #[code = "INVALID_QUANTITY"]
        #[status = BAD_REQUEST]
        #[message = "Total quantity of an upsell `Product` is too large"]
        InvalidQuantity,
    }
}

define_error! {
    enum OfferInputError {
        #[code = "INVALID_DURATION"]
        #[status = BAD_REQUEST]
        #[message = "Duration must be a positive number of minutes"]
        InvalidDuration,
    }
}

define_error! {
    enum ScheduleError {
        #[code = "PERIOD_PAST"]
        #[status = CONFLICT]
        #[message = "`Period` is already over"]
        PeriodPast,
    }
}

impl AsError for command::place_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMPTY_CART"]
                #[status = BAD_REQUEST]
                #[message = "`Cart` has nothing to order"]
                EmptyCart,

                #[code = "MIXED_PROVIDERS"]
                #[status = BAD_REQUEST]
                #[message = "`Cart` holds `Product`s of different providers"]
                MixedProviders,

                #[code = "NOT_PRODUCT"]
                #[status = BAD_REQUEST]
                #[message = "`Cart` holds something other than a `Product`"]
                NotProduct,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmptyCart => Some(Error::EmptyCart.into()),
            Self::MixedProviders(_) => Some(Error::MixedProviders.into()),
            Self::NotProduct(_) => Some(Error::NotProduct.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
        }
    }
}

impl AsError for command::confirm_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SERVICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "There is no active service with the provided ID"]
                ServiceNotExists,

                #[code = "SLOT_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Slot` of the `Period` is taken already"]
                SlotUnavailable,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DayOutOfRange(_) => Some(BookingError::DayOutOfRange.into()),
            Self::PeriodPast(_) => Some(ScheduleError::PeriodPast.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
            Self::ServiceNotExists(_) => Some(Error::ServiceNotExists.into()),
            Self::SlotUnavailable(_) => Some(Error::SlotUnavailable.into()),
        }
    }
}

impl AsError for command::change_slot::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "DATE_OUT_OF_SCHEDULE"]
                #[status = BAD_REQUEST]
                #[message = "`Date` is out of the schedule"]
                DateOutOfSchedule,

                #[code = "INVALID_SLOT_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Slot` is not in the status the action requires"]
                InvalidTransition,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DateOutOfSchedule(_) => Some(Error::DateOutOfSchedule.into()),
            Self::NotProvider(_) => Some(api::PrivilegeError::Provider.into()),
            Self::PeriodPast(_) => Some(ScheduleError::PeriodPast.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
            Self::Transition(_) => Some(Error::InvalidTransition.into()),
        }
    }
}

impl AsError for command::update_order_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_ORDER_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Order` can't get the status from its current one"]
                InvalidTransition,

                #[code = "ORDER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Order` with the provided ID does not exist"]
                OrderNotExists,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidTransition(_) => Some(Error::InvalidTransition.into()),
            Self::NotOrderProvider(_) => {
                Some(api::PrivilegeError::OrderProvider.into())
            }
            Self::OrderNotExists(_) => Some(Error::OrderNotExists.into()),
        }
    }
}

impl AsError for command::create_offer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotProvider(_) => Some(api::PrivilegeError::Provider.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
        }
    }
}

impl AsError for command::set_offer_availability::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotOfferOwner(_) => {
                Some(api::PrivilegeError::OfferOwner.into())
            }
            Self::OfferNotExists(_) => {
                Some(api::query::OfferError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_offer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotOfferOwner(_) => {
                Some(api::PrivilegeError::OfferOwner.into())
            }
            Self::OfferNotExists(_) => {
                Some(api::query::OfferError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_branding::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotAdmin(_) => Some(api::PrivilegeError::Admin.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotProvider(_) => Some(api::PrivilegeError::Provider.into()),
            Self::ProfileNotExists(_) => {
                Some(api::query::ProfileError::NotExists.into())
            }
        }
    }
}
