//! In-memory [`Database`] implementation.
//!
//! Mirrors the [`Postgres`] semantics closely enough to exercise the
//! [`Service`] without a running database: a transaction works on its own
//! copy of the state, which replaces the shared one on [`Commit`] only.
//!
//! [`Postgres`]: crate::infra::Postgres
//! [`Service`]: crate::Service

use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    Money,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{
        booking, offer, order, profile, schedule, settings::Branding, Booking,
        Offer, Order, Profile, Slot,
    },
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every further access to the provided [`Table`] fail.
    pub fn fail_on(&self, table: Table) {
        _ = self
            .0
            .shared
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table);
    }
}

/// Table of the [`Memory`] database, used for failure injection.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Table {
    /// [`Profile`]s.
    #[display("profiles")]
    Profiles,

    /// [`Offer`]s of both kinds.
    #[display("offers")]
    Offers,

    /// [`Booking`]s.
    #[display("bookings")]
    Bookings,

    /// [`Order`] rows.
    #[display("orders")]
    Orders,

    /// [`order::Item`] rows.
    #[display("order_items")]
    OrderItems,

    /// Stored [`Slot`]s.
    #[display("slots")]
    Slots,

    /// [`Branding`] row.
    #[display("app_settings")]
    Settings,
}

/// Contents of the [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Profile`]s.
    profiles: HashMap<profile::Id, Profile>,

    /// Stored [`Offer`]s.
    offers: HashMap<offer::Id, Offer>,

    /// Stored [`Booking`]s.
    bookings: HashMap<booking::Id, Booking>,

    /// Stored [`Order`]s along with their [`order::Item`]s.
    orders: HashMap<order::Id, Order>,

    /// Stored non-free [`Slot`]s.
    slots: HashMap<schedule::Key, Slot>,

    /// Stored [`Branding`], if any.
    branding: Option<Branding>,
}

/// State shared by all the clones of a [`Memory`] database.
#[derive(Debug, Default)]
struct Shared {
    /// Committed [`State`].
    state: Mutex<State>,

    /// [`Table`]s failing on access.
    failing: Mutex<HashSet<Table>>,
}

/// Non-transactional [`Memory`] client.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// [`Shared`] state of the database.
    shared: Arc<Shared>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client this [`Tx`] was started from.
    origin: NonTx,

    /// Working copy of the [`State`].
    work: Arc<Mutex<State>>,
}

/// Access to the [`State`] of a [`Memory`] client.
pub trait Store {
    /// Runs the provided function over the [`State`], touching the provided
    /// [`Table`].
    ///
    /// # Errors
    ///
    /// If the [`Table`] was made failing with [`Memory::fail_on()`].
    fn access<R>(
        &self,
        table: Table,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>>;
}

impl NonTx {
    /// Checks whether the provided [`Table`] is accessible.
    fn check(&self, table: Table) -> Result<(), Traced<database::Error>> {
        let failing = self
            .shared
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&table);
        if failing {
            return Err(tracerr::map_from(tracerr::new!(Error::Unavailable(
                table
            ))));
        }
        Ok(())
    }
}

impl Store for NonTx {
    fn access<R>(
        &self,
        table: Table,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.check(table)?;
        let mut state =
            self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut state))
    }
}

impl Store for Tx {
    fn access<R>(
        &self,
        table: Table,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.origin.check(table)?;
        let mut state =
            self.work.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut state))
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Row with the same key already exists in the [`Table`].
    #[display("duplicate key in `{_0}` table")]
    Conflict(#[error(not(source))] Table),

    /// [`Table`] is unavailable.
    #[display("`{_0}` table is unavailable")]
    Unavailable(#[error(not(source))] Table),
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let work = self
            .0
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(Memory(Tx {
            origin: self.0.clone(),
            work: Arc::new(Mutex::new(work)),
        }))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let work = self
            .0
            .work
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        *self
            .0
            .origin
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = work;
        Ok(())
    }
}

/// Implements [`Lock`] as a no-op, since [`Memory`] accesses are serialized
/// anyway.
macro_rules! impl_lock {
    ($($entity:ty => $key:ty),* $(,)?) => {$(
        impl<S: Store> Database<Lock<By<$entity, $key>>> for Memory<S> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                _: Lock<By<$entity, $key>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(())
            }
        }
    )*};
}

impl_lock! {
    Order => order::Id,
    Slot => schedule::Key,
}

impl<S: Store> Database<Insert<Profile>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(profile): Insert<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Profiles, |s| {
            _ = s.profiles.insert(profile.id, profile);
        })
    }
}

impl<S: Store> Database<Update<Profile>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Profiles, |s| {
            if let Some(p) = s.profiles.get_mut(&profile.id) {
                *p = profile;
            }
        })
    }
}

impl<S: Store> Database<Select<By<Option<Profile>, profile::Id>>>
    for Memory<S>
{
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .access(Table::Profiles, |s| s.profiles.get(&id).cloned())
    }
}

impl<S: Store> Database<Select<By<Vec<Profile>, read::profile::Providers>>>
    for Memory<S>
{
    type Ok = Vec<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Profile>, read::profile::Providers>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::profile::Providers { kind } = by.into_inner();
        self.0.access(Table::Profiles, |s| {
            let mut providers = s
                .profiles
                .values()
                .filter(|p| {
                    p.is_provider()
                        && kind.map_or(true, |k| p.provider_kind == Some(k))
                })
                .cloned()
                .collect::<Vec<_>>();
            providers.sort_by(|a, b| {
                AsRef::<str>::as_ref(&a.name).cmp(b.name.as_ref())
            });
            providers
        })
    }
}

impl<S: Store> Database<Select<By<Option<Offer>, offer::Id>>> for Memory<S> {
    type Ok = Option<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Offer>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.access(Table::Offers, |s| s.offers.get(&id).cloned())
    }
}

impl<S, IDs> Database<Select<By<HashMap<offer::Id, Offer>, IDs>>>
    for Memory<S>
where
    S: Store,
    IDs: AsRef<[offer::Id]>,
{
    type Ok = HashMap<offer::Id, Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<offer::Id, Offer>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.0.access(Table::Offers, |s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| Some((*id, s.offers.get(id)?.clone())))
                .collect()
        })
    }
}

impl<S: Store> Database<Select<By<Vec<Offer>, read::offer::OwnedBy>>>
    for Memory<S>
{
    type Ok = Vec<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Offer>, read::offer::OwnedBy>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::offer::OwnedBy(owner_id) = by.into_inner();
        self.0.access(Table::Offers, |s| {
            let mut offers = s
                .offers
                .values()
                .filter(|o| o.owner_id() == owner_id)
                .cloned()
                .collect::<Vec<_>>();
            offers.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
            offers
        })
    }
}

impl<S: Store>
    Database<Select<By<Vec<offer::Product>, read::offer::Secondhand>>>
    for Memory<S>
{
    type Ok = Vec<offer::Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<offer::Product>, read::offer::Secondhand>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Offers, |s| {
            let mut products = s
                .offers
                .values()
                .filter_map(|o| match o {
                    Offer::Product(p)
                        if p.is_available
                            && p.purpose
                                == offer::product::Purpose::Desapego =>
                    {
                        Some(p.clone())
                    }
                    Offer::Product(_) | Offer::Service(_) => None,
                })
                .collect::<Vec<_>>();
            products.sort_by_key(|p| std::cmp::Reverse(p.created_at));
            products
        })
    }
}

impl<S: Store> Database<Insert<Offer>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(offer): Insert<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(offer)).await.map_err(tracerr::wrap!())
    }
}

impl<S: Store> Database<Update<Offer>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(offer): Update<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Offers, |s| {
            _ = s.offers.insert(offer.id(), offer);
        })
    }
}

impl<S: Store> Database<Delete<By<Offer, offer::Id>>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Offer, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.access(Table::Offers, |s| {
            _ = s.offers.remove(&id);
        })
    }
}

impl<S: Store> Database<Insert<Booking>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<S: Store> Database<Update<Booking>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Bookings, |s| {
            _ = s.bookings.insert(booking.id, booking);
        })
    }
}

impl<S: Store> Database<Select<By<Option<Booking>, booking::Id>>>
    for Memory<S>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .access(Table::Bookings, |s| s.bookings.get(&id).cloned())
    }
}

impl<S: Store> Database<Select<By<Vec<Booking>, read::booking::OfCustomer>>>
    for Memory<S>
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::OfCustomer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::OfCustomer(customer_id) = by.into_inner();
        self.0.access(Table::Bookings, |s| {
            let mut bookings = s
                .bookings
                .values()
                .filter(|b| b.customer_id == customer_id)
                .cloned()
                .collect::<Vec<_>>();
            bookings.sort_by_key(|b| std::cmp::Reverse(b.created_at));
            bookings
        })
    }
}

impl<S: Store> Database<Insert<Order>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let items = order.items.clone();
        let id = order.id;
        self.0.access(Table::Orders, |s| {
            _ = s.orders.insert(id, Order { items: vec![], ..order });
        })?;
        self.0.access(Table::OrderItems, |s| {
            if let Some(o) = s.orders.get_mut(&id) {
                o.items = items;
            }
        })
    }
}

impl<S: Store> Database<Update<Order>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Orders, |s| {
            let items = s
                .orders
                .get(&order.id)
                .map(|o| o.items.clone())
                .unwrap_or_default();
            _ = s.orders.insert(order.id, Order { items, ..order });
        })
    }
}

impl<S: Store> Database<Select<By<Option<Order>, order::Id>>> for Memory<S> {
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0.access(Table::Orders, |s| s.orders.get(&id).cloned())
    }
}

impl<S: Store> Database<Select<By<Vec<Order>, read::order::OfProvider>>>
    for Memory<S>
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::OfProvider>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::OfProvider(provider_id) = by.into_inner();
        self.0.access(Table::Orders, |s| {
            newest_orders(s, |o| o.provider_id == provider_id)
        })
    }
}

impl<S: Store> Database<Select<By<Vec<Order>, read::order::OfCustomer>>>
    for Memory<S>
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::OfCustomer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::OfCustomer(customer_id) = by.into_inner();
        self.0.access(Table::Orders, |s| {
            newest_orders(s, |o| o.customer_id == customer_id)
        })
    }
}

/// Collects the [`Order`]s matching the provided `filter`, newest first.
fn newest_orders(state: &State, filter: impl Fn(&Order) -> bool) -> Vec<Order> {
    let mut orders = state
        .orders
        .values()
        .filter(|o| filter(o))
        .cloned()
        .collect::<Vec<_>>();
    orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
    orders
}

impl<S: Store> Database<Select<By<Option<Slot>, schedule::Key>>>
    for Memory<S>
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, schedule::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        self.0.access(Table::Slots, |s| s.slots.get(&key).cloned())
    }
}

impl<S: Store> Database<Select<By<Vec<Slot>, read::schedule::Span>>>
    for Memory<S>
{
    type Ok = Vec<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Slot>, read::schedule::Span>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::schedule::Span {
            provider_id,
            from,
            to,
        } = by.into_inner();
        self.0.access(Table::Slots, |s| {
            let mut slots = s
                .slots
                .values()
                .filter(|sl| {
                    sl.provider_id == provider_id
                        && sl.date >= from
                        && sl.date < to
                })
                .cloned()
                .collect::<Vec<_>>();
            slots.sort_by_key(|sl| (sl.date, sl.period.code()));
            slots
        })
    }
}

impl<S: Store> Database<Insert<Slot>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(slot): Insert<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        let inserted = self.0.access(Table::Slots, |s| {
            match s.slots.entry(slot.key()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(e) => {
                    _ = e.insert(slot);
                    true
                }
            }
        })?;
        if !inserted {
            return Err(tracerr::map_from(tracerr::new!(Error::Conflict(
                Table::Slots
            ))));
        }
        Ok(())
    }
}

impl<S: Store> Database<Update<Slot>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(slot): Update<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Slots, |s| {
            _ = s.slots.insert(slot.key(), slot);
        })
    }
}

impl<S: Store> Database<Delete<By<Slot, schedule::Key>>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Slot, schedule::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        self.0.access(Table::Slots, |s| {
            _ = s.slots.remove(&key);
        })
    }
}

impl<S: Store> Database<Select<By<Option<Branding>, ()>>> for Memory<S> {
    type Ok = Option<Branding>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<Branding>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Settings, |s| s.branding.clone())
    }
}

impl<S: Store> Database<Update<Branding>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(branding): Update<Branding>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.access(Table::Settings, |s| {
            s.branding = Some(branding);
        })
    }
}

impl<S: Store> Database<Select<By<read::Overview, ()>>> for Memory<S> {
    type Ok = read::Overview;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::Overview, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        /// Converts a collection length into a counter.
        fn count(len: usize) -> i64 {
            i64::try_from(len).unwrap_or(i64::MAX)
        }

        self.0.access(Table::Orders, |s| {
            let (services, products) =
                s.offers.values().fold((0, 0), |(sv, pr), o| match o {
                    Offer::Service(_) => (sv + 1, pr),
                    Offer::Product(_) => (sv, pr + 1),
                });
            read::Overview {
                profiles: count(s.profiles.len()),
                services,
                products,
                bookings: count(s.bookings.len()),
                orders: count(s.orders.len()),
                revenue: s.orders.values().map(|o| o.total).sum::<Money>(),
            }
        })
    }
}
