//! [`Order`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{offer, order, profile, Order},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Order>, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, customer_id, provider_id, status, total_amount, \
                   payment_method, delivery_address, created_at \
            FROM orders \
            WHERE id = $1::UUID";
        let Some(row) = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let conn: &C = self;
        Ok(with_items(conn, vec![from_row(&row)])
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl<C> Database<Select<By<Vec<Order>, read::order::OfProvider>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::OfProvider>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::OfProvider(provider_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, customer_id, provider_id, status, total_amount, \
                   payment_method, delivery_address, created_at \
            FROM orders \
            WHERE provider_id = $1::UUID \
            ORDER BY created_at DESC, id";
        let conn: &C = self;
        newest(conn, SQL, provider_id)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Order>, read::order::OfCustomer>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::OfCustomer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::OfCustomer(customer_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, customer_id, provider_id, status, total_amount, \
                   payment_method, delivery_address, created_at \
            FROM orders \
            WHERE customer_id = $1::UUID \
            ORDER BY created_at DESC, id";
        let conn: &C = self;
        newest(conn, SQL, customer_id)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let Order {
            id,
            customer_id,
            provider_id,
            status,
            total,
            payment_method,
            delivery_address,
            items,
            created_at,
        } = order;

        const ORDER_SQL: &str = "\
            INSERT INTO orders (\
                id, customer_id, provider_id, status, total_amount, \
                payment_method, delivery_address, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, $5::NUMERIC, \
                $6::VARCHAR, $7::VARCHAR, $8::TIMESTAMPTZ\
            )";
        _ = self
            .exec(
                ORDER_SQL,
                &[
                    &id,
                    &customer_id,
                    &provider_id,
                    &status,
                    &total,
                    &payment_method,
                    &delivery_address,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;

        if items.is_empty() {
            return Ok(());
        }
        let (item_ids, product_ids, quantities, prices): (
            Vec<order::ItemId>,
            Vec<offer::Id>,
            Vec<order::Quantity>,
            Vec<Money>,
        ) = items
            .into_iter()
            .map(|i| (i.id, i.product_id, i.quantity, i.price_at_purchase))
            .multiunzip();

        const ITEMS_SQL: &str = "\
            INSERT INTO order_items (\
                id, order_id, product_id, quantity, price_at_purchase\
            ) \
            SELECT item.id, $1::UUID, item.product_id, \
                   item.quantity, item.price \
            FROM unnest(\
                $2::UUID[], $3::UUID[], $4::INT4[], $5::NUMERIC[]\
            ) AS item(id, product_id, quantity, price)";
        self.exec(ITEMS_SQL, &[&id, &item_ids, &product_ids, &quantities, &prices])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Update<Order>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE orders \
            SET status = $2::VARCHAR, \
                total_amount = $3::NUMERIC, \
                payment_method = $4::VARCHAR, \
                delivery_address = $5::VARCHAR \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &order.id,
                &order.status,
                &order.total,
                &order.payment_method,
                &order.delivery_address,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Order, order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Order, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: order::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO orders_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE \
            SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Selects the [`Order`]s of the provided [`profile::Id`] with the provided
/// SQL, along with their [`order::Item`]s.
async fn newest<C: Connection>(
    conn: &C,
    sql: &str,
    profile_id: profile::Id,
) -> Result<Vec<Order>, Traced<database::Error>> {
    let orders = conn
        .query(sql, &[&profile_id])
        .await
        .map_err(tracerr::wrap!())?
        .iter()
        .map(from_row)
        .collect();
    with_items(conn, orders).await.map_err(tracerr::wrap!())
}

/// Fills the provided [`Order`]s with their stored [`order::Item`]s.
async fn with_items<C: Connection>(
    conn: &C,
    mut orders: Vec<Order>,
) -> Result<Vec<Order>, Traced<database::Error>> {
    if orders.is_empty() {
        return Ok(orders);
    }
    let ids = orders.iter().map(|o| o.id).collect::<Vec<_>>();

    const SQL: &str = "\
        SELECT id, order_id, product_id, quantity, price_at_purchase \
        FROM order_items \
        WHERE order_id = ANY($1::UUID[]) \
        ORDER BY order_id, id";
    let mut items: HashMap<order::Id, Vec<order::Item>> = conn
        .query(SQL, &[&ids])
        .await
        .map_err(tracerr::wrap!())?
        .iter()
        .map(|row| {
            (
                row.get::<_, order::Id>("order_id"),
                order::Item {
                    id: row.get("id"),
                    product_id: row.get("product_id"),
                    quantity: row.get("quantity"),
                    price_at_purchase: row.get("price_at_purchase"),
                },
            )
        })
        .into_group_map();

    for o in &mut orders {
        o.items = items.remove(&o.id).unwrap_or_default();
    }
    Ok(orders)
}

/// Maps the provided `orders` [`Row`] into an [`Order`] without items.
fn from_row(row: &Row) -> Order {
    Order {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        provider_id: row.get("provider_id"),
        status: row.get("status"),
        total: row.get("total_amount"),
        payment_method: row.get("payment_method"),
        delivery_address: row.get("delivery_address"),
        items: Vec::new(),
        created_at: row.get("created_at"),
    }
}
