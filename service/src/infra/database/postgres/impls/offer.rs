//! [`Offer`]-related [`Database`] implementations.

use std::{cmp::Reverse, collections::HashMap};

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        offer::{self, Product, Service},
        Offer,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `services` table.
const SERVICE_COLUMNS: &str = "\
    id, provider_id, title, description, price, \
    duration, image, is_active, created_at";

/// Columns of the `products` table.
const PRODUCT_COLUMNS: &str = "\
    id, seller_id, title, description, price, images, is_available, \
    purpose, condition, category, contact_phone, created_at";

impl<C, IDs> Database<Select<By<HashMap<offer::Id, Offer>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[offer::Id]>,
{
    type Ok = HashMap<offer::Id, Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<offer::Id, Offer>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[offer::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        let services = format!(
            "SELECT {SERVICE_COLUMNS} \
             FROM services \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        let products = format!(
            "SELECT {PRODUCT_COLUMNS} \
             FROM products \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );

        let mut offers = self
            .query(&services, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Offer::from(service_from_row(row)))
            .collect::<Vec<_>>();
        offers.extend(
            self.query(&products, &[&ids, &limit])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(|row| Offer::from(product_from_row(row))),
        );

        Ok(offers.into_iter().map(|o| (o.id(), o)).collect())
    }
}

impl<C> Database<Select<By<Option<Offer>, offer::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<offer::Id, Offer>, [offer::Id; 1]>>,
        Ok = HashMap<offer::Id, Offer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Offer>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Offer>, read::offer::OwnedBy>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Offer>, read::offer::OwnedBy>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::offer::OwnedBy(owner_id) = by.into_inner();

        let services = format!(
            "SELECT {SERVICE_COLUMNS} \
             FROM services \
             WHERE provider_id = $1::UUID",
        );
        let products = format!(
            "SELECT {PRODUCT_COLUMNS} \
             FROM products \
             WHERE seller_id = $1::UUID",
        );

        let mut offers = self
            .query(&services, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Offer::from(service_from_row(row)))
            .collect::<Vec<_>>();
        offers.extend(
            self.query(&products, &[&owner_id])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(|row| Offer::from(product_from_row(row))),
        );
        offers.sort_by_key(|o| Reverse(o.created_at()));

        Ok(offers)
    }
}

impl<C> Database<Select<By<Vec<Product>, read::offer::Secondhand>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, read::offer::Secondhand>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} \
             FROM products \
             WHERE purpose = $1::VARCHAR \
               AND is_available \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&offer::product::Purpose::Desapego])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(product_from_row)
            .collect())
    }
}

impl<C> Database<Insert<Offer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Offer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(offer): Insert<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(offer)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Offer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(offer): Update<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        let conn: &C = self;
        match offer {
            Offer::Service(s) => {
                upsert_service(conn, s).await.map_err(tracerr::wrap!())
            }
            Offer::Product(p) => {
                upsert_product(conn, p).await.map_err(tracerr::wrap!())
            }
        }
    }
}

impl<C> Database<Delete<By<Offer, offer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Offer, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        for sql in [
            "DELETE FROM services WHERE id = $1::UUID",
            "DELETE FROM products WHERE id = $1::UUID",
        ] {
            _ = self.exec(sql, &[&id]).await.map_err(tracerr::wrap!())?;
        }
        Ok(())
    }
}

/// Inserts or overwrites the provided [`Service`] row.
async fn upsert_service<C: Connection>(
    conn: &C,
    service: Service,
) -> Result<(), Traced<database::Error>> {
    let Service {
        id,
        provider_id,
        title,
        description,
        price,
        duration,
        image,
        is_active,
        created_at,
    } = service;

    const SQL: &str = "\
        INSERT INTO services (\
            id, provider_id, title, description, price, \
            duration, image, is_active, created_at\
        ) \
        VALUES (\
            $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::NUMERIC, \
            $6::INT2, $7::VARCHAR, $8::BOOLEAN, $9::TIMESTAMPTZ\
        ) \
        ON CONFLICT (id) DO UPDATE \
        SET title = EXCLUDED.title, \
            description = EXCLUDED.description, \
            price = EXCLUDED.price, \
            duration = EXCLUDED.duration, \
            image = EXCLUDED.image, \
            is_active = EXCLUDED.is_active";
    conn.exec(
        SQL,
        &[
            &id,
            &provider_id,
            &title,
            &description,
            &price,
            &duration,
            &image,
            &is_active,
            &created_at,
        ],
    )
    .await
    .map_err(tracerr::wrap!())
    .map(drop)
}

/// Inserts or overwrites the provided [`Product`] row.
async fn upsert_product<C: Connection>(
    conn: &C,
    product: Product,
) -> Result<(), Traced<database::Error>> {
    let Product {
        id,
        seller_id,
        title,
        description,
        price,
        images,
        is_available,
        purpose,
        condition,
        category,
        contact_phone,
        created_at,
    } = product;

    const SQL: &str = "\
        INSERT INTO products (\
            id, seller_id, title, description, price, images, \
            is_available, purpose, condition, category, \
            contact_phone, created_at\
        ) \
        VALUES (\
            $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::NUMERIC, \
            $6::VARCHAR[], $7::BOOLEAN, $8::VARCHAR, $9::VARCHAR, \
            $10::VARCHAR, $11::VARCHAR, $12::TIMESTAMPTZ\
        ) \
        ON CONFLICT (id) DO UPDATE \
        SET title = EXCLUDED.title, \
            description = EXCLUDED.description, \
            price = EXCLUDED.price, \
            images = EXCLUDED.images, \
            is_available = EXCLUDED.is_available, \
            condition = EXCLUDED.condition, \
            category = EXCLUDED.category, \
            contact_phone = EXCLUDED.contact_phone";
    conn.exec(
        SQL,
        &[
            &id,
            &seller_id,
            &title,
            &description,
            &price,
            &images,
            &is_available,
            &purpose,
            &condition,
            &category,
            &contact_phone,
            &created_at,
        ],
    )
    .await
    .map_err(tracerr::wrap!())
    .map(drop)
}

/// Maps the provided `services` [`Row`] into a [`Service`].
fn service_from_row(row: &Row) -> Service {
    Service {
        id: row.get("id"),
        provider_id: row.get("provider_id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        duration: row.get("duration"),
        image: row.get("image"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

/// Maps the provided `products` [`Row`] into a [`Product`].
fn product_from_row(row: &Row) -> Product {
    Product {
        id: row.get("id"),
        seller_id: row.get("seller_id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        images: row.get("images"),
        is_available: row.get("is_available"),
        purpose: row.get("purpose"),
        condition: row.get("condition"),
        category: row.get("category"),
        contact_phone: row.get("contact_phone"),
        created_at: row.get("created_at"),
    }
}
