//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, provider_id, customer_id, \
                   booking_date, booking_time, total_price, \
                   status, created_at \
            FROM bookings \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Booking>, read::booking::OfCustomer>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, read::booking::OfCustomer>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::OfCustomer(customer_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, provider_id, customer_id, \
                   booking_date, booking_time, total_price, \
                   status, created_at \
            FROM bookings \
            WHERE customer_id = $1::UUID \
            ORDER BY created_at DESC, id";
        Ok(self
            .query(SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            service_id,
            provider_id,
            customer_id,
            date,
            period,
            total_price,
            status,
            created_at,
        } = booking;

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, service_id, provider_id, customer_id, \
                booking_date, booking_time, total_price, \
                status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::DATE, $6::VARCHAR, $7::NUMERIC, \
                $8::VARCHAR, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &service_id,
                &provider_id,
                &customer_id,
                &date,
                &period,
                &total_price,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

/// Maps the provided `bookings` [`Row`] into a [`Booking`].
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        service_id: row.get("service_id"),
        provider_id: row.get("provider_id"),
        customer_id: row.get("customer_id"),
        date: row.get("booking_date"),
        period: row.get("booking_time"),
        total_price: row.get("total_price"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}
