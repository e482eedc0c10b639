//! [`Slot`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        profile,
        schedule::{self, Client},
        Slot,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Slot>, schedule::Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, schedule::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let schedule::Key {
            provider_id,
            date,
            period,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT provider_id, slot_date, period, status, source, \
                   client_name, client_phone, client_service, \
                   client_address, booking_id, updated_at \
            FROM slots \
            WHERE provider_id = $1::UUID \
              AND slot_date = $2::DATE \
              AND period = $3::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&provider_id, &date, &period])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Slot>, read::schedule::Span>>> for Postgres<C>
where
    C: Connection,
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

        const SQL: &str = "\
            SELECT provider_id, slot_date, period, status, source, \
                   client_name, client_phone, client_service, \
                   client_address, booking_id, updated_at \
            FROM slots \
            WHERE provider_id = $1::UUID \
              AND slot_date >= $2::DATE \
              AND slot_date < $3::DATE \
            ORDER BY slot_date, period";
        Ok(self
            .query(SQL, &[&provider_id, &from, &to])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Slot>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(slot): Insert<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        // Fails with a unique violation if the `Slot` is taken already.
        const SQL: &str = "\
            INSERT INTO slots (\
                provider_id, slot_date, period, status, source, \
                client_name, client_phone, client_service, \
                client_address, booking_id, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::DATE, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::UUID, $11::TIMESTAMPTZ\
            )";
        let conn: &C = self;
        write(conn, SQL, &slot).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Slot>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(slot): Update<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO slots (\
                provider_id, slot_date, period, status, source, \
                client_name, client_phone, client_service, \
                client_address, booking_id, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::DATE, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::UUID, $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (provider_id, slot_date, period) DO UPDATE \
            SET status = EXCLUDED.status, \
                source = EXCLUDED.source, \
                client_name = EXCLUDED.client_name, \
                client_phone = EXCLUDED.client_phone, \
                client_service = EXCLUDED.client_service, \
                client_address = EXCLUDED.client_address, \
                booking_id = EXCLUDED.booking_id, \
                updated_at = EXCLUDED.updated_at";
        let conn: &C = self;
        write(conn, SQL, &slot).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Slot, schedule::Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Slot, schedule::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let schedule::Key {
            provider_id,
            date,
            period,
        } = by.into_inner();

        const SQL: &str = "\
            DELETE FROM slots \
            WHERE provider_id = $1::UUID \
              AND slot_date = $2::DATE \
              AND period = $3::VARCHAR";
        self.exec(SQL, &[&provider_id, &date, &period])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Slot, schedule::Key>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Slot, schedule::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let schedule::Key {
            provider_id,
            date,
            period,
        } = by.into_inner();

        const SQL: &str = "\
            INSERT INTO slots_lock (provider_id, slot_date, period) \
            VALUES ($1::UUID, $2::DATE, $3::VARCHAR) \
            ON CONFLICT (provider_id, slot_date, period) DO UPDATE \
            SET period = EXCLUDED.period";
        self.exec(SQL, &[&provider_id, &date, &period])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Writes the provided [`Slot`] with the provided `INSERT` statement.
async fn write<C: Connection>(
    conn: &C,
    sql: &str,
    slot: &Slot,
) -> Result<(), Traced<database::Error>> {
    let client = slot.client.as_ref();
    let name: Option<&profile::Name> = client.map(|c| &c.name);
    let phone = client.and_then(|c| c.phone.as_ref());
    let service = client.map(|c| &c.service);
    let address = client.map(|c| &c.address);

    conn.exec(
        sql,
        &[
            &slot.provider_id,
            &slot.date,
            &slot.period,
            &slot.status,
            &slot.source,
            &name,
            &phone,
            &service,
            &address,
            &slot.booking_id,
            &slot.updated_at,
        ],
    )
    .await
    .map_err(tracerr::wrap!())
    .map(drop)
}

/// Maps the provided `slots` [`Row`] into a [`Slot`].
fn from_row(row: &Row) -> Slot {
    let client = row
        .get::<_, Option<profile::Name>>("client_name")
        .map(|name| Client {
            name,
            phone: row.get("client_phone"),
            service: row.get("client_service"),
            address: row.get("client_address"),
        });

    Slot {
        provider_id: row.get("provider_id"),
        date: row.get("slot_date"),
        period: row.get("period"),
        status: row.get("status"),
        source: row.get("source"),
        client,
        booking_id: row.get("booking_id"),
        updated_at: row.get("updated_at"),
    }
}
