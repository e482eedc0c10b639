//! Platform-wide [`Database`] implementations.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::settings::Branding,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Branding>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Branding>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<Branding>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT logo_url, updated_at \
            FROM app_settings \
            WHERE id = 1";
        Ok(self
            .query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Branding {
                logo_url: row.get("logo_url"),
                updated_at: row.get("updated_at"),
            }))
    }
}

impl<C> Database<Update<Branding>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(branding): Update<Branding>,
    ) -> Result<Self::Ok, Self::Err> {
        let Branding {
            logo_url,
            updated_at,
        } = branding;

        const SQL: &str = "\
            INSERT INTO app_settings (id, logo_url, updated_at) \
            VALUES (1, $1::VARCHAR, $2::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET logo_url = EXCLUDED.logo_url, \
                updated_at = EXCLUDED.updated_at";
        self.exec(SQL, &[&logo_url, &updated_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::Overview, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::Overview;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::Overview, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT (SELECT COUNT(*) FROM profiles) AS profiles, \
                   (SELECT COUNT(*) FROM services) AS services, \
                   (SELECT COUNT(*) FROM products) AS products, \
                   (SELECT COUNT(*) FROM bookings) AS bookings, \
                   (SELECT COUNT(*) FROM orders) AS orders, \
                   (SELECT COALESCE(SUM(total_amount), 0) FROM orders) \
                       AS revenue";
        Ok(self
            .query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::Overview {
                profiles: row.get("profiles"),
                services: row.get("services"),
                products: row.get("products"),
                bookings: row.get("bookings"),
                orders: row.get("orders"),
                revenue: row.get("revenue"),
            })
            .unwrap_or_default())
    }
}
