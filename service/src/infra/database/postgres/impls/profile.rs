//! [`Profile`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{profile, Profile},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<profile::Id, Profile>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[profile::Id]>,
{
    type Ok = HashMap<profile::Id, Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<profile::Id, Profile>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[profile::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, name, role, provider_kind, \
                   phone, address, condo_name, document, categories, \
                   is_admin, created_at \
            FROM profiles \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let p = from_row(row);
                (p.id, p)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Profile>, profile::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<profile::Id, Profile>, [profile::Id; 1]>>,
        Ok = HashMap<profile::Id, Profile>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, profile::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Profile>, read::profile::Providers>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Profile>, read::profile::Providers>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::profile::Providers { kind } = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, role, provider_kind, \
                   phone, address, condo_name, document, categories, \
                   is_admin, created_at \
            FROM profiles \
            WHERE role = 'provider' \
              AND ($1::VARCHAR IS NULL OR provider_kind = $1::VARCHAR) \
            ORDER BY name, id";
        Ok(self
            .query(SQL, &[&kind])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Profile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(profile): Insert<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let Profile {
            id,
            name,
            role,
            provider_kind,
            phone,
            address,
            condo_name,
            document,
            categories,
            is_admin,
            created_at,
        } = profile;

        const SQL: &str = "\
            INSERT INTO profiles (\
                id, name, role, provider_kind, \
                phone, address, condo_name, document, categories, \
                is_admin, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR[], $10::BOOLEAN, $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                role = EXCLUDED.role, \
                provider_kind = EXCLUDED.provider_kind, \
                phone = EXCLUDED.phone, \
                address = EXCLUDED.address, \
                condo_name = EXCLUDED.condo_name, \
                document = EXCLUDED.document, \
                categories = EXCLUDED.categories, \
                is_admin = EXCLUDED.is_admin";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &role,
                &provider_kind,
                &phone,
                &address,
                &condo_name,
                &document,
                &categories,
                &is_admin,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Profile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let Profile {
            id,
            name,
            provider_kind,
            phone,
            address,
            condo_name,
            document,
            categories,
            ..
        } = profile;

        const SQL: &str = "\
            UPDATE profiles \
            SET name = $2::VARCHAR, \
                provider_kind = $3::VARCHAR, \
                phone = $4::VARCHAR, \
                address = $5::VARCHAR, \
                condo_name = $6::VARCHAR, \
                document = $7::VARCHAR, \
                categories = $8::VARCHAR[] \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &provider_kind,
                &phone,
                &address,
                &condo_name,
                &document,
                &categories,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

/// Maps the provided `profiles` [`Row`] into a [`Profile`].
fn from_row(row: &Row) -> Profile {
    Profile {
        id: row.get("id"),
        name: row.get("name"),
        role: row.get("role"),
        provider_kind: row.get("provider_kind"),
        phone: row.get("phone"),
        address: row.get("address"),
        condo_name: row.get("condo_name"),
        document: row.get("document"),
        categories: row.get("categories"),
        is_admin: row.get("is_admin"),
        created_at: row.get("created_at"),
    }
}
