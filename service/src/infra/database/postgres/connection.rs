//! [`Connection`] definitions.

use std::{fmt, future::Future};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio_postgres::{types::ToSql, GenericClient, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client as NonTx, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Generic database connection.
pub trait Connection {
    /// Queries the provided statement with the given parameters and returns the
    /// resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to query the statement.
    fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>
    where
        T: ToStatement + Send + Sync + ?Sized;

    /// Queries the provided statement with the given parameters and returns the
    /// optional resulting row.
    ///
    /// # Errors
    ///
    /// If failed to query the statement.
    fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>
    where
        T: ToStatement + Send + Sync + ?Sized;

    /// Executes the provided statement with the given parameters and returns
    /// the number of affected rows.
    ///
    /// # Errors
    ///
    /// If failed to execute the statement.
    fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>
    where
        T: ToStatement + Send + Sync + ?Sized;

    /// Executes the provided batch query.
    ///
    /// # Errors
    ///
    /// If failed to execute the batch query.
    fn batch_exec(
        &self,
        stmt: &str,
    ) -> impl Future<Output = Result<(), Traced<database::Error>>>;
}

/// Transactional Postgres database [`Connection`].
#[self_referencing]
pub struct Tx {
    /// [`NonTx`] [`Connection`] the transaction was started from.
    non_tx: NonTx,

    /// Transaction started in the [`Connection`], until it's committed.
    #[borrows(mut non_tx)]
    #[not_covariant]
    tx: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tx")
            .field("committed", &self.with_tx(|tx| tx.is_none()))
            .finish_non_exhaustive()
    }
}

impl Tx {
    /// Begins a new [`Tx`] on the provided [`NonTx`] [`Connection`].
    ///
    /// # Errors
    ///
    /// If failed to begin a transaction.
    pub async fn begin(client: NonTx) -> Result<Self, Traced<database::Error>> {
        Self::try_new_async_send(client, |c| {
            c.transaction().map_ok(Some).boxed()
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
    }

    /// Commits this [`Tx`].
    ///
    /// Committing an already committed [`Tx`] does nothing.
    ///
    /// # Errors
    ///
    /// If failed to commit this [`Tx`].
    pub async fn commit(mut self) -> Result<(), Traced<database::Error>> {
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "different variance, see \
                      https://doc.rust-lang.org/nomicon/subtyping.html#variance"
        )]
        let Some(tx) = self.with_tx_mut(|tx| tx.take()) else {
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    /// Returns the underlying [`Transaction`] of this [`Tx`].
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already.
    ///
    /// [`Transaction`]: tokio_postgres::Transaction
    fn raw(
        &self,
    ) -> Result<&tokio_postgres::Transaction<'_>, Traced<database::Error>>
    {
        self.with_tx(|tx| tx.as_ref().map(|tx| &**tx))
            .ok_or_else(|| tracerr::new!(postgres::Error::Committed))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let client: &tokio_postgres::Client = self;
        query(client, stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let client: &tokio_postgres::Client = self;
        query_opt(client, stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let client: &tokio_postgres::Client = self;
        exec(client, stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn batch_exec(
        &self,
        stmt: &str,
    ) -> Result<(), Traced<database::Error>> {
        let client: &tokio_postgres::Client = self;
        batch_exec(client, stmt).await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let tx = self.raw().map_err(tracerr::wrap!())?;
        query(tx, stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let tx = self.raw().map_err(tracerr::wrap!())?;
        query_opt(tx, stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + Send + Sync + ?Sized,
    {
        let tx = self.raw().map_err(tracerr::wrap!())?;
        exec(tx, stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn batch_exec(
        &self,
        stmt: &str,
    ) -> Result<(), Traced<database::Error>> {
        let tx = self.raw().map_err(tracerr::wrap!())?;
        batch_exec(tx, stmt).await.map_err(tracerr::wrap!())
    }
}

/// Queries rows with the provided [`GenericClient`].
async fn query<C, T>(
    client: &C,
    stmt: &T,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Vec<Row>, Traced<database::Error>>
where
    C: GenericClient + Sync,
    T: ToStatement + Send + Sync + ?Sized,
{
    let rows = client
        .query(stmt, params)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
    tracing::trace!(rows = rows.len(), "SQL query");
    Ok(rows)
}

/// Queries an optional row with the provided [`GenericClient`].
async fn query_opt<C, T>(
    client: &C,
    stmt: &T,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Option<Row>, Traced<database::Error>>
where
    C: GenericClient + Sync,
    T: ToStatement + Send + Sync + ?Sized,
{
    let row = client
        .query_opt(stmt, params)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
    tracing::trace!(rows = usize::from(row.is_some()), "SQL query");
    Ok(row)
}

/// Executes a statement with the provided [`GenericClient`].
async fn exec<C, T>(
    client: &C,
    stmt: &T,
    params: &[&(dyn ToSql + Sync)],
) -> Result<u64, Traced<database::Error>>
where
    C: GenericClient + Sync,
    T: ToStatement + Send + Sync + ?Sized,
{
    let affected = client
        .execute(stmt, params)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
    tracing::trace!(rows = affected, "SQL statement");
    Ok(affected)
}

/// Executes a batch of statements with the provided [`GenericClient`].
async fn batch_exec<C>(
    client: &C,
    stmt: &str,
) -> Result<(), Traced<database::Error>>
where
    C: GenericClient + Sync,
{
    client
        .batch_execute(stmt)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}
