//! PostgreSQL-backed parts repository.
//!
//! Every write runs in one transaction that first takes a transaction-scoped
//! advisory lock, so concurrent loads and clears on `repuestos` serialise and
//! a replace is never observed half done.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{PartsRepository, PartsRepositoryError};
use crate::domain::{PartRecord, SearchKeyword, StoredPart};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{contains_pattern, to_count};
use super::models::{NewPartRow, PartRow};
use super::pool::{DbPool, PoolError};
use super::schema::repuestos;

/// Advisory lock key guarding writes to `repuestos`.
pub const PARTS_WRITE_LOCK_KEY: i64 = 0x7265_7075_6573_746f;

/// Rows per `INSERT`. Seven bound columns per row keeps each statement well
/// under PostgreSQL's 65535 parameter limit.
const INSERT_CHUNK_ROWS: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Append,
    Replace,
}

/// Diesel-backed implementation of [`PartsRepository`].
#[derive(Clone)]
pub struct DieselPartsRepository {
    pool: DbPool,
}

impl DieselPartsRepository {
    /// Create a repository using `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use inventory_backend::outbound::persistence::{
    ///     DbPool, DieselPartsRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/inventario")).await?;
    /// let repository = DieselPartsRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn write(
        &self,
        records: &[PartRecord],
        mode: WriteMode,
    ) -> Result<u64, PartsRepositoryError> {
        let rows: Vec<NewPartRow<'_>> = records.iter().map(NewPartRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = conn
            .transaction(|conn| {
                async move {
                    acquire_write_lock(conn).await?;
                    if mode == WriteMode::Replace {
                        let deleted = diesel::delete(repuestos::table).execute(conn).await?;
                        debug!(deleted, "cleared parts before replace");
                    }
                    let mut inserted = 0;
                    for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
                        inserted += diesel::insert_into(repuestos::table)
                            .values(chunk)
                            .execute(conn)
                            .await?;
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(to_count(inserted))
    }
}

async fn acquire_write_lock(conn: &mut AsyncPgConnection) -> QueryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<BigInt, _>(PARTS_WRITE_LOCK_KEY)
        .execute(conn)
        .await
        .map(|_| ())
}

fn map_pool_error(error: PoolError) -> PartsRepositoryError {
    map_basic_pool_error(error, PartsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PartsRepositoryError {
    map_basic_diesel_error(
        error,
        PartsRepositoryError::query,
        PartsRepositoryError::connection,
    )
}

fn to_stored_part(row: PartRow) -> StoredPart {
    StoredPart {
        id: row.id,
        part: PartRecord {
            code: row.codigo,
            brand: row.marca,
            entries: row.entradas,
            exits: row.salidas,
            stock: row.stock,
            unit_price: row.precios,
            inventory_value: row.importe_inventario,
        },
    }
}

#[async_trait]
impl PartsRepository for DieselPartsRepository {
    async fn append(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError> {
        self.write(records, WriteMode::Append).await
    }

    async fn replace_all(&self, records: &[PartRecord]) -> Result<u64, PartsRepositoryError> {
        self.write(records, WriteMode::Replace).await
    }

    async fn clear_all(&self) -> Result<u64, PartsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = conn
            .transaction(|conn| {
                async move {
                    acquire_write_lock(conn).await?;
                    diesel::delete(repuestos::table).execute(conn).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(to_count(deleted))
    }

    async fn search(
        &self,
        keyword: &SearchKeyword,
    ) -> Result<Vec<StoredPart>, PartsRepositoryError> {
        let pattern = contains_pattern(keyword);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PartRow> = repuestos::table
            .filter(
                repuestos::codigo
                    .ilike(pattern.as_str())
                    .or(repuestos::marca.ilike(pattern.as_str())),
            )
            .order(repuestos::id.asc())
            .select(PartRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(to_stored_part).collect())
    }
}
