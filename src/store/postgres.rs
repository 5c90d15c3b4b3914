//! `PostgreSQL` implementation of the [`CheckpointStore`] port using `SQLx`.
//!
//! # Type Conversions
//!
//! `PostgreSQL` uses signed integers (`i64`) for numeric columns while our
//! domain uses `u64` block numbers. The cast is safe because block numbers
//! won't realistically exceed `i64::MAX`.
#![allow(clippy::cast_possible_wrap)]

use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use tracing::{debug, instrument};

use crate::error::{InfraError, Result};
use crate::ports::store::CheckpointStore;
use crate::types::checkpoint::Checkpoint;
use crate::types::primitives::{BlockNumber, Hash32};

// ═══════════════════════════════════════════════════════════════════════════════
// POSTGRES STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// `PostgreSQL`-backed [`CheckpointStore`].
///
/// One row per `service_name` in a single `checkpoints` table — the
/// indexer's only durable, owned state (§3, §4.5).
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgreSQL` store with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to apply.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InfraError::Internal(format!("migration error: {e}")))?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct CheckpointRow {
    service_name: String,
    last_block: i64,
    last_block_hash: Vec<u8>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<CheckpointRow> for Checkpoint {
    type Error = InfraError;

    fn try_from(row: CheckpointRow) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            service_name: row.service_name,
            last_block: BlockNumber::new(row.last_block as u64),
            last_block_hash: Hash32::from_slice(&row.last_block_hash)
                .map_err(|e| InfraError::Internal(format!("invalid block hash in DB: {e}")))?,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CheckpointStore for PostgresStore {
    #[instrument(skip(self), fields(service = service_name))]
    async fn get_or_create(
        &self,
        service_name: &str,
        default_start_block: BlockNumber,
    ) -> Result<Checkpoint> {
        let row = sqlx::query_as::<_, CheckpointRow>(
            r"
            SELECT service_name, last_block, last_block_hash, updated_at
            FROM checkpoints
            WHERE service_name = $1
            ",
        )
        .bind(service_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        if let Some(row) = row {
            return Ok(row.try_into()?);
        }

        let fresh = Checkpoint::fresh(service_name, default_start_block);
        sqlx::query(
            r"
            INSERT INTO checkpoints (service_name, last_block, last_block_hash, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (service_name) DO NOTHING
            ",
        )
        .bind(&fresh.service_name)
        .bind(fresh.last_block.get() as i64)
        .bind(fresh.last_block_hash.as_bytes().as_slice())
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        debug!("checkpoint created");

        // Another racing instance may have inserted first; re-read to return
        // whichever row actually won.
        let row = sqlx::query_as::<_, CheckpointRow>(
            r"
            SELECT service_name, last_block, last_block_hash, updated_at
            FROM checkpoints
            WHERE service_name = $1
            ",
        )
        .bind(service_name)
        .fetch_one(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        Ok(row.try_into()?)
    }

    #[instrument(skip(self), fields(service = service_name, last_block = last_block.get()))]
    async fn update(
        &self,
        service_name: &str,
        last_block: BlockNumber,
        last_block_hash: Hash32,
    ) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE checkpoints
            SET last_block = $2, last_block_hash = $3, updated_at = NOW()
            WHERE service_name = $1
            ",
        )
        .bind(service_name)
        .bind(last_block.get() as i64)
        .bind(last_block_hash.as_bytes().as_slice())
        .execute(&self.pool)
        .await
        .map_err(InfraError::Database)?;

        if result.rows_affected() == 0 {
            return Err(InfraError::Internal(format!(
                "update called before get_or_create for service {service_name}"
            ))
            .into());
        }

        debug!("checkpoint updated");
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // Full integration tests require a running PostgreSQL instance and live
    // in tests/store_integration.rs.

    #[test]
    fn postgres_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresStore>();
    }
}
