//! Shared test database fixture for integration tests.

use sqlx::PgPool;
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

use polymarket_indexer::store::PostgresStore;

use super::containers::build_connection_string;

/// A test database instance with pool and container.
///
/// The container is kept alive as long as this struct exists. When
/// dropped, the container is automatically stopped.
pub struct TestDb {
    /// The connection pool to the test database.
    pub pool: PgPool,
    /// The `PostgresStore` wrapping the pool.
    pub store: PostgresStore,
    /// The container (kept alive for the duration of the test).
    _container: ContainerAsync<Postgres>,
}

impl TestDb {
    /// Start a fresh Postgres container, connect, and run migrations.
    ///
    /// # Panics
    ///
    /// Panics if container startup, connection, or migrations fail.
    pub async fn new() -> Self {
        let container = Postgres::default()
            .start()
            .await
            .expect("failed to start postgres container");

        let host = container.get_host().await.expect("failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("failed to get port");

        let connection_string = build_connection_string(&host.to_string(), port);

        let pool = connect_with_retries(&connection_string, 30)
            .await
            .expect("failed to connect to database");

        let store = PostgresStore::new(pool.clone());
        store
            .run_migrations()
            .await
            .expect("failed to run migrations");

        Self {
            pool,
            store,
            _container: container,
        }
    }
}

/// Connect with retries — the container's "ready" log line can precede the
/// point where it actually accepts connections by a moment.
async fn connect_with_retries(url: &str, max_attempts: u32) -> Result<PgPool, sqlx::Error> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match PgPool::connect(url).await {
            Ok(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
                Ok(_) => return Ok(pool),
                Err(e) if attempts < max_attempts => {
                    tracing::debug!("connection verify failed (attempt {attempts}): {e}");
                    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                }
                Err(e) => return Err(e),
            },
            Err(e) if attempts < max_attempts => {
                tracing::debug!("connection failed (attempt {attempts}): {e}");
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
