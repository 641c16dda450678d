//! PostgreSQL store
//!
//! Handles connection pooling, schema bootstrap and the CRUD statements.

pub mod queries;

use crate::config::DatabaseConfig;
use crate::error::{ApiResult, AppError};
use crate::models::{Payload, Resource};
use crate::store::Store;
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime};
use queries::SqlBuilder;
use std::future::Future;
use std::time::Duration;
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// Store backed by a shared, bounded PostgreSQL pool
pub struct PgStore {
    pool: Pool,
    timeout: Duration,
}

impl PgStore {
    /// Build the pool and verify a connection can be checked out
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = Self::create_pool(config)?;
        let store = Self {
            pool,
            timeout: config.timeout(),
        };

        store
            .ping()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to verify database connection: {}", e))?;

        info!(
            "✅ Database connection successful ({}:{}/{}, TLS: {})",
            config.host, config.port, config.database, config.require_tls
        );
        Ok(store)
    }

    /// Create a connection pool with given configuration
    fn create_pool(config: &DatabaseConfig) -> anyhow::Result<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.database.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.max_pool_size));

        let pool = if config.require_tls {
            let certs = rustls_native_certs::load_native_certs();
            let mut root_store = rustls::RootCertStore::empty();
            for cert in certs.certs {
                root_store.add(cert).ok();
            }

            let tls_config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
            cfg.create_pool(Some(Runtime::Tokio1), tls)
                .map_err(|e| anyhow::anyhow!("Failed to create TLS pool: {}", e))?
        } else {
            cfg.create_pool(Some(Runtime::Tokio1), NoTls)
                .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))?
        };

        Ok(pool)
    }

    /// Create the three tables if they don't exist
    pub async fn migrate(&self) -> ApiResult<()> {
        let client = self.client().await?;
        for statement in queries::SCHEMA {
            client.batch_execute(statement).await?;
        }
        info!("✅ Database tables initialized");
        Ok(())
    }

    async fn client(&self) -> ApiResult<Object> {
        Ok(self.pool.get().await?)
    }

    /// Run `op` under the statement timeout
    async fn bounded<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>> + Send,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| AppError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list<R: Resource>(&self) -> ApiResult<Vec<R>> {
        let sql = SqlBuilder::select_all(R::TABLE, R::Payload::FIELDS);
        debug!("{}", sql);
        self.bounded(async {
            let client = self.client().await?;
            let rows = client.query(sql.as_str(), &[]).await?;
            let records = rows.iter().map(R::from_row).collect::<Result<Vec<_>, _>>()?;
            Ok::<_, AppError>(records)
        })
        .await
    }

    async fn find<R: Resource>(&self, id: i32) -> ApiResult<Option<R>> {
        let sql = SqlBuilder::select_by_id(R::TABLE, R::Payload::FIELDS);
        debug!("{} [id={}]", sql, id);
        self.bounded(async {
            let client = self.client().await?;
            let row = client.query_opt(sql.as_str(), &[&id]).await?;
            Ok::<_, AppError>(row.as_ref().map(R::from_row).transpose()?)
        })
        .await
    }

    async fn insert<R: Resource>(&self, payload: &R::Payload) -> ApiResult<R> {
        let sql = SqlBuilder::insert(R::TABLE, R::Payload::FIELDS);
        debug!("{}", sql);
        self.bounded(async {
            let client = self.client().await?;
            let row = client.query_one(sql.as_str(), &payload.params()).await?;
            Ok::<_, AppError>(R::from_row(&row)?)
        })
        .await
    }

    async fn update<R: Resource>(&self, id: i32, payload: &R::Payload) -> ApiResult<u64> {
        let sql = SqlBuilder::update(R::TABLE, R::Payload::FIELDS);
        debug!("{} [id={}]", sql, id);
        self.bounded(async {
            let client = self.client().await?;
            let mut params = payload.params();
            params.push(&id);
            Ok::<_, AppError>(client.execute(sql.as_str(), &params).await?)
        })
        .await
    }

    async fn delete<R: Resource>(&self, id: i32) -> ApiResult<u64> {
        let sql = SqlBuilder::delete(R::TABLE);
        debug!("{} [id={}]", sql, id);
        self.bounded(async {
            let client = self.client().await?;
            Ok::<_, AppError>(client.execute(sql.as_str(), &[&id]).await?)
        })
        .await
    }

    async fn ping(&self) -> ApiResult<()> {
        self.bounded(async {
            let client = self.client().await?;
            client.query_one(queries::PING, &[]).await?;
            Ok::<_, AppError>(())
        })
        .await
    }
}
