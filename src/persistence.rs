pub mod db_todo_driven_ports;
pub mod http_page_driven_ports;
pub mod memory_todo_driven_ports;

use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::{Todo, TodoUpdate};
use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use anyhow::{Context, anyhow};
use db_todo_driven_ports::DbTodoPersistence;
use memory_todo_driven_ports::InMemoryTodoPersistence;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres};
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;

/// Builds the PostgreSQL connection pool used by the database-backed todo store
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, anyhow::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
        .context("connecting to the database")
}

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: Option<PgPool>,
    http_client: reqwest_middleware::ClientWithMiddleware,
}

impl ExternalConnectivity {
    /// Accepts the database pool (if the service runs against a database) and builds
    /// the tracing-aware HTTP client alongside it
    pub fn new(db: Option<PgPool>) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("building the HTTP client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(ExternalConnectivity { db, http_client })
    }
}

/// A handle from ExternalConnectivity which can connect to a database
pub struct PoolConnectionHandle {
    active_connection: PoolConnection<Postgres>,
}

impl ConnectionHandle for PoolConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut self.active_connection
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle<'cxn_borrow> = PoolConnectionHandle;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error> {
        let Some(ref db) = self.db else {
            return Err(anyhow!("no database is configured for this service"));
        };
        let handle = PoolConnectionHandle {
            active_connection: db
                .acquire()
                .await
                .context("acquiring a connection from the db pool")?,
        };

        Ok(handle)
    }

    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http_client
    }
}

/// The todo store picked at startup: memory-backed and ephemeral, or database-backed and durable
pub enum TodoStore {
    InMemory(RwLock<InMemoryTodoPersistence>),
    Postgres(DbTodoPersistence),
}

impl TodoReader for TodoStore {
    async fn all(
        &self,
        ext_cxn: &mut impl external_connections::ExternalConnectivity,
    ) -> Result<Vec<Todo>, anyhow::Error> {
        match self {
            Self::InMemory(store) => store.all(ext_cxn).await,
            Self::Postgres(store) => store.all(ext_cxn).await,
        }
    }
}

impl TodoWriter for TodoStore {
    async fn insert(
        &self,
        todo: &Todo,
        ext_cxn: &mut impl external_connections::ExternalConnectivity,
    ) -> Result<Todo, anyhow::Error> {
        match self {
            Self::InMemory(store) => store.insert(todo, ext_cxn).await,
            Self::Postgres(store) => store.insert(todo, ext_cxn).await,
        }
    }

    async fn delete(
        &self,
        uid: Uuid,
        ext_cxn: &mut impl external_connections::ExternalConnectivity,
    ) -> Result<bool, anyhow::Error> {
        match self {
            Self::InMemory(store) => store.delete(uid, ext_cxn).await,
            Self::Postgres(store) => store.delete(uid, ext_cxn).await,
        }
    }

    async fn update(
        &self,
        uid: Uuid,
        update: &TodoUpdate,
        ext_cxn: &mut impl external_connections::ExternalConnectivity,
    ) -> Result<Option<Todo>, anyhow::Error> {
        match self {
            Self::InMemory(store) => store.update(uid, update, ext_cxn).await,
            Self::Postgres(store) => store.update(uid, update, ext_cxn).await,
        }
    }
}
