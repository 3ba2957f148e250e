use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use persistence::db_todo_driven_ports::DbTodoPersistence;
use persistence::http_page_driven_ports::HttpTodoListSource;
use persistence::memory_todo_driven_ports::InMemoryTodoPersistence;
use persistence::{ExternalConnectivity, TodoStore};
use std::env;
use std::sync::Arc;
use tracing::info;

mod api;
mod app_env;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;

/// Application state shared by every request handler
pub struct SharedData {
    pub ext_cxn: ExternalConnectivity,
    pub todo_store: TodoStore,
    pub page_source: HttpTodoListSource,
}

type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Starting server without .env file.");
    }
    let otel_exporters = logging::exporters_from_env()?;
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    let (db_pool, todo_store) = match env::var(app_env::DB_URL) {
        Ok(db_url) => {
            info!("Storing todos in PostgreSQL");
            let pool = persistence::connect_sqlx(&db_url).await?;
            (Some(pool), TodoStore::Postgres(DbTodoPersistence))
        }
        Err(_) => {
            info!("{} is not set, storing todos in memory", app_env::DB_URL);
            (
                None,
                TodoStore::InMemory(InMemoryTodoPersistence::new_locked()),
            )
        }
    };

    let bind_addr =
        env::var(app_env::BIND_ADDR).unwrap_or_else(|_| app_env::DEFAULT_BIND_ADDR.to_owned());
    let page_api_base_url = env::var(app_env::PAGE_API_BASE_URL)
        .unwrap_or_else(|_| app_env::default_page_api_base_url(&bind_addr));
    info!("Page loader fetches todos from {page_api_base_url}");
    let shared_data = Arc::new(SharedData {
        ext_cxn: ExternalConnectivity::new(db_pool)?,
        todo_store,
        page_source: HttpTodoListSource::new(&page_api_base_url),
    });
    let router = routes::build_router(shared_data);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {bind_addr}"))?;

    info!("Starting server on {bind_addr}.");
    axum::serve(listener, router)
        .await
        .context("running the HTTP server")?;

    Ok(())
}
