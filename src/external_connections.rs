use sqlx::PgConnection;

/// A handle to a database connection which can be borrowed to run queries
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Represents the clients needed to reach systems outside this service. Driven adapters
/// pull what they need from here so business logic never touches a concrete client.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Acquires a database connection. Fails if the service runs without a database.
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;

    /// Shared HTTP client for outbound requests
    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware;
}
