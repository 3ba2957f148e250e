/// URL for accessing the PostgreSQL database. When absent, todos are kept in memory instead.
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. For formatting info, see [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Address the HTTP server listens on. Defaults to [DEFAULT_BIND_ADDR]
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Base URL the page loader uses to fetch the todo list. Defaults to this service's own
/// address, see [default_page_api_base_url]
pub const PAGE_API_BASE_URL: &str = "PAGE_API_BASE_URL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

/// Loopback URL reaching the server bound to `bind_addr`. The host part of the bind address
/// may be a wildcard like 0.0.0.0, so only its port is kept.
pub fn default_page_api_base_url(bind_addr: &str) -> String {
    let port = bind_addr
        .rsplit_once(':')
        .and_then(|(_, port)| port.parse::<u16>().ok())
        .unwrap_or(8080);

    format!("http://127.0.0.1:{port}")
}
