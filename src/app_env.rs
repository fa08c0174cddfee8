/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// TCP port the RPC server binds to
pub const SERVER_PORT: &str = "SERVER_PORT";
/// Maximum number of pooled database connections
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Seconds a call may wait for a pooled connection before it fails as unavailable
pub const DB_ACQUIRE_TIMEOUT_SECS: &str = "DB_ACQUIRE_TIMEOUT_SECS";
/// Seconds a single call may run before it's cancelled
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub mod test {
    /// URL for accessing the PostgreSQL database during integration tests (should not contain a database name in the path)
    pub const TEST_DB_URL: &str = "TEST_DB_URL";
}
