use crate::app_env;
use crate::config::OtelEndpoints;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, field, info_span};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-service";

/// Struct containing OpenTelemetry primitives which export data to a tracing server
pub struct OtelExporters {
    pub tracer: Tracer,
    pub meter: SdkMeterProvider,
}

/// Wraps every RPC in a span carrying the call's method, path, and outcome. Trace context
/// sent by the caller in W3C headers becomes the span's parent.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let rpc_span = info_span!(
                    "rpc",
                    method = &request.method().as_str(),
                    path = request.uri().path(),
                    response_status = field::Empty,
                    latency_ms = field::Empty,
                );

                rpc_span.set_parent(global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                }));

                rpc_span
            })
            .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                span.record("response_status", field::display(response.status()));
                span.record("latency_ms", latency_millis(latency));
                debug!("rpc processing complete");
            }),
    )
}

/// Whole milliseconds in [latency], saturating at [u64::MAX]
fn latency_millis(latency: Duration) -> u64 {
    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)
}

/// Instantiates OpenTelemetry exporters which run in the background and send tracing/metrics
/// data to an OpenTelemetry-compatible gRPC endpoint (typically http://localhost:4317 with a standard
/// sidecar setup). Must be called from within the Tokio runtime.
pub fn init_exporters(endpoints: &OtelEndpoints) -> Result<OtelExporters, anyhow::Error> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.spans.as_str())
        .build()
        .context("building the span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.metrics.as_str())
        .build()
        .context("building the metric exporter")?;

    let metrics_reader = PeriodicReader::builder(meter_export, runtime::Tokio).build();
    let service_resource = Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

    let tracer = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(service_resource.clone())
        .build()
        .tracer(SERVICE_NAME);
    let meter = SdkMeterProvider::builder()
        .with_reader(metrics_reader)
        .with_resource(service_resource)
        .build();

    Ok(OtelExporters { tracer, meter })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .context("building the logging filter")
}

/// Sets up the global logging and tracing sinks. Spans and events at the "debug" level and above
/// go to the OpenTelemetry sinks when [otel_exporters] is provided, while [env_filter] applies
/// only to the JSON logger printing to stdout. Libraries still logging through the "log" crate
/// are bridged in by tracing-subscriber.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    match otel_exporters {
        Some(exporters) => registry()
            .with(LevelFilter::DEBUG)
            .with(OpenTelemetryLayer::new(exporters.tracer))
            .with(MetricsLayer::new(exporters.meter))
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init(),
        None => registry()
            .with(LevelFilter::DEBUG)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init(),
    }
}
