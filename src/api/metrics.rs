use actix_web::web::Data;
use actix_web::{web, HttpResponse, Result, Scope};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use tracing::trace;

use crate::state::AppState;

pub fn metrics_scope() -> Scope {
  web::scope("/metrics").service(web::resource("").route(web::get().to(metrics_handler)))
}

async fn metrics_handler(state: Data<AppState>) -> Result<HttpResponse> {
  let mut body = String::new();
  encode(&mut body, &state.metrics.registry).map_err(|e| {
    tracing::error!("Failed to encode metrics: {:?}", e);
    actix_web::error::ErrorInternalServerError(e)
  })?;
  Ok(
    HttpResponse::Ok()
      .content_type("application/openmetrics-text; version=1.0.0; charset=utf-8")
      .body(body),
  )
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
  pub endpoint: String,
  pub status: u16,
}

/// Per-endpoint request counts and latencies, labelled by route pattern.
#[derive(Clone)]
pub struct RequestMetrics {
  requests_count: Family<EndpointLabels, Counter>,
  requests_latency: Family<EndpointLabels, Histogram>,
}

impl RequestMetrics {
  pub fn register(registry: &mut Registry) -> Self {
    let metrics = Self {
      requests_count: Family::default(),
      requests_latency: Family::<EndpointLabels, Histogram>::new_with_constructor(|| {
        Histogram::new(exponential_buckets(1.0, 2.0, 14))
      }),
    };
    let web_registry = registry.sub_registry_with_prefix("http");
    web_registry.register(
      "requests_count",
      "number of handled requests",
      metrics.requests_count.clone(),
    );
    web_registry.register(
      "requests_latency",
      "request latency in milliseconds",
      metrics.requests_latency.clone(),
    );
    metrics
  }

  pub fn record_request(
    &self,
    request_id: Option<String>,
    endpoint: String,
    duration_millis: u64,
    status: u16,
  ) {
    trace!(
      "request {:?} to {} took {}ms, status {}",
      request_id,
      endpoint,
      duration_millis,
      status
    );
    let labels = EndpointLabels { endpoint, status };
    self.requests_count.get_or_create(&labels).inc();
    self
      .requests_latency
      .get_or_create(&labels)
      .observe(duration_millis as f64);
  }
}
