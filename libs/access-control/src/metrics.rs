use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

#[derive(Clone, Default)]
pub struct AccessControlMetrics {
  pub(crate) enforce_count: Counter,
  pub(crate) denied_count: Counter,
}

impl AccessControlMetrics {
  pub fn register(registry: &mut Registry) -> Self {
    let metrics = Self::default();
    let ac_registry = registry.sub_registry_with_prefix("ac");
    ac_registry.register(
      "scope_check_count",
      "number of workflow scope lookups",
      metrics.enforce_count.clone(),
    );
    ac_registry.register(
      "scope_denied_count",
      "number of lookups that found no scope at all",
      metrics.denied_count.clone(),
    );
    metrics
  }
}
