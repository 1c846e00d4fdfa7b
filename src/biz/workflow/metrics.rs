use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

#[derive(Default, Clone)]
pub struct HistoryMetrics {
  snapshot_saved_count: Counter,
  snapshot_skipped_count: Counter,
  snapshot_failed_count: Counter,
  restore_count: Counter,
}

impl HistoryMetrics {
  pub fn register(registry: &mut Registry) -> Self {
    let metrics = Self::default();
    let history_registry = registry.sub_registry_with_prefix("workflow_history");
    history_registry.register(
      "snapshot_saved_count",
      "Total count of snapshots written",
      metrics.snapshot_saved_count.clone(),
    );
    history_registry.register(
      "snapshot_skipped_count",
      "Total count of snapshots skipped because the version already existed or the graph was incomplete",
      metrics.snapshot_skipped_count.clone(),
    );
    history_registry.register(
      "snapshot_failed_count",
      "Total count of snapshots that failed to be written",
      metrics.snapshot_failed_count.clone(),
    );
    history_registry.register(
      "restore_count",
      "Total count of restored versions",
      metrics.restore_count.clone(),
    );
    metrics
  }

  pub fn record_snapshot_saved(&self) {
    self.snapshot_saved_count.inc();
  }

  pub fn record_snapshot_skipped(&self) {
    self.snapshot_skipped_count.inc();
  }

  pub fn record_snapshot_failed(&self) {
    self.snapshot_failed_count.inc();
  }

  pub fn record_restore(&self) {
    self.restore_count.inc();
  }

  #[cfg(test)]
  pub fn snapshot_failed_count(&self) -> u64 {
    self.snapshot_failed_count.get()
  }

  #[cfg(test)]
  pub fn snapshot_saved_count(&self) -> u64 {
    self.snapshot_saved_count.get()
  }
}
