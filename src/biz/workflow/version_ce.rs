use access_control::act::WorkflowScope;
use app_error::AppError;
use async_trait::async_trait;
use database_entity::dto::{
  AFUser, AFWorkflow, AFWorkflowHistory, AFWorkflowHistoryMeta, InsertWorkflowHistoryParams,
  WorkflowGraph, WorkflowPatch,
};
use std::sync::Arc;
use tracing::{error, instrument, trace};

use crate::biz::workflow::finder::WorkflowFinder;
use crate::biz::workflow::history_store::WorkflowHistoryStore;
use crate::biz::workflow::metrics::HistoryMetrics;
use crate::biz::workflow::ops::WorkflowUpdater;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowVersionService: Send + Sync {
  async fn list(
    &self,
    user: &AFUser,
    workflow_id: &str,
    take: u32,
    skip: u32,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppError>;

  async fn get(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppError>;

  /// Stores the graph as a history entry. Never fails: errors are logged.
  async fn save_snapshot(&self, user: &AFUser, workflow: &WorkflowGraph, workflow_id: &str);

  /// Makes the stored version the live workflow. Returns `None` when the version
  /// or the workflow cannot be found for the user.
  async fn restore(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflow>, AppError>;
}

/// Workflow versioning used when licensed history is not active.
pub struct WorkflowVersionCeService {
  store: Arc<dyn WorkflowHistoryStore>,
  finder: Arc<dyn WorkflowFinder>,
  updater: Arc<dyn WorkflowUpdater>,
  metrics: Arc<HistoryMetrics>,
}

impl WorkflowVersionCeService {
  pub fn new(
    store: Arc<dyn WorkflowHistoryStore>,
    finder: Arc<dyn WorkflowFinder>,
    updater: Arc<dyn WorkflowUpdater>,
    metrics: Arc<HistoryMetrics>,
  ) -> Self {
    Self {
      store,
      finder,
      updater,
      metrics,
    }
  }

  async fn insert_snapshot(
    &self,
    user: &AFUser,
    workflow: &WorkflowGraph,
    workflow_id: &str,
  ) -> Result<bool, AppError> {
    let (nodes, connections) = match (&workflow.nodes, &workflow.connections) {
      (Some(nodes), Some(connections)) => (nodes.clone(), connections.clone()),
      _ => return Ok(false),
    };
    let params = InsertWorkflowHistoryParams {
      workflow_id: workflow_id.to_string(),
      version_id: workflow.version_id.clone(),
      authors: user.authors(),
      nodes,
      connections,
    };
    self.store.insert(&params).await
  }
}

#[async_trait]
impl WorkflowVersionService for WorkflowVersionCeService {
  async fn list(
    &self,
    user: &AFUser,
    workflow_id: &str,
    take: u32,
    skip: u32,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppError> {
    let workflow = self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Read])
      .await?;
    match workflow {
      None => Ok(vec![]),
      Some(workflow) => self.store.list_meta(&workflow.id, take, skip).await,
    }
  }

  async fn get(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppError> {
    let workflow = self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Read])
      .await?;
    if workflow.is_none() {
      return Ok(None);
    }
    self.store.find(workflow_id, version_id).await
  }

  async fn save_snapshot(&self, user: &AFUser, workflow: &WorkflowGraph, workflow_id: &str) {
    match self.insert_snapshot(user, workflow, workflow_id).await {
      Ok(true) => {
        trace!(
          "saved snapshot {} of workflow {}",
          workflow.version_id,
          workflow_id
        );
        self.metrics.record_snapshot_saved();
      },
      Ok(false) => self.metrics.record_snapshot_skipped(),
      Err(err) => {
        error!(
          "Failed to save workflow version {} for workflow {}: {}",
          workflow.version_id, workflow_id, err
        );
        self.metrics.record_snapshot_failed();
      },
    }
  }

  #[instrument(skip(self, user), fields(user = %user.uuid), err)]
  async fn restore(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflow>, AppError> {
    let snapshot = match self.get(user, workflow_id, version_id).await? {
      Some(snapshot) => snapshot,
      None => return Ok(None),
    };
    let current = match self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Update])
      .await?
    {
      Some(current) => current,
      None => return Ok(None),
    };

    // Keep the state being replaced reachable from history.
    self
      .save_snapshot(user, &WorkflowGraph::from(&current), workflow_id)
      .await;

    let patch = WorkflowPatch {
      nodes: Some(snapshot.nodes),
      connections: Some(snapshot.connections),
      ..Default::default()
    };
    let updated = self.updater.update(user, patch, workflow_id, true).await?;
    self.metrics.record_restore();
    Ok(Some(updated))
  }
}
