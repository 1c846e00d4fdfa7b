use access_control::act::WorkflowScope;
use app_error::AppError;
use database_entity::dto::{
  AFUser, AFWorkflow, AFWorkflowHistory, AFWorkflowHistoryMeta, WorkflowGraph,
};
use shared_entity::dto::workflow_version_dto::{ListWorkflowVersionsQuery, VersionActionResponse};
use std::sync::Arc;
use tracing::trace;

use crate::biz::license::LicenseState;
use crate::biz::workflow::finder::WorkflowFinder;
use crate::biz::workflow::version_ce::WorkflowVersionService;

/// Entry point of the version endpoints.
///
/// Every operation returns its neutral result without touching the version
/// service while licensed workflow history is active.
pub struct WorkflowVersionsCeController {
  versions: Arc<dyn WorkflowVersionService>,
  license: Arc<dyn LicenseState>,
  finder: Arc<dyn WorkflowFinder>,
}

impl WorkflowVersionsCeController {
  pub fn new(
    versions: Arc<dyn WorkflowVersionService>,
    license: Arc<dyn LicenseState>,
    finder: Arc<dyn WorkflowFinder>,
  ) -> Self {
    Self {
      versions,
      license,
      finder,
    }
  }

  pub async fn list(
    &self,
    user: &AFUser,
    workflow_id: &str,
    query: &ListWorkflowVersionsQuery,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppError> {
    if self.license.is_workflow_history_licensed() {
      return Ok(vec![]);
    }
    self
      .versions
      .list(user, workflow_id, query.take(), query.skip())
      .await
  }

  pub async fn get(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppError> {
    if self.license.is_workflow_history_licensed() {
      return Ok(None);
    }
    self.versions.get(user, workflow_id, version_id).await
  }

  pub async fn snapshot(
    &self,
    user: &AFUser,
    workflow_id: &str,
  ) -> Result<VersionActionResponse, AppError> {
    if self.license.is_workflow_history_licensed() {
      return Ok(VersionActionResponse::skipped());
    }
    let workflow = self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Read])
      .await?;
    match workflow {
      None => Ok(VersionActionResponse::completed(false)),
      Some(workflow) => {
        self
          .versions
          .save_snapshot(user, &WorkflowGraph::from(&workflow), workflow_id)
          .await;
        Ok(VersionActionResponse::completed(true))
      },
    }
  }

  pub async fn restore(
    &self,
    user: &AFUser,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<VersionActionResponse, AppError> {
    if self.license.is_workflow_history_licensed() {
      return Ok(VersionActionResponse::skipped());
    }
    match self.versions.restore(user, workflow_id, version_id).await? {
      Some(restored) => {
        self.record_saved_workflow(user, &restored).await;
        Ok(VersionActionResponse::completed(true))
      },
      None => Ok(VersionActionResponse::completed(false)),
    }
  }

  /// Records the state a workflow was just saved in.
  pub async fn record_saved_workflow(&self, user: &AFUser, workflow: &AFWorkflow) {
    if self.license.is_workflow_history_licensed() {
      trace!("licensed history records workflow {}", workflow.id);
      return;
    }
    self
      .versions
      .save_snapshot(user, &WorkflowGraph::from(workflow), &workflow.id)
      .await;
  }
}
