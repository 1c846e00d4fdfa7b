use crate::act::WorkflowScope;
use crate::metrics::AccessControlMetrics;
use crate::workflow::{resolve_scopes, WorkflowAccessControl};
use app_error::AppError;
use async_trait::async_trait;
use database::project::select_workflow_roles;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::trace;
use uuid::Uuid;

/// Resolves workflow scopes from `af_user` and the project relations of the
/// projects a workflow is shared with.
#[derive(Clone)]
pub struct WorkflowAccessControlImpl {
  pg_pool: PgPool,
  metrics: AccessControlMetrics,
}

impl WorkflowAccessControlImpl {
  pub fn new(pg_pool: PgPool, metrics: AccessControlMetrics) -> Self {
    Self { pg_pool, metrics }
  }
}

#[async_trait]
impl WorkflowAccessControl for WorkflowAccessControlImpl {
  async fn get_scopes(
    &self,
    user_uuid: &Uuid,
    workflow_id: &str,
  ) -> Result<HashSet<WorkflowScope>, AppError> {
    self.metrics.enforce_count.inc();
    let scopes = match select_workflow_roles(&self.pg_pool, user_uuid, workflow_id).await? {
      Some((global_role, project_roles)) => resolve_scopes(global_role, &project_roles),
      None => HashSet::new(),
    };
    if scopes.is_empty() {
      self.metrics.denied_count.inc();
    }
    trace!(
      "user {} scopes on workflow {}: {:?}",
      user_uuid,
      workflow_id,
      scopes
    );
    Ok(scopes)
  }
}
