use access_control::act::WorkflowScope;
use access_control::workflow::WorkflowAccessControl;
use app_error::AppError;
use async_trait::async_trait;
use database::workflow::select_workflow;
use database_entity::dto::{AFUser, AFWorkflow};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::trace;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowFinder: Send + Sync {
  /// Returns the workflow only when the user holds every one of `scopes` on it.
  async fn find_workflow_for_user(
    &self,
    workflow_id: &str,
    user: &AFUser,
    scopes: &[WorkflowScope],
  ) -> Result<Option<AFWorkflow>, AppError>;
}

pub struct PgWorkflowFinder {
  pg_pool: PgPool,
  access_control: Arc<dyn WorkflowAccessControl>,
}

impl PgWorkflowFinder {
  pub fn new(pg_pool: PgPool, access_control: Arc<dyn WorkflowAccessControl>) -> Self {
    Self {
      pg_pool,
      access_control,
    }
  }
}

#[async_trait]
impl WorkflowFinder for PgWorkflowFinder {
  async fn find_workflow_for_user(
    &self,
    workflow_id: &str,
    user: &AFUser,
    scopes: &[WorkflowScope],
  ) -> Result<Option<AFWorkflow>, AppError> {
    let granted = self
      .access_control
      .get_scopes(&user.uuid, workflow_id)
      .await?;
    if let Some(missing) = scopes.iter().find(|scope| !granted.contains(*scope)) {
      trace!(
        "user {} lacks {} on workflow {}",
        user.uuid,
        missing,
        workflow_id
      );
      return Ok(None);
    }
    select_workflow(&self.pg_pool, workflow_id).await
  }
}
