use crate::act::{Scopes, WorkflowScope};
use app_error::AppError;
use async_trait::async_trait;
use database_entity::dto::{GlobalRole, ProjectRole};
use std::collections::HashSet;
use uuid::Uuid;

/// Union of the scopes granted by a global role and a set of project roles.
pub fn resolve_scopes(global_role: GlobalRole, project_roles: &[ProjectRole]) -> HashSet<WorkflowScope> {
  global_role
    .workflow_scopes()
    .iter()
    .chain(project_roles.iter().flat_map(|role| role.workflow_scopes()))
    .copied()
    .collect()
}

#[async_trait]
pub trait WorkflowAccessControl: Send + Sync + 'static {
  /// All scopes the user holds on the workflow. Empty for unknown users.
  async fn get_scopes(
    &self,
    user_uuid: &Uuid,
    workflow_id: &str,
  ) -> Result<HashSet<WorkflowScope>, AppError>;

  async fn has_scope(
    &self,
    user_uuid: &Uuid,
    workflow_id: &str,
    scope: WorkflowScope,
  ) -> Result<bool, AppError> {
    Ok(self.get_scopes(user_uuid, workflow_id).await?.contains(&scope))
  }

  /// Returns AppError::NotEnoughPermissions if the user does not hold the scope.
  async fn enforce_scope(
    &self,
    user_uuid: &Uuid,
    workflow_id: &str,
    scope: WorkflowScope,
  ) -> Result<(), AppError> {
    if self.has_scope(user_uuid, workflow_id, scope).await? {
      Ok(())
    } else {
      Err(AppError::NotEnoughPermissions {
        user: user_uuid.to_string(),
        action: format!("{} on workflow {}", scope, workflow_id),
      })
    }
  }
}
