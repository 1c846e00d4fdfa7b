use access_control::act::WorkflowScope;
use app_error::AppError;
use async_trait::async_trait;
use database::project::{get_or_create_personal_project, insert_shared_workflow};
use database::workflow::{insert_workflow, select_workflow, update_workflow};
use database_entity::dto::{
  AFUser, AFWorkflow, CreateWorkflowParams, SharedWorkflowRole, WorkflowPatch,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::biz::workflow::finder::WorkflowFinder;

const WORKFLOW_ID_LEN: usize = 16;

/// The generic save path of a live workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowUpdater: Send + Sync {
  /// Applies `patch` to the workflow. Unless `force_save` is set, a patch that
  /// names a `version_id` other than the stored one is rejected as stale.
  async fn update(
    &self,
    user: &AFUser,
    patch: WorkflowPatch,
    workflow_id: &str,
    force_save: bool,
  ) -> Result<AFWorkflow, AppError>;
}

pub struct WorkflowService {
  pg_pool: PgPool,
  finder: Arc<dyn WorkflowFinder>,
}

impl WorkflowService {
  pub fn new(pg_pool: PgPool, finder: Arc<dyn WorkflowFinder>) -> Self {
    Self { pg_pool, finder }
  }

  /// Creates the workflow inside the user's personal project.
  #[instrument(skip_all, fields(user = %user.uuid), err)]
  pub async fn create(
    &self,
    user: &AFUser,
    params: CreateWorkflowParams,
  ) -> Result<AFWorkflow, AppError> {
    params.validate()?;
    let workflow_id = gen_workflow_id();
    let version_id = Uuid::new_v4().to_string();

    let mut txn = self.pg_pool.begin().await?;
    let workflow = insert_workflow(
      &mut *txn,
      &workflow_id,
      params.name.trim(),
      &version_id,
      &params.nodes,
      &params.connections,
    )
    .await?;
    let project_id = get_or_create_personal_project(&mut txn, &user.uuid, &user.authors()).await?;
    insert_shared_workflow(
      &mut *txn,
      &workflow.id,
      &project_id,
      SharedWorkflowRole::Owner,
    )
    .await?;
    txn.commit().await?;

    info!("user {} created workflow {}", user.uuid, workflow.id);
    Ok(workflow)
  }

  pub async fn get(&self, user: &AFUser, workflow_id: &str) -> Result<AFWorkflow, AppError> {
    self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Read])
      .await?
      .ok_or_else(|| AppError::RecordNotFound(format!("workflow {} not found", workflow_id)))
  }
}

#[async_trait]
impl WorkflowUpdater for WorkflowService {
  #[instrument(skip(self, user, patch), fields(user = %user.uuid), err)]
  async fn update(
    &self,
    user: &AFUser,
    patch: WorkflowPatch,
    workflow_id: &str,
    force_save: bool,
  ) -> Result<AFWorkflow, AppError> {
    let current = match self
      .finder
      .find_workflow_for_user(workflow_id, user, &[WorkflowScope::Update])
      .await?
    {
      Some(workflow) => workflow,
      None => {
        return match select_workflow(&self.pg_pool, workflow_id).await? {
          None => Err(AppError::RecordNotFound(format!(
            "workflow {} not found",
            workflow_id
          ))),
          Some(_) => Err(AppError::NotEnoughPermissions {
            user: user.uuid.to_string(),
            action: format!("{} on workflow {}", WorkflowScope::Update, workflow_id),
          }),
        };
      },
    };

    check_version(&current, &patch, force_save)?;
    let expected_version_id = if force_save {
      None
    } else {
      patch.version_id.as_deref()
    };
    let version_id = next_version_id(&current, &patch);
    let updated = update_workflow(
      &self.pg_pool,
      workflow_id,
      patch.name.as_deref().map(str::trim),
      patch.active,
      patch.nodes.as_deref(),
      patch.connections.as_ref(),
      &version_id,
      expected_version_id,
    )
    .await?;

    match updated {
      Some(workflow) => Ok(workflow),
      // Another save landed between the version check and the write.
      None => match select_workflow(&self.pg_pool, workflow_id).await? {
        Some(latest) => Err(stale_version_error(
          workflow_id,
          &latest.version_id,
          expected_version_id.unwrap_or_default(),
        )),
        None => Err(AppError::RecordNotFound(format!(
          "workflow {} not found",
          workflow_id
        ))),
      },
    }
  }
}

fn gen_workflow_id() -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(WORKFLOW_ID_LEN)
    .map(char::from)
    .collect()
}

/// Rejects a patch that was made against an older version of the workflow.
fn check_version(current: &AFWorkflow, patch: &WorkflowPatch, force_save: bool) -> Result<(), AppError> {
  if force_save {
    return Ok(());
  }
  match patch.version_id.as_deref() {
    Some(version_id) if version_id != current.version_id => Err(stale_version_error(
      &current.id,
      &current.version_id,
      version_id,
    )),
    _ => Ok(()),
  }
}

fn stale_version_error(workflow_id: &str, stored: &str, based_on: &str) -> AppError {
  AppError::StaleVersion(format!(
    "workflow {} is at version {}, the update was made against {}",
    workflow_id, stored, based_on
  ))
}

fn next_version_id(current: &AFWorkflow, patch: &WorkflowPatch) -> String {
  if patch.changes_version() {
    Uuid::new_v4().to_string()
  } else {
    current.version_id.clone()
  }
}
