use app_error::AppError;
use async_trait::async_trait;
use database::workflow_history::{
  insert_workflow_history, select_workflow_history, select_workflow_history_meta_list,
};
use database_entity::dto::{AFWorkflowHistory, AFWorkflowHistoryMeta, InsertWorkflowHistoryParams};
use sqlx::PgPool;

/// Storage of workflow history entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowHistoryStore: Send + Sync {
  /// Returns `false` when an entry for the same version already existed.
  async fn insert(&self, params: &InsertWorkflowHistoryParams) -> Result<bool, AppError>;

  /// Newest first, without the graph.
  async fn list_meta(
    &self,
    workflow_id: &str,
    take: u32,
    skip: u32,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppError>;

  async fn find(
    &self,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppError>;
}

pub struct PgWorkflowHistoryStore {
  pg_pool: PgPool,
}

impl PgWorkflowHistoryStore {
  pub fn new(pg_pool: PgPool) -> Self {
    Self { pg_pool }
  }
}

#[async_trait]
impl WorkflowHistoryStore for PgWorkflowHistoryStore {
  async fn insert(&self, params: &InsertWorkflowHistoryParams) -> Result<bool, AppError> {
    insert_workflow_history(&self.pg_pool, params).await
  }

  async fn list_meta(
    &self,
    workflow_id: &str,
    take: u32,
    skip: u32,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppError> {
    select_workflow_history_meta_list(&self.pg_pool, workflow_id, take as i64, skip as i64).await
  }

  async fn find(
    &self,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppError> {
    select_workflow_history(&self.pg_pool, workflow_id, version_id).await
  }
}
