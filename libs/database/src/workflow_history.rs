use app_error::AppError;
use database_entity::dto::{AFWorkflowHistory, AFWorkflowHistoryMeta, InsertWorkflowHistoryParams};
use database_entity::pg_row::{AFWorkflowHistoryMetaRow, AFWorkflowHistoryRow};
use sqlx::types::Json;
use sqlx::{Executor, Postgres};
use tracing::trace;

/// Inserts a history entry into `af_workflow_history`.
///
/// History is append only: an entry for the same `(workflow_id, version_id)` is
/// never overwritten. Returns `false` when such an entry already existed.
pub async fn insert_workflow_history<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  params: &InsertWorkflowHistoryParams,
) -> Result<bool, AppError> {
  let affected_rows = sqlx::query(
    r#"
    INSERT INTO af_workflow_history (workflow_id, version_id, authors, nodes, connections)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (workflow_id, version_id) DO NOTHING
    "#,
  )
  .bind(&params.workflow_id)
  .bind(&params.version_id)
  .bind(&params.authors)
  .bind(Json(&params.nodes))
  .bind(Json(&params.connections))
  .execute(executor)
  .await?
  .rows_affected();

  trace!(
    "insert workflow history {}:{}, inserted: {}",
    params.workflow_id,
    params.version_id,
    affected_rows > 0
  );
  Ok(affected_rows > 0)
}

/// Retrieves one page of history entries of a workflow, newest first. Entries
/// saved at the same instant are ordered by `version_id`, so pages never overlap.
/// The graph columns are not selected.
pub async fn select_workflow_history_meta_list<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
  take: i64,
  skip: i64,
) -> Result<Vec<AFWorkflowHistoryMeta>, AppError> {
  let rows = sqlx::query_as::<_, AFWorkflowHistoryMetaRow>(
    r#"
    SELECT workflow_id, version_id, authors, created_at, updated_at
    FROM af_workflow_history
    WHERE workflow_id = $1
    ORDER BY created_at DESC, version_id DESC
    LIMIT $2 OFFSET $3
    "#,
  )
  .bind(workflow_id)
  .bind(take)
  .bind(skip)
  .fetch_all(executor)
  .await?;

  Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn select_workflow_history<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
  version_id: &str,
) -> Result<Option<AFWorkflowHistory>, AppError> {
  let row = sqlx::query_as::<_, AFWorkflowHistoryRow>(
    r#"
    SELECT workflow_id, version_id, authors, nodes, connections, created_at, updated_at
    FROM af_workflow_history
    WHERE workflow_id = $1 AND version_id = $2
    "#,
  )
  .bind(workflow_id)
  .bind(version_id)
  .fetch_optional(executor)
  .await?;

  Ok(row.map(Into::into))
}
