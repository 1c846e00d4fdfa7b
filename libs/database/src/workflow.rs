use app_error::AppError;
use database_entity::dto::{AFWorkflow, WorkflowConnections, WorkflowNode};
use database_entity::pg_row::AFWorkflowRow;
use sqlx::types::Json;
use sqlx::{Executor, Postgres};

pub async fn insert_workflow<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
  name: &str,
  version_id: &str,
  nodes: &[WorkflowNode],
  connections: &WorkflowConnections,
) -> Result<AFWorkflow, AppError> {
  let row = sqlx::query_as::<_, AFWorkflowRow>(
    r#"
    INSERT INTO af_workflow (id, name, version_id, nodes, connections)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, name, active, version_id, nodes, connections, created_at, updated_at
    "#,
  )
  .bind(workflow_id)
  .bind(name)
  .bind(version_id)
  .bind(Json(nodes))
  .bind(Json(connections))
  .fetch_one(executor)
  .await?;
  Ok(row.into())
}

pub async fn select_workflow<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
) -> Result<Option<AFWorkflow>, AppError> {
  let row = sqlx::query_as::<_, AFWorkflowRow>(
    r#"
    SELECT id, name, active, version_id, nodes, connections, created_at, updated_at
    FROM af_workflow
    WHERE id = $1
    "#,
  )
  .bind(workflow_id)
  .fetch_optional(executor)
  .await?;
  Ok(row.map(Into::into))
}

/// Applies the given fields to the live workflow. `None` keeps the stored value.
///
/// With `expected_version_id` set, the row is only written while it is still at
/// that version. Returns `None` when no row was written, either because the
/// workflow does not exist or because it moved on to another version.
#[allow(clippy::too_many_arguments)]
pub async fn update_workflow<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
  name: Option<&str>,
  active: Option<bool>,
  nodes: Option<&[WorkflowNode]>,
  connections: Option<&WorkflowConnections>,
  version_id: &str,
  expected_version_id: Option<&str>,
) -> Result<Option<AFWorkflow>, AppError> {
  let row = sqlx::query_as::<_, AFWorkflowRow>(
    r#"
    UPDATE af_workflow
    SET name = COALESCE($2, name),
        active = COALESCE($3, active),
        nodes = COALESCE($4, nodes),
        connections = COALESCE($5, connections),
        version_id = $6,
        updated_at = NOW()
    WHERE id = $1 AND ($7::text IS NULL OR version_id = $7)
    RETURNING id, name, active, version_id, nodes, connections, created_at, updated_at
    "#,
  )
  .bind(workflow_id)
  .bind(name)
  .bind(active)
  .bind(nodes.map(Json))
  .bind(connections.map(Json))
  .bind(version_id)
  .bind(expected_version_id)
  .fetch_optional(executor)
  .await?;
  Ok(row.map(Into::into))
}
