use crate::dto::{
  AFUser, AFWorkflow, AFWorkflowHistory, AFWorkflowHistoryMeta, GlobalRole, WorkflowConnections,
  WorkflowNode,
};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AFWorkflowRow {
  pub id: String,
  pub name: String,
  pub active: bool,
  pub version_id: String,
  pub nodes: Json<Vec<WorkflowNode>>,
  pub connections: Json<WorkflowConnections>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<AFWorkflowRow> for AFWorkflow {
  fn from(row: AFWorkflowRow) -> Self {
    Self {
      id: row.id,
      name: row.name,
      active: row.active,
      version_id: row.version_id,
      nodes: row.nodes.0,
      connections: row.connections.0,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct AFWorkflowHistoryRow {
  pub workflow_id: String,
  pub version_id: String,
  pub authors: String,
  pub nodes: Json<Vec<WorkflowNode>>,
  pub connections: Json<WorkflowConnections>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<AFWorkflowHistoryRow> for AFWorkflowHistory {
  fn from(row: AFWorkflowHistoryRow) -> Self {
    Self {
      workflow_id: row.workflow_id,
      version_id: row.version_id,
      authors: row.authors,
      nodes: row.nodes.0,
      connections: row.connections.0,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct AFWorkflowHistoryMetaRow {
  pub workflow_id: String,
  pub version_id: String,
  pub authors: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<AFWorkflowHistoryMetaRow> for AFWorkflowHistoryMeta {
  fn from(row: AFWorkflowHistoryMetaRow) -> Self {
    Self {
      workflow_id: row.workflow_id,
      version_id: row.version_id,
      authors: row.authors,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct AFUserRow {
  pub uuid: Uuid,
  pub email: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: String,
}

impl From<AFUserRow> for AFUser {
  fn from(row: AFUserRow) -> Self {
    Self {
      uuid: row.uuid,
      email: row.email,
      first_name: row.first_name,
      last_name: row.last_name,
      role: GlobalRole::from(row.role.as_str()),
    }
  }
}
