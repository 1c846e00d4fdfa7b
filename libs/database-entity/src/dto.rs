use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

/// A single node of a workflow graph.
///
/// Only the keys the server reasons about are typed. Everything else the editor
/// stores on a node (credentials, notes, disabled flag, ...) is kept in `extra`
/// so a snapshot round-trips the node verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub node_type: String,
  pub type_version: f64,
  pub position: [f64; 2],
  #[serde(default)]
  pub parameters: Value,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// One edge endpoint: the node it points at, the input type and the input index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConnection {
  pub node: String,
  #[serde(rename = "type")]
  pub connection_type: String,
  pub index: u32,
}

/// Output slots of one connection type. A slot is `null` when nothing is wired to it.
pub type NodeOutputs = Vec<Option<Vec<NodeConnection>>>;

/// Connections of one source node, keyed by connection type (`main`, `ai_tool`, ...).
pub type NodeConnections = BTreeMap<String, NodeOutputs>;

/// Connections of a workflow, keyed by the source node name.
pub type WorkflowConnections = BTreeMap<String, NodeConnections>;

/// The live workflow as stored in `af_workflow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AFWorkflow {
  pub id: String,
  pub name: String,
  pub active: bool,
  pub version_id: String,
  pub nodes: Vec<WorkflowNode>,
  pub connections: WorkflowConnections,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The part of a workflow a history entry is taken from. Both graph fields are
/// optional because partial update payloads carry only what changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
  pub version_id: String,
  pub nodes: Option<Vec<WorkflowNode>>,
  pub connections: Option<WorkflowConnections>,
}

impl From<&AFWorkflow> for WorkflowGraph {
  fn from(workflow: &AFWorkflow) -> Self {
    Self {
      version_id: workflow.version_id.clone(),
      nodes: Some(workflow.nodes.clone()),
      connections: Some(workflow.connections.clone()),
    }
  }
}

/// A full history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AFWorkflowHistory {
  pub workflow_id: String,
  pub version_id: String,
  pub authors: String,
  pub nodes: Vec<WorkflowNode>,
  pub connections: WorkflowConnections,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A history entry without its graph, used by the paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AFWorkflowHistoryMeta {
  pub workflow_id: String,
  pub version_id: String,
  pub authors: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertWorkflowHistoryParams {
  pub workflow_id: String,
  pub version_id: String,
  pub authors: String,
  pub nodes: Vec<WorkflowNode>,
  pub connections: WorkflowConnections,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowParams {
  #[validate(length(min = 1, max = 128))]
  pub name: String,
  #[serde(default)]
  pub nodes: Vec<WorkflowNode>,
  #[serde(default)]
  pub connections: WorkflowConnections,
}

/// Partial update of a live workflow. `version_id` is the version the editor
/// started from and is checked against the stored one unless the save is forced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub active: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nodes: Option<Vec<WorkflowNode>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub connections: Option<WorkflowConnections>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version_id: Option<String>,
}

impl WorkflowPatch {
  /// Whether applying the patch produces a new workflow version.
  pub fn changes_version(&self) -> bool {
    self.name.is_some() || self.nodes.is_some() || self.connections.is_some()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AFUser {
  pub uuid: Uuid,
  pub email: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: GlobalRole,
}

impl AFUser {
  /// The `authors` value recorded on history entries: the trimmed full name, or
  /// the email when the user has no name.
  pub fn authors(&self) -> String {
    let first = self.first_name.as_deref().unwrap_or_default().trim();
    let last = self.last_name.as_deref().unwrap_or_default().trim();
    let full_name = format!("{} {}", first, last);
    let full_name = full_name.trim();
    if full_name.is_empty() {
      self.email.clone()
    } else {
      full_name.to_string()
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalRole {
  #[serde(rename = "global:owner")]
  Owner,
  #[serde(rename = "global:admin")]
  Admin,
  #[serde(rename = "global:member")]
  Member,
}

impl GlobalRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      GlobalRole::Owner => "global:owner",
      GlobalRole::Admin => "global:admin",
      GlobalRole::Member => "global:member",
    }
  }
}

impl From<&str> for GlobalRole {
  fn from(value: &str) -> Self {
    match value {
      "global:owner" => GlobalRole::Owner,
      "global:admin" => GlobalRole::Admin,
      "global:member" => GlobalRole::Member,
      _ => {
        error!("Invalid global role: {}", value);
        GlobalRole::Member
      },
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectRole {
  #[serde(rename = "project:personalOwner")]
  PersonalOwner,
  #[serde(rename = "project:admin")]
  Admin,
  #[serde(rename = "project:editor")]
  Editor,
  #[serde(rename = "project:viewer")]
  Viewer,
}

impl ProjectRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      ProjectRole::PersonalOwner => "project:personalOwner",
      ProjectRole::Admin => "project:admin",
      ProjectRole::Editor => "project:editor",
      ProjectRole::Viewer => "project:viewer",
    }
  }
}

impl FromStr for ProjectRole {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "project:personalOwner" => Ok(ProjectRole::PersonalOwner),
      "project:admin" => Ok(ProjectRole::Admin),
      "project:editor" => Ok(ProjectRole::Editor),
      "project:viewer" => Ok(ProjectRole::Viewer),
      other => Err(format!("invalid project role: {}", other)),
    }
  }
}

impl Display for ProjectRole {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a workflow is attached to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharedWorkflowRole {
  #[serde(rename = "workflow:owner")]
  Owner,
  #[serde(rename = "workflow:editor")]
  Editor,
}

impl SharedWorkflowRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      SharedWorkflowRole::Owner => "workflow:owner",
      SharedWorkflowRole::Editor => "workflow:editor",
    }
  }
}
