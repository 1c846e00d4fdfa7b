use database_entity::dto::{GlobalRole, ProjectRole};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A permission on a single workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowScope {
  #[serde(rename = "workflow:read")]
  Read,
  #[serde(rename = "workflow:update")]
  Update,
}

impl WorkflowScope {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkflowScope::Read => "workflow:read",
      WorkflowScope::Update => "workflow:update",
    }
  }
}

impl Display for WorkflowScope {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Defines behavior for roles that grant a set of workflow scopes.
pub trait Scopes {
  fn workflow_scopes(&self) -> &'static [WorkflowScope];
}

const ALL_SCOPES: &[WorkflowScope] = &[WorkflowScope::Read, WorkflowScope::Update];
const READ_ONLY: &[WorkflowScope] = &[WorkflowScope::Read];

impl Scopes for GlobalRole {
  /// Owners and admins hold every scope on every workflow. Members get their
  /// scopes from project relations only.
  fn workflow_scopes(&self) -> &'static [WorkflowScope] {
    match self {
      GlobalRole::Owner | GlobalRole::Admin => ALL_SCOPES,
      GlobalRole::Member => &[],
    }
  }
}

impl Scopes for ProjectRole {
  fn workflow_scopes(&self) -> &'static [WorkflowScope] {
    match self {
      ProjectRole::PersonalOwner | ProjectRole::Admin | ProjectRole::Editor => ALL_SCOPES,
      ProjectRole::Viewer => READ_ONLY,
    }
  }
}
