use serde::{Deserialize, Serialize};

pub use database_entity::dto::{AFWorkflow, CreateWorkflowParams, WorkflowPatch};

/// Query of `PATCH /api/workflows/{workflow_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowQuery {
  #[serde(default)]
  pub force_save: Option<bool>,
}

impl UpdateWorkflowQuery {
  pub fn force_save(&self) -> bool {
    self.force_save.unwrap_or(false)
  }
}
