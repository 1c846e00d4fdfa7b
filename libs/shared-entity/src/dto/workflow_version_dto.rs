use serde::{Deserialize, Serialize};

pub use database_entity::dto::{AFWorkflowHistory, AFWorkflowHistoryMeta};

pub const DEFAULT_TAKE: u32 = 20;
pub const MAX_TAKE: u32 = 50;

/// Pagination of `GET /api/workflows/{workflow_id}/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWorkflowVersionsQuery {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub take: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skip: Option<u32>,
}

impl ListWorkflowVersionsQuery {
  pub fn new(take: Option<u32>, skip: Option<u32>) -> Self {
    Self { take, skip }
  }

  /// Page size, defaulting to [DEFAULT_TAKE] and capped at [MAX_TAKE].
  pub fn take(&self) -> u32 {
    self.take.unwrap_or(DEFAULT_TAKE).min(MAX_TAKE)
  }

  pub fn skip(&self) -> u32 {
    self.skip.unwrap_or(0)
  }
}

/// Result of the snapshot and restore endpoints.
///
/// `Skipped` is returned when licensed history owns versioning and nothing was done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionActionResponse {
  Skipped { skipped: bool },
  Completed { success: bool },
}

impl VersionActionResponse {
  pub fn skipped() -> Self {
    VersionActionResponse::Skipped { skipped: true }
  }

  pub fn completed(success: bool) -> Self {
    VersionActionResponse::Completed { success }
  }

  pub fn is_skipped(&self) -> bool {
    matches!(self, VersionActionResponse::Skipped { skipped: true })
  }

  pub fn is_success(&self) -> bool {
    matches!(self, VersionActionResponse::Completed { success: true })
  }
}
