use crate::http::{process_response_data, process_response_optional_data};
use crate::Client;
use reqwest::Method;
use shared_entity::dto::workflow_version_dto::{
  AFWorkflowHistory, AFWorkflowHistoryMeta, ListWorkflowVersionsQuery, VersionActionResponse,
};
use shared_entity::response::AppResponseError;

impl Client {
  /// Lists saved versions of the workflow, newest first.
  pub async fn list_workflow_versions(
    &self,
    workflow_id: &str,
    take: Option<u32>,
    skip: Option<u32>,
  ) -> Result<Vec<AFWorkflowHistoryMeta>, AppResponseError> {
    let url = self.api_url(&["workflows", workflow_id, "versions"])?;
    let resp = self
      .http_client_with_auth(Method::GET, url)
      .await?
      .query(&ListWorkflowVersionsQuery::new(take, skip))
      .send()
      .await?;
    process_response_data::<Vec<AFWorkflowHistoryMeta>>(resp).await
  }

  pub async fn get_workflow_version(
    &self,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<Option<AFWorkflowHistory>, AppResponseError> {
    let url = self.api_url(&["workflows", workflow_id, "versions", version_id])?;
    let resp = self
      .http_client_with_auth(Method::GET, url)
      .await?
      .send()
      .await?;
    process_response_optional_data::<AFWorkflowHistory>(resp).await
  }

  pub async fn create_workflow_version_snapshot(
    &self,
    workflow_id: &str,
  ) -> Result<VersionActionResponse, AppResponseError> {
    let url = self.api_url(&["workflows", workflow_id, "versions"])?;
    let resp = self
      .http_client_with_auth(Method::POST, url)
      .await?
      .send()
      .await?;
    process_response_data::<VersionActionResponse>(resp).await
  }

  pub async fn restore_workflow_version(
    &self,
    workflow_id: &str,
    version_id: &str,
  ) -> Result<VersionActionResponse, AppResponseError> {
    let url = self.api_url(&["workflows", workflow_id, "versions", version_id, "restore"])?;
    let resp = self
      .http_client_with_auth(Method::POST, url)
      .await?
      .send()
      .await?;
    process_response_data::<VersionActionResponse>(resp).await
  }
}
