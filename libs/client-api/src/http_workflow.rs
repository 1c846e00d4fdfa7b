use crate::http::process_response_data;
use crate::Client;
use reqwest::Method;
use shared_entity::dto::workflow_dto::{AFWorkflow, CreateWorkflowParams, WorkflowPatch};
use shared_entity::response::AppResponseError;
use tracing::instrument;

impl Client {
  #[instrument(level = "info", skip_all, err)]
  pub async fn create_workflow(
    &self,
    params: &CreateWorkflowParams,
  ) -> Result<AFWorkflow, AppResponseError> {
    let url = self.api_url(&["workflows"])?;
    let resp = self
      .http_client_with_auth(Method::POST, url)
      .await?
      .json(params)
      .send()
      .await?;
    process_response_data::<AFWorkflow>(resp).await
  }

  pub async fn get_workflow(&self, workflow_id: &str) -> Result<AFWorkflow, AppResponseError> {
    let url = self.api_url(&["workflows", workflow_id])?;
    let resp = self
      .http_client_with_auth(Method::GET, url)
      .await?
      .send()
      .await?;
    process_response_data::<AFWorkflow>(resp).await
  }

  /// Saves the patch. Without `force_save` the server rejects the patch when its
  /// `version_id` is not the stored one.
  #[instrument(level = "info", skip(self, patch), err)]
  pub async fn update_workflow(
    &self,
    workflow_id: &str,
    patch: &WorkflowPatch,
    force_save: bool,
  ) -> Result<AFWorkflow, AppResponseError> {
    let mut url = self.api_url(&["workflows", workflow_id])?;
    if force_save {
      url.query_pairs_mut().append_pair("forceSave", "true");
    }
    let resp = self
      .http_client_with_auth(Method::PATCH, url)
      .await?
      .json(patch)
      .send()
      .await?;
    process_response_data::<AFWorkflow>(resp).await
  }
}
