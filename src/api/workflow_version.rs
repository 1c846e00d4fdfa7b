use access_control::act::WorkflowScope;
use actix_web::web::{Data, Json};
use actix_web::{web, Result};
use shared_entity::dto::workflow_version_dto::{
  AFWorkflowHistory, AFWorkflowHistoryMeta, ListWorkflowVersionsQuery, VersionActionResponse,
};
use shared_entity::response::{AppResponse, JsonAppResponse};
use tracing::instrument;

use crate::biz::authentication::jwt::UserUuid;
use crate::state::AppState;

/// Routes below `/api/workflows`.
pub fn workflow_version_config(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::resource("/{workflow_id}/versions")
        .route(web::get().to(list_workflow_versions_handler))
        .route(web::post().to(create_workflow_snapshot_handler)),
    )
    .service(
      web::resource("/{workflow_id}/versions/{version_id}")
        .route(web::get().to(get_workflow_version_handler)),
    )
    .service(
      web::resource("/{workflow_id}/versions/{version_id}/restore")
        .route(web::post().to(restore_workflow_version_handler)),
    );
}

async fn list_workflow_versions_handler(
  user_uuid: UserUuid,
  workflow_id: web::Path<String>,
  query: web::Query<ListWorkflowVersionsQuery>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<Vec<AFWorkflowHistoryMeta>>> {
  let user = state.user_cache.get_user(&user_uuid).await?;
  state
    .workflow_access_control
    .enforce_scope(&user.uuid, &workflow_id, WorkflowScope::Read)
    .await?;
  let versions = state
    .version_controller
    .list(&user, &workflow_id, &query)
    .await?;
  Ok(Json(AppResponse::Ok().with_data(versions)))
}

async fn get_workflow_version_handler(
  user_uuid: UserUuid,
  path: web::Path<(String, String)>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<Option<AFWorkflowHistory>>> {
  let (workflow_id, version_id) = path.into_inner();
  let user = state.user_cache.get_user(&user_uuid).await?;
  state
    .workflow_access_control
    .enforce_scope(&user.uuid, &workflow_id, WorkflowScope::Read)
    .await?;
  let version = state
    .version_controller
    .get(&user, &workflow_id, &version_id)
    .await?;
  Ok(Json(AppResponse::Ok().with_data(version)))
}

#[instrument(skip(user_uuid, state), err)]
async fn create_workflow_snapshot_handler(
  user_uuid: UserUuid,
  workflow_id: web::Path<String>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<VersionActionResponse>> {
  let user = state.user_cache.get_user(&user_uuid).await?;
  state
    .workflow_access_control
    .enforce_scope(&user.uuid, &workflow_id, WorkflowScope::Update)
    .await?;
  let resp = state
    .version_controller
    .snapshot(&user, &workflow_id)
    .await?;
  Ok(Json(AppResponse::Ok().with_data(resp)))
}

#[instrument(skip(user_uuid, state), err)]
async fn restore_workflow_version_handler(
  user_uuid: UserUuid,
  path: web::Path<(String, String)>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<VersionActionResponse>> {
  let (workflow_id, version_id) = path.into_inner();
  let user = state.user_cache.get_user(&user_uuid).await?;
  state
    .workflow_access_control
    .enforce_scope(&user.uuid, &workflow_id, WorkflowScope::Update)
    .await?;
  let resp = state
    .version_controller
    .restore(&user, &workflow_id, &version_id)
    .await?;
  Ok(Json(AppResponse::Ok().with_data(resp)))
}
