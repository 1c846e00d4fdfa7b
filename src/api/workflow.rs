use access_control::act::WorkflowScope;
use actix_web::web::{Data, Json};
use actix_web::{web, Result, Scope};
use database_entity::dto::AFWorkflow;
use shared_entity::dto::workflow_dto::{CreateWorkflowParams, UpdateWorkflowQuery, WorkflowPatch};
use shared_entity::response::{AppResponse, JsonAppResponse};
use tracing::instrument;

use crate::api::workflow_version::workflow_version_config;
use crate::biz::authentication::jwt::UserUuid;
use crate::biz::workflow::ops::WorkflowUpdater;
use crate::state::AppState;

pub fn workflow_scope() -> Scope {
  web::scope("/api/workflows")
    .service(web::resource("").route(web::post().to(create_workflow_handler)))
    .service(
      web::resource("/{workflow_id}")
        .route(web::get().to(get_workflow_handler))
        .route(web::patch().to(update_workflow_handler)),
    )
    .configure(workflow_version_config)
}

#[instrument(skip_all, err)]
async fn create_workflow_handler(
  user_uuid: UserUuid,
  payload: Json<CreateWorkflowParams>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<AFWorkflow>> {
  let user = state.user_cache.get_user(&user_uuid).await?;
  let workflow = state
    .workflow_service
    .create(&user, payload.into_inner())
    .await?;
  state
    .version_controller
    .record_saved_workflow(&user, &workflow)
    .await;
  Ok(Json(AppResponse::Ok().with_data(workflow)))
}

async fn get_workflow_handler(
  user_uuid: UserUuid,
  workflow_id: web::Path<String>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<AFWorkflow>> {
  let user = state.user_cache.get_user(&user_uuid).await?;
  let workflow = state.workflow_service.get(&user, &workflow_id).await?;
  Ok(Json(AppResponse::Ok().with_data(workflow)))
}

#[instrument(skip(user_uuid, payload, state), err)]
async fn update_workflow_handler(
  user_uuid: UserUuid,
  workflow_id: web::Path<String>,
  query: web::Query<UpdateWorkflowQuery>,
  payload: Json<WorkflowPatch>,
  state: Data<AppState>,
) -> Result<JsonAppResponse<AFWorkflow>> {
  let workflow_id = workflow_id.into_inner();
  let user = state.user_cache.get_user(&user_uuid).await?;
  state
    .workflow_access_control
    .enforce_scope(&user.uuid, &workflow_id, WorkflowScope::Update)
    .await?;
  let workflow = state
    .workflow_service
    .update(&user, payload.into_inner(), &workflow_id, query.force_save())
    .await?;
  state
    .version_controller
    .record_saved_workflow(&user, &workflow)
    .await;
  Ok(Json(AppResponse::Ok().with_data(workflow)))
}
