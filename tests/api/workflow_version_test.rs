use crate::api::util::{bearer, code_of, licensed_config, test_app, test_config};
use crate::sql_test::util::{
  setup_db, test_create_user, test_create_workflow, test_node, test_share_with_team,
};
use actix_web::test;
use database_entity::dto::{GlobalRole, ProjectRole};
use serde_json::{json, Value};
use sqlx::PgPool;

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn viewer_can_list_but_not_snapshot_or_restore_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let viewer = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  test_share_with_team(&pool, &workflow.id, &viewer, ProjectRole::Viewer)
    .await
    .unwrap();
  let app = test_app(&pool, test_config(vec![])).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/workflows/{}/versions", workflow.id))
    .insert_header(bearer(&viewer))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 1012);

  let req = test::TestRequest::post()
    .uri(&format!(
      "/api/workflows/{}/versions/{}/restore",
      workflow.id, workflow.version_id
    ))
    .insert_header(bearer(&viewer))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 1012);

  let req = test::TestRequest::get()
    .uri(&format!("/api/workflows/{}/versions", workflow.id))
    .insert_header(bearer(&viewer))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  assert_eq!(resp["data"], json!([]));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn stranger_is_denied_every_version_route_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let stranger = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  let app = test_app(&pool, test_config(vec![])).await;

  let requests = vec![
    test::TestRequest::get().uri(&format!("/api/workflows/{}/versions", workflow.id)),
    test::TestRequest::get().uri(&format!(
      "/api/workflows/{}/versions/{}",
      workflow.id, workflow.version_id
    )),
    test::TestRequest::post().uri(&format!("/api/workflows/{}/versions", workflow.id)),
  ];
  for req in requests {
    let req = req.insert_header(bearer(&stranger)).to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(code_of(&resp), 1012);
  }
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn unknown_version_is_null_data_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  let app = test_app(&pool, test_config(vec![])).await;

  let req = test::TestRequest::get()
    .uri(&format!("/api/workflows/{}/versions/missing", workflow.id))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  assert!(resp["data"].is_null());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn licensed_history_skips_builtin_versions_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  let app = test_app(&pool, licensed_config()).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/workflows/{}/versions", workflow.id))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  assert_eq!(resp["data"], json!({ "skipped": true }));

  let req = test::TestRequest::get()
    .uri(&format!("/api/workflows/{}/versions", workflow.id))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(resp["data"], json!([]));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn saves_and_restore_are_recorded_in_history_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let app = test_app(&pool, test_config(vec![])).await;

  let req = test::TestRequest::post()
    .uri("/api/workflows")
    .insert_header(bearer(&owner))
    .set_json(json!({ "name": "Route test", "nodes": [test_node("Start")] }))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  let workflow_id = resp["data"]["id"].as_str().unwrap().to_string();
  let first_version = resp["data"]["versionId"].as_str().unwrap().to_string();

  let req = test::TestRequest::patch()
    .uri(&format!("/api/workflows/{}", workflow_id))
    .insert_header(bearer(&owner))
    .set_json(json!({
      "nodes": [test_node("Start"), test_node("Next")],
      "versionId": first_version,
    }))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  let second_version = resp["data"]["versionId"].as_str().unwrap().to_string();
  assert_ne!(first_version, second_version);

  // Saving again from the first version is rejected.
  let req = test::TestRequest::patch()
    .uri(&format!("/api/workflows/{}", workflow_id))
    .insert_header(bearer(&owner))
    .set_json(json!({ "name": "Outdated", "versionId": first_version }))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 1030);

  let req = test::TestRequest::post()
    .uri(&format!(
      "/api/workflows/{}/versions/{}/restore",
      workflow_id, first_version
    ))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(code_of(&resp), 0);
  assert_eq!(resp["data"], json!({ "success": true }));

  let req = test::TestRequest::get()
    .uri(&format!("/api/workflows/{}", workflow_id))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  let restored_version = resp["data"]["versionId"].as_str().unwrap().to_string();
  assert_eq!(resp["data"]["nodes"].as_array().unwrap().len(), 1);

  let req = test::TestRequest::get()
    .uri(&format!("/api/workflows/{}/versions", workflow_id))
    .insert_header(bearer(&owner))
    .to_request();
  let resp: Value = test::call_and_read_body_json(&app, req).await;
  let versions: Vec<&str> = resp["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|meta| meta["versionId"].as_str().unwrap())
    .collect();
  assert_eq!(versions.len(), 3);
  assert!(versions.contains(&first_version.as_str()));
  assert!(versions.contains(&second_version.as_str()));
  assert!(versions.contains(&restored_version.as_str()));
}
