use crate::sql_test::util::{setup_db, test_create_user, test_create_workflow, test_node};
use database::workflow::select_workflow;
use database::workflow_history::{
  insert_workflow_history, select_workflow_history, select_workflow_history_meta_list,
};
use database_entity::dto::{GlobalRole, InsertWorkflowHistoryParams, WorkflowConnections};
use sqlx::PgPool;

fn history_params(workflow_id: &str, version_id: &str) -> InsertWorkflowHistoryParams {
  InsertWorkflowHistoryParams {
    workflow_id: workflow_id.to_string(),
    version_id: version_id.to_string(),
    authors: "Test User".to_string(),
    nodes: vec![test_node("Start"), test_node("Next")],
    connections: WorkflowConnections::new(),
  }
}

async fn backdate(pool: &PgPool, workflow_id: &str, version_id: &str, minutes: i32) {
  sqlx::query(
    r#"
    UPDATE af_workflow_history
    SET created_at = NOW() - make_interval(mins => $3)
    WHERE workflow_id = $1 AND version_id = $2
    "#,
  )
  .bind(workflow_id)
  .bind(version_id)
  .bind(minutes)
  .execute(pool)
  .await
  .unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn insert_and_select_history_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let params = history_params(&workflow.id, "v1");
  assert!(insert_workflow_history(&pool, &params).await.unwrap());

  let history = select_workflow_history(&pool, &workflow.id, "v1")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(history.authors, "Test User");
  assert_eq!(history.nodes, params.nodes);
  assert!(history.connections.is_empty());

  let missing = select_workflow_history(&pool, &workflow.id, "v2")
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn history_entry_is_never_overwritten_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let first = history_params(&workflow.id, "v1");
  assert!(insert_workflow_history(&pool, &first).await.unwrap());

  let mut second = history_params(&workflow.id, "v1");
  second.authors = "Someone Else".to_string();
  second.nodes = vec![];
  assert!(!insert_workflow_history(&pool, &second).await.unwrap());

  let stored = select_workflow_history(&pool, &workflow.id, "v1")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.authors, "Test User");
  assert_eq!(stored.nodes.len(), 2);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn meta_list_is_newest_first_and_paginated_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  for (i, version_id) in ["v1", "v2", "v3", "v4"].iter().enumerate() {
    insert_workflow_history(&pool, &history_params(&workflow.id, version_id))
      .await
      .unwrap();
    backdate(&pool, &workflow.id, version_id, 40 - (i as i32) * 10).await;
  }

  let all = select_workflow_history_meta_list(&pool, &workflow.id, 20, 0)
    .await
    .unwrap();
  let versions: Vec<_> = all.iter().map(|m| m.version_id.as_str()).collect();
  assert_eq!(versions, vec!["v4", "v3", "v2", "v1"]);

  let page = select_workflow_history_meta_list(&pool, &workflow.id, 2, 1)
    .await
    .unwrap();
  let versions: Vec<_> = page.iter().map(|m| m.version_id.as_str()).collect();
  assert_eq!(versions, vec!["v3", "v2"]);

  let past_end = select_workflow_history_meta_list(&pool, &workflow.id, 20, 10)
    .await
    .unwrap();
  assert!(past_end.is_empty());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn pages_are_stable_when_timestamps_tie_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let version_ids = ["v1", "v2", "v3", "v4", "v5"];
  for version_id in version_ids {
    insert_workflow_history(&pool, &history_params(&workflow.id, version_id))
      .await
      .unwrap();
  }
  sqlx::query("UPDATE af_workflow_history SET created_at = $2 WHERE workflow_id = $1")
    .bind(&workflow.id)
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .unwrap();

  let mut paged = vec![];
  for skip in (0..version_ids.len() as i64).step_by(2) {
    let page = select_workflow_history_meta_list(&pool, &workflow.id, 2, skip)
      .await
      .unwrap();
    paged.extend(page.into_iter().map(|meta| meta.version_id));
  }
  assert_eq!(paged, vec!["v5", "v4", "v3", "v2", "v1"]);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn history_is_scoped_to_workflow_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let first = test_create_workflow(&pool, &owner).await.unwrap();
  let second = test_create_workflow(&pool, &owner).await.unwrap();

  insert_workflow_history(&pool, &history_params(&first.id, "v1"))
    .await
    .unwrap();

  let list = select_workflow_history_meta_list(&pool, &second.id, 20, 0)
    .await
    .unwrap();
  assert!(list.is_empty());
  let entry = select_workflow_history(&pool, &second.id, "v1")
    .await
    .unwrap();
  assert!(entry.is_none());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn deleting_workflow_removes_history_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  insert_workflow_history(&pool, &history_params(&workflow.id, "v1"))
    .await
    .unwrap();

  sqlx::query("DELETE FROM af_workflow WHERE id = $1")
    .bind(&workflow.id)
    .execute(&pool)
    .await
    .unwrap();

  assert!(select_workflow(&pool, &workflow.id).await.unwrap().is_none());
  let list = select_workflow_history_meta_list(&pool, &workflow.id, 20, 0)
    .await
    .unwrap();
  assert!(list.is_empty());
}
