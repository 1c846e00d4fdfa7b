use crate::sql_test::util::{setup_db, test_create_user, test_create_workflow, test_share_with_team};
use access_control::act::WorkflowScope;
use access_control::metrics::AccessControlMetrics;
use access_control::pg::WorkflowAccessControlImpl;
use access_control::workflow::WorkflowAccessControl;
use app_error::ErrorCode;
use database_entity::dto::{GlobalRole, ProjectRole};
use prometheus_client::registry::Registry;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

fn access_control(pool: &PgPool) -> WorkflowAccessControlImpl {
  let mut registry = Registry::default();
  WorkflowAccessControlImpl::new(pool.clone(), AccessControlMetrics::register(&mut registry))
}

fn all_scopes() -> HashSet<WorkflowScope> {
  HashSet::from([WorkflowScope::Read, WorkflowScope::Update])
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn owner_has_all_scopes_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let scopes = access_control(&pool)
    .get_scopes(&owner, &workflow.id)
    .await
    .unwrap();
  assert_eq!(scopes, all_scopes());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn global_admin_reads_any_workflow_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let admin = test_create_user(&pool, GlobalRole::Admin).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let scopes = access_control(&pool)
    .get_scopes(&admin, &workflow.id)
    .await
    .unwrap();
  assert_eq!(scopes, all_scopes());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn unrelated_member_has_no_scope_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let stranger = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  let ac = access_control(&pool);

  assert!(ac.get_scopes(&stranger, &workflow.id).await.unwrap().is_empty());
  let err = ac
    .enforce_scope(&stranger, &workflow.id, WorkflowScope::Read)
    .await
    .unwrap_err();
  assert_eq!(err.code(), ErrorCode::NotEnoughPermissions);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn team_viewer_reads_but_cannot_update_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let viewer = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  test_share_with_team(&pool, &workflow.id, &viewer, ProjectRole::Viewer)
    .await
    .unwrap();
  let ac = access_control(&pool);

  assert!(ac
    .has_scope(&viewer, &workflow.id, WorkflowScope::Read)
    .await
    .unwrap());
  assert!(!ac
    .has_scope(&viewer, &workflow.id, WorkflowScope::Update)
    .await
    .unwrap());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn team_editor_updates_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let editor = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();
  test_share_with_team(&pool, &workflow.id, &editor, ProjectRole::Editor)
    .await
    .unwrap();

  access_control(&pool)
    .enforce_scope(&editor, &workflow.id, WorkflowScope::Update)
    .await
    .unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn unknown_user_has_no_scope_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let owner = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let workflow = test_create_workflow(&pool, &owner).await.unwrap();

  let scopes = access_control(&pool)
    .get_scopes(&Uuid::new_v4(), &workflow.id)
    .await
    .unwrap();
  assert!(scopes.is_empty());
}
