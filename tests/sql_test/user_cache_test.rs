use crate::sql_test::util::{setup_db, test_create_user};
use app_error::ErrorCode;
use database_entity::dto::GlobalRole;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;
use workflow_cloud::state::UserCache;

async fn rename(pool: &PgPool, uuid: &Uuid, first_name: &str) {
  sqlx::query("UPDATE af_user SET first_name = $2 WHERE uuid = $1")
    .bind(uuid)
    .bind(first_name)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn expired_user_is_read_again_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let uuid = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let cache = UserCache::with_ttl(pool.clone(), Duration::ZERO);

  assert_eq!(cache.get_user(&uuid).await.unwrap().authors(), "Test");
  rename(&pool, &uuid, "Renamed").await;
  assert_eq!(cache.get_user(&uuid).await.unwrap().authors(), "Renamed");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn fresh_user_is_served_from_memory_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let uuid = test_create_user(&pool, GlobalRole::Member).await.unwrap();
  let cache = UserCache::with_ttl(pool.clone(), Duration::from_secs(600));

  cache.get_user(&uuid).await.unwrap();
  rename(&pool, &uuid, "Renamed").await;
  assert_eq!(cache.get_user(&uuid).await.unwrap().authors(), "Test");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a postgres database"]
async fn expired_entries_are_dropped_test(pool: PgPool) {
  setup_db(&pool).await.unwrap();
  let cache = UserCache::with_ttl(pool.clone(), Duration::ZERO);
  for _ in 0..3 {
    let uuid = test_create_user(&pool, GlobalRole::Member).await.unwrap();
    cache.get_user(&uuid).await.unwrap();
  }
  assert_eq!(cache.len(), 1);

  let err = cache.get_user(&Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.code(), ErrorCode::UserUnAuthorized);
}
