use app_error::AppError;
use database_entity::dto::{AFUser, GlobalRole};
use database_entity::pg_row::AFUserRow;
use sqlx::{Executor, Postgres};
use tracing::instrument;
use uuid::Uuid;

/// Inserts the user when no row with the same uuid exists yet.
/// Returns whether a row was inserted.
#[instrument(skip(executor), err)]
pub async fn create_user_if_not_exists<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  user_uuid: &Uuid,
  email: &str,
  first_name: Option<&str>,
  last_name: Option<&str>,
  role: GlobalRole,
) -> Result<bool, AppError> {
  let affected_rows = sqlx::query(
    r#"
    INSERT INTO af_user (uuid, email, first_name, last_name, role)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (uuid) DO NOTHING
    "#,
  )
  .bind(user_uuid)
  .bind(email)
  .bind(first_name)
  .bind(last_name)
  .bind(role.as_str())
  .execute(executor)
  .await?
  .rows_affected();
  Ok(affected_rows > 0)
}

pub async fn select_user_by_uuid<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  user_uuid: &Uuid,
) -> Result<Option<AFUser>, AppError> {
  let row = sqlx::query_as::<_, AFUserRow>(
    r#"
    SELECT uuid, email, first_name, last_name, role
    FROM af_user
    WHERE uuid = $1
    "#,
  )
  .bind(user_uuid)
  .fetch_optional(executor)
  .await?;
  Ok(row.map(Into::into))
}
