use app_error::AppError;
use database_entity::dto::{GlobalRole, ProjectRole, SharedWorkflowRole};
use sqlx::{Executor, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

pub const PERSONAL_PROJECT_TYPE: &str = "personal";
pub const TEAM_PROJECT_TYPE: &str = "team";

pub async fn insert_project<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  name: &str,
  project_type: &str,
) -> Result<Uuid, AppError> {
  let project_id = sqlx::query_scalar::<_, Uuid>(
    r#"
    INSERT INTO af_project (project_id, name, project_type)
    VALUES ($1, $2, $3)
    RETURNING project_id
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(name)
  .bind(project_type)
  .fetch_one(executor)
  .await?;
  Ok(project_id)
}

pub async fn upsert_project_relation<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  project_id: &Uuid,
  user_uuid: &Uuid,
  role: ProjectRole,
) -> Result<(), AppError> {
  sqlx::query(
    r#"
    INSERT INTO af_project_relation (project_id, user_uuid, role)
    VALUES ($1, $2, $3)
    ON CONFLICT (project_id, user_uuid) DO UPDATE SET role = EXCLUDED.role
    "#,
  )
  .bind(project_id)
  .bind(user_uuid)
  .bind(role.as_str())
  .execute(executor)
  .await?;
  Ok(())
}

pub async fn select_personal_project_id<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  user_uuid: &Uuid,
) -> Result<Option<Uuid>, AppError> {
  let project_id = sqlx::query_scalar::<_, Uuid>(
    r#"
    SELECT p.project_id
    FROM af_project p
    JOIN af_project_relation pr ON pr.project_id = p.project_id
    WHERE pr.user_uuid = $1 AND pr.role = $2 AND p.project_type = $3
    LIMIT 1
    "#,
  )
  .bind(user_uuid)
  .bind(ProjectRole::PersonalOwner.as_str())
  .bind(PERSONAL_PROJECT_TYPE)
  .fetch_optional(executor)
  .await?;
  Ok(project_id)
}

/// Returns the personal project of the user, creating it on first use.
pub async fn get_or_create_personal_project(
  txn: &mut Transaction<'_, Postgres>,
  user_uuid: &Uuid,
  project_name: &str,
) -> Result<Uuid, AppError> {
  if let Some(project_id) = select_personal_project_id(&mut **txn, user_uuid).await? {
    return Ok(project_id);
  }
  let project_id = insert_project(&mut **txn, project_name, PERSONAL_PROJECT_TYPE).await?;
  upsert_project_relation(
    &mut **txn,
    &project_id,
    user_uuid,
    ProjectRole::PersonalOwner,
  )
  .await?;
  Ok(project_id)
}

pub async fn insert_shared_workflow<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  workflow_id: &str,
  project_id: &Uuid,
  role: SharedWorkflowRole,
) -> Result<(), AppError> {
  sqlx::query(
    r#"
    INSERT INTO af_shared_workflow (workflow_id, project_id, role)
    VALUES ($1, $2, $3)
    ON CONFLICT (workflow_id, project_id) DO NOTHING
    "#,
  )
  .bind(workflow_id)
  .bind(project_id)
  .bind(role.as_str())
  .execute(executor)
  .await?;
  Ok(())
}

/// Resolves the global role of the user together with the roles the user holds in
/// the projects the workflow is shared with. Returns `None` for an unknown user.
pub async fn select_workflow_roles<'a, E: Executor<'a, Database = Postgres>>(
  executor: E,
  user_uuid: &Uuid,
  workflow_id: &str,
) -> Result<Option<(GlobalRole, Vec<ProjectRole>)>, AppError> {
  let row = sqlx::query_as::<_, (String, Vec<String>)>(
    r#"
    SELECT u.role,
      ARRAY(
        SELECT pr.role
        FROM af_shared_workflow sw
        JOIN af_project_relation pr ON pr.project_id = sw.project_id
        WHERE sw.workflow_id = $2 AND pr.user_uuid = u.uuid
      ) AS project_roles
    FROM af_user u
    WHERE u.uuid = $1
    "#,
  )
  .bind(user_uuid)
  .bind(workflow_id)
  .fetch_optional(executor)
  .await?;

  Ok(row.map(|(global_role, project_roles)| {
    let project_roles = project_roles
      .into_iter()
      .filter_map(|role| match role.parse::<ProjectRole>() {
        Ok(role) => Some(role),
        Err(err) => {
          warn!("skip project relation: {}", err);
          None
        },
      })
      .collect();
    (GlobalRole::from(global_role.as_str()), project_roles)
  }))
}
