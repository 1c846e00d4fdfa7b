use access_control::metrics::AccessControlMetrics;
use access_control::workflow::WorkflowAccessControl;
use app_error::AppError;
use dashmap::DashMap;
use database::user::select_user_by_uuid;
use database_entity::dto::AFUser;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::api::metrics::RequestMetrics;
use crate::biz::workflow::controller::WorkflowVersionsCeController;
use crate::biz::workflow::metrics::HistoryMetrics;
use crate::biz::workflow::ops::WorkflowService;
use crate::config::config::Config;

#[derive(Clone)]
pub struct AppState {
  pub pg_pool: PgPool,
  pub config: Arc<Config>,
  pub user_cache: Arc<UserCache>,
  pub workflow_access_control: Arc<dyn WorkflowAccessControl>,
  pub workflow_service: Arc<WorkflowService>,
  pub version_controller: Arc<WorkflowVersionsCeController>,
  pub metrics: AppMetrics,
}

/// How long a resolved user is served from memory before it is read again.
pub const USER_CACHE_TTL: Duration = Duration::from_secs(60);

struct CachedUser {
  user: AFUser,
  cached_at: Instant,
}

impl CachedUser {
  fn new(user: AFUser) -> Self {
    Self {
      user,
      cached_at: Instant::now(),
    }
  }

  fn is_fresh(&self, ttl: Duration) -> bool {
    self.cached_at.elapsed() < ttl
  }
}

/// Users resolved from access token subjects. Entries expire after the ttl, so
/// renames show up in history `authors` without a restart.
pub struct UserCache {
  pool: PgPool,
  ttl: Duration,
  users: DashMap<Uuid, CachedUser>,
}

impl UserCache {
  pub fn new(pool: PgPool) -> Self {
    Self::with_ttl(pool, USER_CACHE_TTL)
  }

  pub fn with_ttl(pool: PgPool, ttl: Duration) -> Self {
    Self {
      pool,
      ttl,
      users: DashMap::new(),
    }
  }

  /// Get the user from the cache or the database.
  pub async fn get_user(&self, uuid: &Uuid) -> Result<AFUser, AppError> {
    if let Some(entry) = self.users.get(uuid) {
      if entry.is_fresh(self.ttl) {
        return Ok(entry.user.clone());
      }
    }

    let user = select_user_by_uuid(&self.pool, uuid)
      .await?
      .ok_or_else(|| AppError::UserUnAuthorized(format!("unknown user {}", uuid)))?;
    self.users.retain(|_, cached| cached.is_fresh(self.ttl));
    self.users.insert(*uuid, CachedUser::new(user.clone()));
    Ok(user)
  }

  pub fn len(&self) -> usize {
    self.users.len()
  }

  pub fn is_empty(&self) -> bool {
    self.users.is_empty()
  }
}

#[derive(Clone)]
pub struct AppMetrics {
  pub registry: Arc<prometheus_client::registry::Registry>,
  pub request_metrics: Arc<RequestMetrics>,
  pub access_control_metrics: AccessControlMetrics,
  pub history_metrics: Arc<HistoryMetrics>,
}

impl Default for AppMetrics {
  fn default() -> Self {
    Self::new()
  }
}

impl AppMetrics {
  pub fn new() -> Self {
    let mut registry = prometheus_client::registry::Registry::default();
    let request_metrics = Arc::new(RequestMetrics::register(&mut registry));
    let access_control_metrics = AccessControlMetrics::register(&mut registry);
    let history_metrics = Arc::new(HistoryMetrics::register(&mut registry));
    Self {
      registry: Arc::new(registry),
      request_metrics,
      access_control_metrics,
      history_metrics,
    }
  }
}
