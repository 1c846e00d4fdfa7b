use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use access_control::pg::WorkflowAccessControlImpl;
use access_control::workflow::WorkflowAccessControl;
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use anyhow::{Context, Error};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::api::metrics::metrics_scope;
use crate::api::workflow::workflow_scope;
use crate::biz::license::{ConfigLicenseState, LicenseState};
use crate::biz::workflow::controller::WorkflowVersionsCeController;
use crate::biz::workflow::finder::{PgWorkflowFinder, WorkflowFinder};
use crate::biz::workflow::history_store::PgWorkflowHistoryStore;
use crate::biz::workflow::ops::WorkflowService;
use crate::biz::workflow::version_ce::WorkflowVersionCeService;
use crate::config::config::{Config, DatabaseSetting};
use crate::middleware::metrics_mw::MetricsMiddleware;
use crate::middleware::request_id::RequestIdMiddleware;
use crate::state::{AppMetrics, AppState, UserCache};

pub struct Application {
  port: u16,
  server: Server,
}

impl Application {
  pub async fn build(config: Config, state: AppState) -> Result<Self, Error> {
    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address).with_context(|| format!("fail to bind {}", address))?;
    let port = listener.local_addr()?.port();
    info!("Server started at {}", listener.local_addr()?);
    let server = run_actix_server(listener, state)?;
    Ok(Self { port, server })
  }

  pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
    self.server.await
  }

  pub fn port(&self) -> u16 {
    self.port
  }
}

pub fn run_actix_server(listener: TcpListener, state: AppState) -> Result<Server, Error> {
  let jwt_secret = state.config.jwt_secret.clone();
  let server = HttpServer::new(move || {
    App::new()
      .wrap(MetricsMiddleware)
      .wrap(TracingLogger::default())
      .wrap(RequestIdMiddleware)
      .wrap(middleware::Compress::default())
      .app_data(Data::new(jwt_secret.clone()))
      .app_data(Data::new(state.clone()))
      .service(workflow_scope())
      .service(metrics_scope())
  })
  .listen(listener)?
  .run();
  Ok(server)
}

pub async fn init_state(config: &Config) -> Result<AppState, Error> {
  let pg_pool = get_connection_pool(&config.db_settings).await?;

  info!("Running database migrations...");
  sqlx::migrate!("./migrations")
    .run(&pg_pool)
    .await
    .context("fail to run migrations")?;

  Ok(build_state(pg_pool, config))
}

/// Wires the services on top of an already migrated pool.
pub fn build_state(pg_pool: PgPool, config: &Config) -> AppState {
  let metrics = AppMetrics::new();
  let user_cache = Arc::new(UserCache::new(pg_pool.clone()));
  let workflow_access_control: Arc<dyn WorkflowAccessControl> = Arc::new(
    WorkflowAccessControlImpl::new(pg_pool.clone(), metrics.access_control_metrics.clone()),
  );
  let finder: Arc<dyn WorkflowFinder> = Arc::new(PgWorkflowFinder::new(
    pg_pool.clone(),
    workflow_access_control.clone(),
  ));
  let workflow_service = Arc::new(WorkflowService::new(pg_pool.clone(), finder.clone()));
  let license: Arc<dyn LicenseState> = Arc::new(ConfigLicenseState::new(&config.license));
  if license.is_workflow_history_licensed() {
    info!("licensed workflow history is active, built-in versioning is disabled");
  }

  let versions = Arc::new(WorkflowVersionCeService::new(
    Arc::new(PgWorkflowHistoryStore::new(pg_pool.clone())),
    finder.clone(),
    workflow_service.clone(),
    metrics.history_metrics.clone(),
  ));
  let version_controller = Arc::new(WorkflowVersionsCeController::new(
    versions, license, finder,
  ));

  AppState {
    pg_pool,
    config: Arc::new(config.clone()),
    user_cache,
    workflow_access_control,
    workflow_service,
    version_controller,
    metrics,
  }
}

async fn get_connection_pool(setting: &DatabaseSetting) -> Result<PgPool, Error> {
  info!("Connecting to postgres database with setting: {}", setting);
  PgPoolOptions::new()
    .max_connections(setting.max_connections)
    .acquire_timeout(Duration::from_secs(10))
    .max_lifetime(Duration::from_secs(30 * 60))
    .idle_timeout(Duration::from_secs(30))
    .connect_with(setting.pg_connect_options())
    .await
    .map_err(|e| anyhow::anyhow!("Failed to connect to postgres database: {}", e))
}
