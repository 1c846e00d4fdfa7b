use tracing::info;
use workflow_cloud::application::{init_state, Application};
use workflow_cloud::config::config::get_configuration;
use workflow_cloud::telemetry::init_subscriber;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
  println!("workflow cloud with RUST_LOG={}", level);
  let filters = vec![
    format!("actix_web={}", level),
    format!("workflow_cloud={}", level),
    format!("access_control={}", level),
    format!("database={}", level),
    format!("sqlx={}", level),
  ];
  let conf =
    get_configuration().map_err(|e| anyhow::anyhow!("Failed to read configuration: {}", e))?;
  init_subscriber(&conf.app_env, filters)?;
  info!("environment: {}", conf.app_env.as_str());

  let state = init_state(&conf)
    .await
    .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;
  let application = Application::build(conf, state).await?;
  application.run_until_stopped().await?;

  Ok(())
}
