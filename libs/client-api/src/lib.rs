mod http;
mod http_workflow;
mod http_workflow_version;

pub use http::*;

pub mod entity {
  pub use shared_entity::dto::workflow_dto::*;
  pub use shared_entity::dto::workflow_version_dto::*;
}

pub mod error {
  pub use shared_entity::response::{AppResponseError, ErrorCode};
}
