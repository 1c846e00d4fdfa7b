use app_error::AppError;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder};
use shared_entity::response::{AppResponse, AppResponseError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace};
use url::Url;

/// HTTP client of the workflow API.
///
/// The bearer token is shared between clones, so setting it once on any clone
/// authenticates all of them.
#[derive(Clone)]
pub struct Client {
  pub cloud_client: reqwest::Client,
  pub base_url: String,
  pub(crate) token: Arc<RwLock<Option<String>>>,
}

impl Client {
  pub fn new(base_url: &str) -> Self {
    Self {
      cloud_client: reqwest::Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
      token: Arc::new(RwLock::new(None)),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn set_token(&self, access_token: &str) {
    *self.token.write() = Some(access_token.to_string());
  }

  pub fn access_token(&self) -> Result<String, AppResponseError> {
    match self.token.try_read_for(Duration::from_secs(2)) {
      None => Err(AppError::Unhandled("Failed to read token".to_string()).into()),
      Some(token) => token.as_ref().cloned().ok_or_else(|| {
        AppError::NotLoggedIn("fail to get access token. Token is empty".to_string()).into()
      }),
    }
  }

  /// Builds `{base_url}/api/{segments..}`. Every segment is percent-encoded.
  pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, AppResponseError> {
    let mut url = Url::parse(&self.base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| AppError::InvalidRequest(format!("invalid base url: {}", self.base_url)))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  pub async fn http_client_with_auth(
    &self,
    method: Method,
    url: Url,
  ) -> Result<RequestBuilder, AppResponseError> {
    let access_token = self.access_token()?;
    trace!("start request: {}, method: {}", url, method);
    Ok(
      self
        .cloud_client
        .request(method, url)
        .bearer_auth(access_token),
    )
  }
}

pub async fn process_response_data<T>(resp: reqwest::Response) -> Result<T, AppResponseError>
where
  T: serde::de::DeserializeOwned + 'static,
{
  parse_response::<T>(resp).await?.into_data()
}

/// For endpoints that answer `null` when nothing matches.
pub async fn process_response_optional_data<T>(
  resp: reqwest::Response,
) -> Result<Option<T>, AppResponseError>
where
  T: serde::de::DeserializeOwned + 'static,
{
  parse_response::<T>(resp).await?.into_optional_data()
}

async fn parse_response<T>(resp: reqwest::Response) -> Result<AppResponse<T>, AppResponseError>
where
  T: serde::de::DeserializeOwned + 'static,
{
  let request_id = extract_request_id(&resp);
  AppResponse::<T>::from_response(resp).await.map_err(|err| {
    error!(
      "Error parsing response, request_id: {:?}, error: {}",
      request_id, err
    );
    AppResponseError::from(AppError::Internal(err))
  })
}

fn extract_request_id(resp: &reqwest::Response) -> Option<String> {
  resp
    .headers()
    .get("x-request-id")
    .map(|v| v.to_str().unwrap_or("invalid").to_string())
}
