use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt::{Debug, Display};

use app_error::AppError;
pub use app_error::ErrorCode;

#[cfg(feature = "cloud")]
pub use crate::response_actix::*;

/// The envelope of every JSON body the server returns: optional data, a numeric
/// error code (0 on success) and a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppResponse<T> {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,

  #[serde(deserialize_with = "default_error_code")]
  pub code: ErrorCode,

  #[serde(default)]
  pub message: Cow<'static, str>,
}

impl<T> AppResponse<T> {
  pub fn new<M: Into<Cow<'static, str>>>(code: ErrorCode, message: M) -> Self {
    Self {
      data: None,
      code,
      message: message.into(),
    }
  }

  #[allow(non_snake_case)]
  pub fn Ok() -> Self {
    Self::new(ErrorCode::Ok, AppError::Ok.to_string())
  }

  pub fn with_data(mut self, data: T) -> Self {
    self.data = Some(data);
    self
  }

  pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
    self.message = message.into();
    self
  }

  pub fn is_ok(&self) -> bool {
    matches!(self.code, ErrorCode::Ok)
  }

  /// Returns the payload, failing with `MissingPayload` when a successful
  /// response carries none.
  pub fn into_data(self) -> Result<T, AppResponseError> {
    match self.into_optional_data()? {
      Some(data) => Ok(data),
      None => Err(AppResponseError::from(AppError::MissingPayload(
        "response has no data".to_string(),
      ))),
    }
  }

  /// Like [AppResponse::into_data], for endpoints where `null` is a valid result.
  pub fn into_optional_data(self) -> Result<Option<T>, AppResponseError> {
    if self.is_ok() {
      Ok(self.data)
    } else {
      Err(AppResponseError::new(self.code, self.message))
    }
  }

  pub fn into_error(self) -> Result<(), AppResponseError> {
    self.into_optional_data().map(|_| ())
  }
}

impl<T, E> From<E> for AppResponse<T>
where
  E: Into<AppResponseError>,
{
  fn from(value: E) -> Self {
    let err: AppResponseError = value.into();
    AppResponse::new(err.code, err.message)
  }
}

impl<T> AppResponse<T>
where
  T: DeserializeOwned + 'static,
{
  pub async fn from_response(resp: reqwest::Response) -> Result<Self, anyhow::Error> {
    let status_code = resp.status();
    if !status_code.is_success() {
      let body = resp.text().await?;
      anyhow::bail!("got error code: {}, body: {}", status_code, body)
    }

    let bytes = resp.bytes().await?;
    let resp = serde_json::from_slice(&bytes)?;
    Ok(resp)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, thiserror::Error)]
pub struct AppResponseError {
  #[serde(deserialize_with = "default_error_code")]
  pub code: ErrorCode,
  pub message: Cow<'static, str>,
}

impl AppResponseError {
  pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  pub fn is_record_not_found(&self) -> bool {
    matches!(self.code, ErrorCode::RecordNotFound)
  }

  pub fn is_not_enough_permissions(&self) -> bool {
    matches!(self.code, ErrorCode::NotEnoughPermissions)
  }

  pub fn is_stale_version(&self) -> bool {
    matches!(self.code, ErrorCode::StaleVersion)
  }
}

impl<T> From<T> for AppResponseError
where
  AppError: From<T>,
{
  fn from(value: T) -> Self {
    let err = AppError::from(value);
    Self {
      code: err.code(),
      message: Cow::Owned(err.to_string()),
    }
  }
}

impl Display for AppResponseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_fmt(format_args!("code:{:?} msg: {}", self.code, self.message))
  }
}

/// Unknown codes, e.g. from a newer server, are read as `Internal`.
fn default_error_code<'a, D: Deserializer<'a>>(deserializer: D) -> Result<ErrorCode, D::Error> {
  match ErrorCode::deserialize(deserializer) {
    Ok(code) => Ok(code),
    Err(_) => Ok(ErrorCode::Internal),
  }
}
