use actix_http::Payload;
use actix_web::{web::Data, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

/// Claims of the access tokens the server accepts. `sub` carries the user uuid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJWTClaims {
  pub sub: Option<String>,
  pub exp: Option<i64>,
  pub iat: Option<i64>,
  #[serde(default)]
  pub email: Option<String>,
}

impl WorkflowJWTClaims {
  pub fn verify(token: &str, secret: &[u8]) -> Result<Self, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);
    let claims = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?.claims;

    let ts_expiry = claims.exp.ok_or_else(|| {
      jsonwebtoken::errors::ErrorKind::MissingRequiredClaim("exp".to_owned())
    })?;
    if chrono::Utc::now().timestamp() > ts_expiry {
      return Err(jsonwebtoken::errors::ErrorKind::ExpiredSignature.into());
    }
    Ok(claims)
  }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserUuid(Uuid);

impl UserUuid {
  pub fn from_auth(auth: Authorization) -> Result<Self, actix_web::Error> {
    Ok(Self(auth.uuid()?))
  }
}

impl Deref for UserUuid {
  type Target = Uuid;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl FromRequest for UserUuid {
  type Error = actix_web::Error;

  type Future = std::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    std::future::ready(get_auth_from_request(req).and_then(UserUuid::from_auth))
  }
}

#[derive(Debug)]
pub struct Authorization {
  pub token: String,
  pub claims: WorkflowJWTClaims,
}

impl Authorization {
  pub fn uuid(&self) -> Result<Uuid, actix_web::Error> {
    match self.claims.sub.as_deref() {
      None => Err(actix_web::error::ErrorUnauthorized(
        "Invalid Authorization header, missing sub(uuid)",
      )),
      Some(sub) => Uuid::from_str(sub).map_err(|_| {
        actix_web::error::ErrorUnauthorized(format!(
          "Invalid Authorization header, invalid sub: {}",
          sub
        ))
      }),
    }
  }
}

fn get_auth_from_request(req: &HttpRequest) -> Result<Authorization, actix_web::Error> {
  let jwt_secret = req
    .app_data::<Data<Secret<String>>>()
    .ok_or(actix_web::error::ErrorInternalServerError(
      "jwt secret not found",
    ))?;
  let bearer = req
    .headers()
    .get("Authorization")
    .ok_or(actix_web::error::ErrorUnauthorized(
      "No Authorization header",
    ))?;

  let bearer_str = bearer
    .to_str()
    .map_err(actix_web::error::ErrorUnauthorized)?;

  let (_, token) = bearer_str
    .split_once("Bearer ")
    .ok_or(actix_web::error::ErrorUnauthorized(
      "Invalid Authorization header, missing Bearer",
    ))?;

  authorization_from_token(token, jwt_secret)
}

#[instrument(level = "trace", skip_all, err)]
pub fn authorization_from_token(
  token: &str,
  jwt_secret: &Secret<String>,
) -> Result<Authorization, actix_web::Error> {
  let claims =
    WorkflowJWTClaims::verify(token, jwt_secret.expose_secret().as_bytes()).map_err(|err| {
      actix_web::error::ErrorUnauthorized(format!("fail to decode token, error:{}", err))
    })?;
  Ok(Authorization {
    token: token.to_string(),
    claims,
  })
}
