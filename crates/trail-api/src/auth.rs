//! Bearer-token extractor.
//!
//! Decodes `Authorization: Bearer <jwt>` into [`Claims`]. Only the signature
//! and the shape of the claims are checked here; expiry is left to
//! [`Claims::check`] inside the mutation pipeline.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tracing::debug;
use trail_core::claims::Claims;

use crate::{AppState, error::ApiError};

/// Key material and decoding rules for bearer tokens.
#[derive(Clone)]
pub struct AuthConfig {
  pub key:        DecodingKey,
  pub validation: Validation,
}

impl AuthConfig {
  /// HS256 tokens signed with the shared `secret`.
  pub fn hs256(secret: &[u8]) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["sub", "exp"]);
    Self { key: DecodingKey::from_secret(secret), validation }
  }
}

/// Claims of an authenticated request, signature verified, expiry unchecked.
#[derive(Debug)]
pub struct BearerClaims(pub Claims);

/// Decode the bearer token carried in `headers`.
pub fn decode_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<Claims, ApiError> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(ApiError::Unauthenticated)?;

  jsonwebtoken::decode::<Claims>(token.trim(), &config.key, &config.validation)
    .map(|data| data.claims)
    .map_err(|e| {
      debug!(error = %e, "bearer token rejected");
      ApiError::Unauthenticated
    })
}

impl<S> FromRequestParts<AppState<S>> for BearerClaims
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    decode_bearer(&parts.headers, &state.auth).map(BearerClaims)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;
  use chrono::Utc;
  use jsonwebtoken::{EncodingKey, Header};
  use serde_json::json;

  use super::*;

  const SECRET: &[u8] = b"correct horse battery staple";

  fn sign<T: serde::Serialize>(claims: &T, secret: &[u8]) -> String {
    jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  fn claims(expires: i64) -> Claims {
    Claims { subject: "alice".into(), issued_at: expires - 3600, expires }
  }

  #[test]
  fn valid_token_decodes() {
    let c = claims(Utc::now().timestamp() + 60);
    let got = decode_bearer(&headers(&format!("Bearer {}", sign(&c, SECRET))), &AuthConfig::hs256(SECRET));
    assert_eq!(got.unwrap(), c);
  }

  #[test]
  fn expired_token_still_decodes() {
    let c = claims(Utc::now().timestamp() - 3600);
    let got = decode_bearer(&headers(&format!("Bearer {}", sign(&c, SECRET))), &AuthConfig::hs256(SECRET));
    assert_eq!(got.unwrap(), c);
  }

  #[test]
  fn missing_header_is_rejected() {
    let got = decode_bearer(&HeaderMap::new(), &AuthConfig::hs256(SECRET));
    assert!(matches!(got, Err(ApiError::Unauthenticated)));
  }

  #[test]
  fn other_schemes_are_rejected() {
    let got = decode_bearer(&headers("Basic dXNlcjpwYXNz"), &AuthConfig::hs256(SECRET));
    assert!(matches!(got, Err(ApiError::Unauthenticated)));
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let c = claims(Utc::now().timestamp() + 60);
    let token = sign(&c, b"another secret");
    let got = decode_bearer(&headers(&format!("Bearer {token}")), &AuthConfig::hs256(SECRET));
    assert!(matches!(got, Err(ApiError::Unauthenticated)));
  }

  #[test]
  fn unexpected_claim_shape_is_rejected() {
    let exp = Utc::now().timestamp() + 60;
    for body in [
      json!({ "sub": "alice", "iat": 0, "exp": exp, "admin": true }),
      json!({ "sub": "alice", "exp": exp }),
      json!({ "sub": 7, "iat": 0, "exp": exp }),
    ] {
      let token = sign(&body, SECRET);
      let got = decode_bearer(&headers(&format!("Bearer {token}")), &AuthConfig::hs256(SECRET));
      assert!(matches!(got, Err(ApiError::Unauthenticated)), "{body}");
    }
  }
}
