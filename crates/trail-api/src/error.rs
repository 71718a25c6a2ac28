//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"error": true, "msg": "<display>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No bearer token, or one that failed to decode or verify.
  #[error("missing or malformed JWT")]
  Unauthenticated,

  /// A write request rejected by the mutation pipeline.
  #[error(transparent)]
  Core(#[from] trail_core::Error),

  #[error("{kind} with the given ID is not found")]
  NotFound { kind: &'static str },

  #[error("{collection} were not found")]
  Empty { collection: &'static str },

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    use trail_core::Error as Core;

    match self {
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::Core(Core::Unauthorized) => StatusCode::UNAUTHORIZED,
      ApiError::Core(Core::Malformed(_) | Core::Invalid(_)) => StatusCode::BAD_REQUEST,
      ApiError::Core(Core::NotFound { .. }) => StatusCode::NOT_FOUND,
      ApiError::Core(Core::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::NotFound { .. } | ApiError::Empty { .. } => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": true, "msg": self.to_string() }))).into_response()
  }
}
