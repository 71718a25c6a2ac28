//! Error types for `trail-core`.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Why a request was turned away by the core.
///
/// Each variant belongs to exactly one stage of the mutation pipeline, so the
/// transport layer can map it to a status code without further context.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized, check expiration time of your token")]
  Unauthorized,

  #[error("malformed payload: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("{0}")]
  Invalid(ValidationErrors),

  #[error("{kind} with this ID not found")]
  NotFound { kind: &'static str },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<ValidationErrors> for Error {
  fn from(e: ValidationErrors) -> Self { Self::Invalid(e) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
