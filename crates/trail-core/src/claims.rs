//! Decoded authorization claims and the expiry gate applied to them.
//!
//! Claims arrive already decoded (signature verification happens upstream in
//! the transport layer). This module only decides whether they are still
//! temporally valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The claims carried by a bearer token.
///
/// Any claim set with a different shape is rejected when the token is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
  /// Principal identifier.
  #[serde(rename = "sub")]
  pub subject:   String,
  /// Unix seconds.
  #[serde(rename = "iat")]
  pub issued_at: i64,
  /// Unix seconds.
  #[serde(rename = "exp")]
  pub expires:   i64,
}

impl Claims {
  /// Reject the claims if `now` lies past their expiry.
  ///
  /// Comparison is done on whole Unix seconds, the granularity the claims are
  /// issued with, so a token is still accepted during its expiry second.
  pub fn check(&self, now: DateTime<Utc>) -> Result<()> {
    if now.timestamp() > self.expires {
      return Err(Error::Unauthorized);
    }
    Ok(())
  }
}
