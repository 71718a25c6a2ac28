//! Admission middleware: every request waits for a [`TokenBucket`] permit
//! before it is routed.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};

use crate::limiter::TokenBucket;

/// Hold the request until the bucket issues a permit, then pass it on.
pub async fn admit(
  State(bucket): State<Arc<TokenBucket>>,
  request: Request,
  next: Next,
) -> Response {
  bucket.acquire().await;
  next.run(request).await
}

/// `GET /v1/rate`: answers as soon as the request has been admitted.
pub async fn probe() -> &'static str { "rate limiting test" }
