//! JSON REST API for Trail.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`ResourceStore`] for books, servers and info entries. Every route lives
//! under `/v1` and is admitted through a shared [`TokenBucket`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = trail_api::router(state, Arc::new(TokenBucket::new(rate)));
//! axum::serve(listener, app).await?;
//! ```

pub mod admission;
pub mod auth;
pub mod error;
pub mod limiter;
pub mod resources;

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;
use trail_core::{book::Book, info::Info, server::Server, store::ResourceStore};

pub use auth::AuthConfig;
pub use error::ApiError;
pub use limiter::TokenBucket;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

/// A store that can serve every resource type the API exposes.
pub trait Backend:
  ResourceStore<Book> + ResourceStore<Server> + ResourceStore<Info> + Clone + 'static
{
}

impl<T> Backend for T where
  T: ResourceStore<Book> + ResourceStore<Server> + ResourceStore<Info> + Clone + 'static
{
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router. Every request under `/v1` waits for a permit from
/// `bucket` before it is dispatched.
pub fn router<S: Backend>(state: AppState<S>, bucket: Arc<TokenBucket>) -> Router {
  let v1 = Router::new()
    .route("/rate", get(admission::probe))
    .merge(resources::routes::<Book, S>())
    .merge(resources::routes::<Server, S>())
    .merge(resources::routes::<Info, S>())
    .layer(from_fn_with_state(bucket, admission::admit));

  Router::new()
    .nest("/v1", v1)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
