//! Generic handlers shared by every resource type.
//!
//! | Method   | Path                 | Success |
//! |----------|----------------------|---------|
//! | `GET`    | `/<kind>/{id}`       | 200 `{error, msg, <kind>}` |
//! | `GET`    | `/<collection>`      | 200 `{error, msg, count, items}` |
//! | `POST`   | `/<kind>` (bearer)   | 200 `{error, msg, <kind>}` |
//! | `PUT`    | `/<kind>` (bearer)   | 201, empty body |
//! | `DELETE` | `/<kind>` (bearer)   | 204, empty body |

use std::collections::BTreeMap;

use axum::{
  Json, Router,
  extract::{Path, State},
  http::StatusCode,
  routing::{get, post},
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use trail_core::{pipeline::MutationPipeline, resource::Resource, store::ResourceStore};
use uuid::Uuid;

use crate::{AppState, auth::BearerClaims, error::ApiError};

// ─── Envelope ─────────────────────────────────────────────────────────────────

/// Success body: the error flag and message, plus the payload's own keys.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub error: bool,
  pub msg:   Option<String>,
  #[serde(flatten)]
  pub data:  T,
}

impl<T> Envelope<T> {
  fn ok(data: T) -> Json<Self> { Json(Self { error: false, msg: None, data }) }
}

/// One record under its kind name, e.g. `{"book": {...}}`.
pub type Single<R> = BTreeMap<&'static str, R>;

#[derive(Debug, Serialize)]
pub struct Page<R> {
  pub count: usize,
  pub items: Vec<R>,
}

fn single<R: Resource>(record: R) -> Json<Envelope<Single<R>>> {
  Envelope::ok(BTreeMap::from([(R::KIND, record)]))
}

// ─── Routes ───────────────────────────────────────────────────────────────────

/// The five routes of one resource type.
pub fn routes<R, S>() -> Router<AppState<S>>
where
  R: Resource,
  S: ResourceStore<R> + Clone + 'static,
{
  Router::new()
    .route(
      &format!("/{}", R::KIND),
      post(create::<R, S>).put(update::<R, S>).delete(delete::<R, S>),
    )
    .route(&format!("/{}/{{id}}", R::KIND), get(get_one::<R, S>))
    .route(&format!("/{}", R::COLLECTION), get(list::<R, S>))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /<kind>/{id}`
pub async fn get_one<R, S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<Single<R>>>, ApiError>
where
  R: Resource,
  S: ResourceStore<R>,
{
  let id = Uuid::parse_str(&id).map_err(|e| ApiError::BadRequest(format!("invalid id: {e}")))?;
  let record = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound { kind: R::KIND })?;
  Ok(single(record))
}

/// `GET /<collection>`
pub async fn list<R, S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Envelope<Page<R>>>, ApiError>
where
  R: Resource,
  S: ResourceStore<R>,
{
  let items = state.store.list().await.map_err(ApiError::store)?;
  if items.is_empty() {
    return Err(ApiError::Empty { collection: R::COLLECTION });
  }
  Ok(Envelope::ok(Page { count: items.len(), items }))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /<kind>`
pub async fn create<R, S>(
  State(state): State<AppState<S>>,
  BearerClaims(claims): BearerClaims,
  body: Bytes,
) -> Result<Json<Envelope<Single<R>>>, ApiError>
where
  R: Resource,
  S: ResourceStore<R>,
{
  let record = MutationPipeline::new(state.store.as_ref())
    .create::<R>(&claims, Utc::now(), &body)
    .await?;
  Ok(single(record))
}

/// `PUT /<kind>`. The target id travels in the body.
pub async fn update<R, S>(
  State(state): State<AppState<S>>,
  BearerClaims(claims): BearerClaims,
  body: Bytes,
) -> Result<StatusCode, ApiError>
where
  R: Resource,
  S: ResourceStore<R>,
{
  MutationPipeline::new(state.store.as_ref())
    .update::<R>(&claims, Utc::now(), &body)
    .await?;
  Ok(StatusCode::CREATED)
}

/// `DELETE /<kind>`. Only `id` is read from the body.
pub async fn delete<R, S>(
  State(state): State<AppState<S>>,
  BearerClaims(claims): BearerClaims,
  body: Bytes,
) -> Result<StatusCode, ApiError>
where
  R: Resource,
  S: ResourceStore<R>,
{
  MutationPipeline::new(state.store.as_ref())
    .delete::<R>(&claims, Utc::now(), &body)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
