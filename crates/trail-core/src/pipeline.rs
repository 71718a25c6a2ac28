//! The authorize → decode → check → validate → persist pipeline applied to
//! every write request.
//!
//! Each request walks the [`Stage`]s in order and stops at the first one that
//! fails, returning that stage's [`Error`]. Persistence is attempted at most
//! once, and only after every earlier stage has succeeded, so a failed request
//! never leaves a partial write behind.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  claims::Claims,
  resource::Resource,
  store::ResourceStore,
  validate::{validate, validate_partial},
};

/// The states a write request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Admitted,
  ClaimsChecked,
  PayloadDecoded,
  /// Update and delete only.
  ExistenceChecked,
  Validated,
  Persisted,
  Responded,
}

fn reached<R: Resource>(op: &'static str, stage: Stage) {
  debug!(kind = R::KIND, op, ?stage, "pipeline stage reached");
}

/// Runs write requests against a store.
pub struct MutationPipeline<'s, S> {
  store: &'s S,
}

impl<'s, S> MutationPipeline<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Create a resource from `body`.
  ///
  /// The id, creation time and status supplied by the caller are discarded
  /// and replaced by a fresh v4 id, `now`, and the active status. Returns the
  /// record as persisted.
  pub async fn create<R>(&self, claims: &Claims, now: DateTime<Utc>, body: &[u8]) -> Result<R>
  where
    R: Resource,
    S: ResourceStore<R>,
  {
    reached::<R>("create", Stage::Admitted);

    claims.check(now)?;
    reached::<R>("create", Stage::ClaimsChecked);

    let mut resource: R = serde_json::from_slice(body)?;
    reached::<R>("create", Stage::PayloadDecoded);

    resource.stamp_created(Uuid::new_v4(), now);
    validate(&resource)?;
    reached::<R>("create", Stage::Validated);

    self.store.create(&resource).await.map_err(Error::store)?;
    reached::<R>("create", Stage::Persisted);

    reached::<R>("create", Stage::Responded);
    Ok(resource)
  }

  /// Update the resource whose id is carried in `body`.
  ///
  /// The target must already exist. The write goes to the id of the record
  /// found by the existence check.
  pub async fn update<R>(&self, claims: &Claims, now: DateTime<Utc>, body: &[u8]) -> Result<()>
  where
    R: Resource,
    S: ResourceStore<R>,
  {
    reached::<R>("update", Stage::Admitted);

    claims.check(now)?;
    reached::<R>("update", Stage::ClaimsChecked);

    let mut resource: R = serde_json::from_slice(body)?;
    reached::<R>("update", Stage::PayloadDecoded);

    let found = self.existing::<R>(resource.id()).await?;
    reached::<R>("update", Stage::ExistenceChecked);

    resource.stamp_updated(now);
    validate(&resource)?;
    reached::<R>("update", Stage::Validated);

    self.store.update(found.id(), &resource).await.map_err(Error::store)?;
    reached::<R>("update", Stage::Persisted);

    reached::<R>("update", Stage::Responded);
    Ok(())
  }

  /// Delete the resource whose id is carried in `body`.
  ///
  /// Only the id is trusted input here, so it is validated on its own before
  /// the existence check; the rest of the payload is ignored.
  pub async fn delete<R>(&self, claims: &Claims, now: DateTime<Utc>, body: &[u8]) -> Result<()>
  where
    R: Resource,
    S: ResourceStore<R>,
  {
    reached::<R>("delete", Stage::Admitted);

    claims.check(now)?;
    reached::<R>("delete", Stage::ClaimsChecked);

    let resource: R = serde_json::from_slice(body)?;
    reached::<R>("delete", Stage::PayloadDecoded);

    validate_partial(&resource, &["id"])?;
    reached::<R>("delete", Stage::Validated);

    let found = self.existing::<R>(resource.id()).await?;
    reached::<R>("delete", Stage::ExistenceChecked);

    self.store.delete(found.id()).await.map_err(Error::store)?;
    reached::<R>("delete", Stage::Persisted);

    reached::<R>("delete", Stage::Responded);
    Ok(())
  }

  async fn existing<R>(&self, id: Uuid) -> Result<R>
  where
    R: Resource,
    S: ResourceStore<R>,
  {
    self
      .store
      .get(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound { kind: R::KIND })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
