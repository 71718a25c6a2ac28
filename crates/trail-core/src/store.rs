//! The [`ResourceStore`] trait and the [`Queries`] facade.
//!
//! `ResourceStore<R>` is a narrow per-type interface: one instantiation per
//! resource type. Backends (e.g. `trail-store-sqlite`) implement it for each
//! type they persist; higher layers depend only on this abstraction.

use std::future::Future;

use uuid::Uuid;

use crate::{book::Book, info::Info, resource::Resource, server::Server};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Create/read/update/delete primitives for one resource type, keyed by id.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ResourceStore<R: Resource>: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one resource by id. Returns `None` if absent.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Fetch every stored resource of this type.
  fn list(&self) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + '_;

  /// Persist a new resource exactly as given; the caller has already stamped
  /// its id and creation time.
  fn create<'a>(
    &'a self,
    resource: &'a R,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Overwrite the mutable fields of the resource stored under `id` with
  /// those of `resource`. `id`, `created_at` and the owner are left untouched.
  ///
  /// Returns an error if no resource is stored under `id`.
  fn update<'a>(
    &'a self,
    id: Uuid,
    resource: &'a R,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the resource stored under `id`.
  ///
  /// Returns an error if no resource is stored under `id`.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Facade ──────────────────────────────────────────────────────────────────

/// Composes one store per resource type into a single value implementing
/// `ResourceStore` for all of them, by forwarding each call to the matching
/// member.
///
/// The members may be the same backend cloned three times, or different
/// backends entirely.
#[derive(Debug, Clone)]
pub struct Queries<B, S, I> {
  pub books:   B,
  pub servers: S,
  pub info:    I,
}

impl<B, S, I> Queries<B, S, I> {
  pub fn new(books: B, servers: S, info: I) -> Self { Self { books, servers, info } }
}

impl<B, S, I> ResourceStore<Book> for Queries<B, S, I>
where
  B: ResourceStore<Book>,
  S: Send + Sync,
  I: Send + Sync,
{
  type Error = B::Error;

  fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_ {
    self.books.get(id)
  }

  fn list(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_ {
    self.books.list()
  }

  fn create<'a>(
    &'a self,
    resource: &'a Book,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.books.create(resource)
  }

  fn update<'a>(
    &'a self,
    id: Uuid,
    resource: &'a Book,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.books.update(id, resource)
  }

  fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    self.books.delete(id)
  }
}

impl<B, S, I> ResourceStore<Server> for Queries<B, S, I>
where
  B: Send + Sync,
  S: ResourceStore<Server>,
  I: Send + Sync,
{
  type Error = S::Error;

  fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Server>, Self::Error>> + Send + '_ {
    self.servers.get(id)
  }

  fn list(&self) -> impl Future<Output = Result<Vec<Server>, Self::Error>> + Send + '_ {
    self.servers.list()
  }

  fn create<'a>(
    &'a self,
    resource: &'a Server,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.servers.create(resource)
  }

  fn update<'a>(
    &'a self,
    id: Uuid,
    resource: &'a Server,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.servers.update(id, resource)
  }

  fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    self.servers.delete(id)
  }
}

impl<B, S, I> ResourceStore<Info> for Queries<B, S, I>
where
  B: Send + Sync,
  S: Send + Sync,
  I: ResourceStore<Info>,
{
  type Error = I::Error;

  fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Info>, Self::Error>> + Send + '_ {
    self.info.get(id)
  }

  fn list(&self) -> impl Future<Output = Result<Vec<Info>, Self::Error>> + Send + '_ {
    self.info.list()
  }

  fn create<'a>(
    &'a self,
    resource: &'a Info,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.info.create(resource)
  }

  fn update<'a>(
    &'a self,
    id: Uuid,
    resource: &'a Info,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.info.update(id, resource)
  }

  fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_ {
    self.info.delete(id)
  }
}
