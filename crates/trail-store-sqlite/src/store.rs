//! [`SqliteStore`], the SQLite implementation of [`ResourceStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params_from_iter, types::Value};
use tracing::debug;
use trail_core::store::ResourceStore;
use uuid::Uuid;

use crate::{
  encode::{IMMUTABLE_COLUMNS, Row, Table, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Trail resource store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement that must touch exactly one row keyed by `id`.
  async fn execute_keyed<T: Table>(
    &self,
    sql: String,
    id: Uuid,
    params: Vec<Value>,
  ) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(params))?))
      .await?;

    if affected == 0 {
      return Err(Error::RowMissing { table: T::TABLE, id });
    }
    Ok(())
  }
}

fn column_list<T: Table>() -> String { T::COLUMNS.join(", ") }

fn read_values(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Vec<Value>> {
  (0..width).map(|i| row.get::<_, Value>(i)).collect()
}

// ─── ResourceStore impl ──────────────────────────────────────────────────────

impl<R: Table> ResourceStore<R> for SqliteStore {
  type Error = Error;

  async fn get(&self, id: Uuid) -> Result<Option<R>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", column_list::<R>(), R::TABLE);
    let width = R::COLUMNS.len();
    let id_str = encode_uuid(id);

    let values: Option<Vec<Value>> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| read_values(row, width))
            .optional()?,
        )
      })
      .await?;

    values.map(|v| R::decode(Row::new::<R>(v))).transpose()
  }

  async fn list(&self) -> Result<Vec<R>> {
    let sql = format!(
      "SELECT {} FROM {} ORDER BY created_at, id",
      column_list::<R>(),
      R::TABLE
    );
    let width = R::COLUMNS.len();

    let rows: Vec<Vec<Value>> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| read_values(row, width))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(|v| R::decode(Row::new::<R>(v))).collect()
  }

  async fn create(&self, resource: &R) -> Result<()> {
    let placeholders = (1..=R::COLUMNS.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      R::TABLE,
      column_list::<R>()
    );
    let values = resource.encode()?;

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, params_from_iter(values))?;
        Ok(())
      })
      .await?;

    debug!(table = R::TABLE, id = %resource.id(), "row inserted");
    Ok(())
  }

  async fn update(&self, id: Uuid, resource: &R) -> Result<()> {
    let mut assignments = Vec::new();
    let mut params = vec![Value::Text(encode_uuid(id))];
    for (column, value) in R::COLUMNS.iter().zip(resource.encode()?) {
      if IMMUTABLE_COLUMNS.contains(column) {
        continue;
      }
      params.push(value);
      assignments.push(format!("{column} = ?{}", params.len()));
    }
    let sql = format!("UPDATE {} SET {} WHERE id = ?1", R::TABLE, assignments.join(", "));

    self.execute_keyed::<R>(sql, id, params).await?;
    debug!(table = R::TABLE, %id, "row updated");
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
    let params = vec![Value::Text(encode_uuid(id))];

    self.execute_keyed::<R>(sql, id, params).await?;
    debug!(table = R::TABLE, %id, "row deleted");
    Ok(())
  }
}
