//! Error type for `trail-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column did not have the expected shape.
  #[error("column {column} of {table}: {reason}")]
  Column {
    table:  &'static str,
    column: &'static str,
    reason: String,
  },

  /// An update or delete matched no row, e.g. because a concurrent delete
  /// landed after the caller's existence check.
  #[error("no {table} row with id {id}")]
  RowMissing { table: &'static str, id: uuid::Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
