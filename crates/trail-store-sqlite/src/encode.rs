//! Encoding and decoding between resource types and SQLite rows.
//!
//! Timestamps are stored as RFC 3339 strings with fixed nanosecond precision
//! (so they sort lexically). UUIDs are stored as hyphenated lowercase
//! strings. Attribute blobs are stored as compact JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use serde::{Serialize, de::DeserializeOwned};
use trail_core::{
  book::Book,
  info::Info,
  resource::Resource,
  server::Server,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn encode_json<T: Serialize>(value: &T) -> Result<Value> {
  Ok(Value::Text(serde_json::to_string(value)?))
}

// ─── Table mapping ───────────────────────────────────────────────────────────

/// Columns an update never rewrites.
pub const IMMUTABLE_COLUMNS: &[&str] = &["id", "created_at", "user_id"];

/// Maps a resource type onto one SQLite table.
pub trait Table: Resource {
  const TABLE: &'static str;
  /// Every column, `id` first, in the order [`Table::encode`] emits values.
  const COLUMNS: &'static [&'static str];

  fn encode(&self) -> Result<Vec<Value>>;

  fn decode(row: Row) -> Result<Self>;
}

/// Cursor over the values of one selected row, consumed column by column in
/// [`Table::COLUMNS`] order.
pub struct Row {
  table:   &'static str,
  columns: std::slice::Iter<'static, &'static str>,
  values:  std::vec::IntoIter<Value>,
}

impl Row {
  pub fn new<T: Table>(values: Vec<Value>) -> Self {
    Self { table: T::TABLE, columns: T::COLUMNS.iter(), values: values.into_iter() }
  }

  fn next(&mut self) -> Result<(&'static str, Value)> {
    let column = self.columns.next().copied().unwrap_or("?");
    let value = self.values.next().ok_or_else(|| Error::Column {
      table:  self.table,
      column,
      reason: "missing from row".into(),
    })?;
    Ok((column, value))
  }

  fn mismatch(&self, column: &'static str, expected: &str, got: &Value) -> Error {
    Error::Column {
      table:  self.table,
      column,
      reason: format!("expected {expected}, got {:?}", got.data_type()),
    }
  }

  fn text(&mut self) -> Result<String> {
    match self.next()? {
      (_, Value::Text(s)) => Ok(s),
      (column, other) => Err(self.mismatch(column, "text", &other)),
    }
  }

  fn uuid(&mut self) -> Result<Uuid> { Ok(Uuid::parse_str(&self.text()?)?) }

  fn dt(&mut self) -> Result<DateTime<Utc>> { decode_dt(&self.text()?) }

  fn opt_dt(&mut self) -> Result<Option<DateTime<Utc>>> {
    match self.next()? {
      (_, Value::Null) => Ok(None),
      (_, Value::Text(s)) => decode_dt(&s).map(Some),
      (column, other) => Err(self.mismatch(column, "text or null", &other)),
    }
  }

  fn status(&mut self) -> Result<i32> {
    match self.next()? {
      (column, Value::Integer(n)) => i32::try_from(n).map_err(|e| Error::Column {
        table: self.table,
        column,
        reason: e.to_string(),
      }),
      (column, other) => Err(self.mismatch(column, "integer", &other)),
    }
  }

  fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
    Ok(serde_json::from_str(&self.text()?)?)
  }
}

fn opt_dt_value(dt: Option<DateTime<Utc>>) -> Value {
  dt.map_or(Value::Null, |dt| Value::Text(encode_dt(dt)))
}

// ─── Books ───────────────────────────────────────────────────────────────────

impl Table for Book {
  const TABLE: &'static str = "books";
  const COLUMNS: &'static [&'static str] = &[
    "id", "created_at", "updated_at", "user_id", "title", "author", "book_status", "book_attrs",
  ];

  fn encode(&self) -> Result<Vec<Value>> {
    Ok(vec![
      Value::Text(encode_uuid(self.id)),
      Value::Text(encode_dt(self.created_at)),
      opt_dt_value(self.updated_at),
      Value::Text(encode_uuid(self.user_id)),
      Value::Text(self.title.clone()),
      Value::Text(self.author.clone()),
      Value::Integer(self.book_status.into()),
      encode_json(&self.book_attrs)?,
    ])
  }

  fn decode(mut row: Row) -> Result<Self> {
    Ok(Self {
      id:          row.uuid()?,
      created_at:  row.dt()?,
      updated_at:  row.opt_dt()?,
      user_id:     row.uuid()?,
      title:       row.text()?,
      author:      row.text()?,
      book_status: row.status()?,
      book_attrs:  row.json()?,
    })
  }
}

// ─── Servers ─────────────────────────────────────────────────────────────────

impl Table for Server {
  const TABLE: &'static str = "servers";
  const COLUMNS: &'static [&'static str] = &[
    "id", "created_at", "updated_at", "user_id", "title", "author", "server_status", "server_attrs",
  ];

  fn encode(&self) -> Result<Vec<Value>> {
    Ok(vec![
      Value::Text(encode_uuid(self.id)),
      Value::Text(encode_dt(self.created_at)),
      opt_dt_value(self.updated_at),
      Value::Text(encode_uuid(self.user_id)),
      Value::Text(self.title.clone()),
      Value::Text(self.author.clone()),
      Value::Integer(self.server_status.into()),
      encode_json(&self.server_attrs)?,
    ])
  }

  fn decode(mut row: Row) -> Result<Self> {
    Ok(Self {
      id:            row.uuid()?,
      created_at:    row.dt()?,
      updated_at:    row.opt_dt()?,
      user_id:       row.uuid()?,
      title:         row.text()?,
      author:        row.text()?,
      server_status: row.status()?,
      server_attrs:  row.json()?,
    })
  }
}

// ─── Info ────────────────────────────────────────────────────────────────────

impl Table for Info {
  const TABLE: &'static str = "info";
  const COLUMNS: &'static [&'static str] = &[
    "id", "created_at", "updated_at", "user_id", "name", "portfolio", "info_status", "info_attrs",
  ];

  fn encode(&self) -> Result<Vec<Value>> {
    Ok(vec![
      Value::Text(encode_uuid(self.id)),
      Value::Text(encode_dt(self.created_at)),
      opt_dt_value(self.updated_at),
      Value::Text(encode_uuid(self.user_id)),
      Value::Text(self.name.clone()),
      Value::Text(self.portfolio.clone()),
      Value::Integer(self.info_status.into()),
      encode_json(&self.info_attrs)?,
    ])
  }

  fn decode(mut row: Row) -> Result<Self> {
    Ok(Self {
      id:          row.uuid()?,
      created_at:  row.dt()?,
      updated_at:  row.opt_dt()?,
      user_id:     row.uuid()?,
      name:        row.text()?,
      portfolio:   row.text()?,
      info_status: row.status()?,
      info_attrs:  row.json()?,
    })
  }
}
