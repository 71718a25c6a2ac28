//! Book records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  resource::{
    ATTRS_RULES, ID_RULES, RatedAttrs, Resource, STATUS_ACTIVE, STATUS_RULES,
    TEXT_RULES,
  },
  validate::{Field, Validate, Value},
};

/// A book record. Missing fields decode to their zero value so that the
/// validator, not the decoder, reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
  pub id:          Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  Option<DateTime<Utc>>,
  pub user_id:     Uuid,
  pub title:       String,
  pub author:      String,
  pub book_status: i32,
  pub book_attrs:  RatedAttrs,
}

impl Validate for Book {
  fn fields(&self) -> Vec<Field<'_>> {
    vec![
      Field::new("id", Value::Uuid(self.id), ID_RULES),
      Field::new("user_id", Value::Uuid(self.user_id), ID_RULES),
      Field::new("title", Value::Str(&self.title), TEXT_RULES),
      Field::new("author", Value::Str(&self.author), TEXT_RULES),
      Field::new("book_status", Value::Int(self.book_status.into()), STATUS_RULES),
      Field::new("book_attrs", self.book_attrs.nested(), ATTRS_RULES),
    ]
  }
}

impl Resource for Book {
  const KIND: &'static str = "book";
  const COLLECTION: &'static str = "books";

  fn id(&self) -> Uuid { self.id }

  fn stamp_created(&mut self, id: Uuid, at: DateTime<Utc>) {
    self.id = id;
    self.created_at = at;
    self.updated_at = None;
    self.book_status = STATUS_ACTIVE;
  }

  fn stamp_updated(&mut self, at: DateTime<Utc>) { self.updated_at = Some(at); }
}
