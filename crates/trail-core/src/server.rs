//! Server records, tracked separately from books.

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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
  pub id:            Uuid,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    Option<DateTime<Utc>>,
  pub user_id:       Uuid,
  pub title:         String,
  pub author:        String,
  pub server_status: i32,
  pub server_attrs:  RatedAttrs,
}

impl Validate for Server {
  fn fields(&self) -> Vec<Field<'_>> {
    vec![
      Field::new("id", Value::Uuid(self.id), ID_RULES),
      Field::new("user_id", Value::Uuid(self.user_id), ID_RULES),
      Field::new("title", Value::Str(&self.title), TEXT_RULES),
      Field::new("author", Value::Str(&self.author), TEXT_RULES),
      Field::new("server_status", Value::Int(self.server_status.into()), STATUS_RULES),
      Field::new("server_attrs", self.server_attrs.nested(), ATTRS_RULES),
    ]
  }
}

impl Resource for Server {
  const KIND: &'static str = "server";
  const COLLECTION: &'static str = "servers";

  fn id(&self) -> Uuid { self.id }

  fn stamp_created(&mut self, id: Uuid, at: DateTime<Utc>) {
    self.id = id;
    self.created_at = at;
    self.updated_at = None;
    self.server_status = STATUS_ACTIVE;
  }

  fn stamp_updated(&mut self, at: DateTime<Utc>) { self.updated_at = Some(at); }
}
