//! Info: a named profile entry pointing at a portfolio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  resource::{ATTRS_RULES, ID_RULES, Resource, STATUS_ACTIVE, STATUS_RULES, TEXT_RULES},
  validate::{Field, Validate, Value},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
  pub id:          Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  Option<DateTime<Utc>>,
  pub user_id:     Uuid,
  pub name:        String,
  pub portfolio:   String,
  pub info_status: i32,
  pub info_attrs:  InfoAttrs,
}

/// Unrated attribute blob for info entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoAttrs {
  pub picture:     String,
  pub description: String,
}

impl Validate for Info {
  fn fields(&self) -> Vec<Field<'_>> {
    vec![
      Field::new("id", Value::Uuid(self.id), ID_RULES),
      Field::new("user_id", Value::Uuid(self.user_id), ID_RULES),
      Field::new("name", Value::Str(&self.name), TEXT_RULES),
      Field::new("portfolio", Value::Str(&self.portfolio), TEXT_RULES),
      Field::new("info_status", Value::Int(self.info_status.into()), STATUS_RULES),
      Field::new(
        "info_attrs",
        Value::Nested(vec![
          Field::new("picture", Value::Str(&self.info_attrs.picture), &[]),
          Field::new("description", Value::Str(&self.info_attrs.description), &[]),
        ]),
        ATTRS_RULES,
      ),
    ]
  }
}

impl Resource for Info {
  const KIND: &'static str = "info";
  const COLLECTION: &'static str = "infos";

  fn id(&self) -> Uuid { self.id }

  fn stamp_created(&mut self, id: Uuid, at: DateTime<Utc>) {
    self.id = id;
    self.created_at = at;
    self.updated_at = None;
    self.info_status = STATUS_ACTIVE;
  }

  fn stamp_updated(&mut self, at: DateTime<Utc>) { self.updated_at = Some(at); }
}
