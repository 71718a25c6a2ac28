//! The [`Resource`] contract shared by every stored entity type, plus the
//! pieces the concrete types have in common.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::validate::{Field, Rule, Validate, Value};

/// Status every resource is forced to on creation.
pub const STATUS_ACTIVE: i32 = 1;

pub(crate) const ID_RULES: &[Rule] = &[Rule::Required, Rule::Uuid];
pub(crate) const TEXT_RULES: &[Rule] = &[Rule::Required, Rule::Lte(255)];
pub(crate) const STATUS_RULES: &[Rule] = &[Rule::Required, Rule::Len(1)];
pub(crate) const ATTRS_RULES: &[Rule] = &[Rule::Required, Rule::Dive];
pub(crate) const RATING_RULES: &[Rule] = &[Rule::Min(1), Rule::Max(10)];

/// An entity addressed by a UUID that can flow through the mutation pipeline.
///
/// `id` is immutable once the resource has been created. `created_at` is
/// stamped once on creation; `updated_at` is stamped on every successful
/// update and never on creation.
pub trait Resource:
  Validate + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  /// Singular name, used in routes and messages (`"book"`).
  const KIND: &'static str;
  /// Collection name, used for the list route (`"books"`).
  const COLLECTION: &'static str;

  fn id(&self) -> Uuid;

  /// Overwrite the server-owned creation fields: identifier and creation
  /// time. Status is forced to [`STATUS_ACTIVE`] and `updated_at` cleared.
  fn stamp_created(&mut self, id: Uuid, at: DateTime<Utc>);

  fn stamp_updated(&mut self, at: DateTime<Utc>);
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Attribute blob carried by rated resources (books and servers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatedAttrs {
  pub picture:     String,
  pub description: String,
  /// 1 to 10.
  pub rating:      i32,
}

impl RatedAttrs {
  pub(crate) fn nested(&self) -> Value<'_> {
    Value::Nested(vec![
      Field::new("picture", Value::Str(&self.picture), &[]),
      Field::new("description", Value::Str(&self.description), &[]),
      Field::new("rating", Value::Int(self.rating.into()), RATING_RULES),
    ])
  }
}
