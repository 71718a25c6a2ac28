//! Declarative structural validation of incoming payloads.
//!
//! A payload type describes itself as a list of [`Field`]s, each carrying a
//! borrowed view of its value and the [`Rule`]s that apply to it. The
//! [`validate`] and [`validate_partial`] entry points walk that description
//! once and collect every violation, so a caller sees all offending fields
//! together rather than only the first.

use std::fmt;

use uuid::Uuid;

// ─── Rules ───────────────────────────────────────────────────────────────────

/// A single validation rule.
///
/// [`Display`](fmt::Display) renders the rule in tag form (`required`,
/// `lte=255`, ...), which is what error messages report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
  /// The value must not be its zero value.
  Required,
  /// Strings must parse as a 128-bit identifier.
  Uuid,
  /// String length (in chars) or integer value must be `<= N`.
  Lte(i64),
  /// The canonical string form must be exactly `N` chars long.
  Len(usize),
  /// Integer value (or string length) must be `>= N`.
  Min(i64),
  /// Integer value (or string length) must be `<= N`.
  Max(i64),
  /// Recurse into a nested structure and apply its own rules.
  Dive,
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Rule::Required => f.write_str("required"),
      Rule::Uuid => f.write_str("uuid"),
      Rule::Lte(n) => write!(f, "lte={n}"),
      Rule::Len(n) => write!(f, "len={n}"),
      Rule::Min(n) => write!(f, "min={n}"),
      Rule::Max(n) => write!(f, "max={n}"),
      Rule::Dive => f.write_str("dive"),
    }
  }
}

// ─── Field description ───────────────────────────────────────────────────────

/// Borrowed view of a field's value, as seen by the validator.
#[derive(Debug)]
pub enum Value<'a> {
  Uuid(Uuid),
  Str(&'a str),
  Int(i64),
  Nested(Vec<Field<'a>>),
}

/// One named field of a payload together with the rules declared for it.
#[derive(Debug)]
pub struct Field<'a> {
  /// The field's wire (JSON) name.
  pub name:  &'static str,
  pub value: Value<'a>,
  pub rules: &'static [Rule],
}

impl<'a> Field<'a> {
  pub fn new(name: &'static str, value: Value<'a>, rules: &'static [Rule]) -> Self {
    Self { name, value, rules }
  }
}

/// Implemented by every payload type that can be validated.
pub trait Validate {
  /// Describe the payload's fields, in declaration order.
  fn fields(&self) -> Vec<Field<'_>>;
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A single violated rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  /// Dotted path of the field, e.g. `book_attrs.rating`.
  pub field: String,
  pub rule:  Rule,
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "field '{}' failed on the '{}' rule", self.field, self.rule)
  }
}

/// Every violation found in one validation pass. Never empty when returned
/// as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn errors(&self) -> &[FieldError] { &self.0 }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Whether `field` (dotted path) is among the offending fields.
  pub fn contains(&self, field: &str) -> bool {
    self.0.iter().any(|e| e.field == field)
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, error) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate every declared field of `payload`.
pub fn validate<T: Validate + ?Sized>(payload: &T) -> Result<(), ValidationErrors> {
  finish(walk_all(payload.fields()))
}

/// Validate only the fields named in `only`.
///
/// Names are dotted paths: `"id"` selects the top-level `id` field (and, for
/// nested fields, everything beneath it), `"book_attrs.rating"` selects just
/// that nested field.
pub fn validate_partial<T: Validate + ?Sized>(
  payload: &T,
  only: &[&str],
) -> Result<(), ValidationErrors> {
  let mut errors = Vec::new();
  walk(payload.fields(), "", Some(only), &mut errors);
  finish(errors)
}

fn finish(errors: Vec<FieldError>) -> Result<(), ValidationErrors> {
  if errors.is_empty() {
    Ok(())
  } else {
    Err(ValidationErrors(errors))
  }
}

fn walk_all(fields: Vec<Field<'_>>) -> Vec<FieldError> {
  let mut errors = Vec::new();
  walk(fields, "", None, &mut errors);
  errors
}

/// What part of a field a partial selection covers.
enum Scope<'p> {
  Skip,
  Whole,
  Children(Vec<&'p str>),
}

fn scope<'p>(name: &str, only: &[&'p str]) -> Scope<'p> {
  if only.iter().any(|p| *p == name) {
    return Scope::Whole;
  }
  let children: Vec<&'p str> = only
    .iter()
    .copied()
    .filter_map(|p| p.strip_prefix(name).and_then(|rest| rest.strip_prefix('.')))
    .collect();
  if children.is_empty() {
    Scope::Skip
  } else {
    Scope::Children(children)
  }
}

fn walk(
  fields: Vec<Field<'_>>,
  prefix: &str,
  only: Option<&[&str]>,
  errors: &mut Vec<FieldError>,
) {
  for field in fields {
    let path = if prefix.is_empty() {
      field.name.to_owned()
    } else {
      format!("{prefix}.{}", field.name)
    };

    match only.map_or(Scope::Whole, |only| scope(field.name, only)) {
      Scope::Skip => {}
      Scope::Whole => check(field, path, errors),
      Scope::Children(sub) => {
        if let Value::Nested(children) = field.value {
          walk(children, &path, Some(sub.as_slice()), errors);
        }
      }
    }
  }
}

/// Apply a field's rules in order. The first failing rule is reported and the
/// remaining rules (including `dive`) are skipped for that field.
fn check(field: Field<'_>, path: String, errors: &mut Vec<FieldError>) {
  for rule in field.rules {
    if *rule == Rule::Dive {
      continue;
    }
    if !holds(*rule, &field.value) {
      errors.push(FieldError { field: path, rule: *rule });
      return;
    }
  }

  if field.rules.contains(&Rule::Dive)
    && let Value::Nested(children) = field.value
  {
    walk(children, &path, None, errors);
  }
}

fn holds(rule: Rule, value: &Value<'_>) -> bool {
  match (rule, value) {
    (Rule::Dive, _) => true,

    (Rule::Required, Value::Uuid(id)) => !id.is_nil(),
    (Rule::Required, Value::Str(s)) => !s.is_empty(),
    (Rule::Required, Value::Int(n)) => *n != 0,
    (Rule::Required, Value::Nested(_)) => true,

    (Rule::Uuid, Value::Uuid(_)) => true,
    (Rule::Uuid, Value::Str(s)) => Uuid::parse_str(s).is_ok(),

    (Rule::Lte(max), Value::Str(s)) => char_len(s) <= max,
    (Rule::Lte(max), Value::Int(n)) => *n <= max,

    (Rule::Len(len), Value::Str(s)) => s.chars().count() == len,
    (Rule::Len(len), Value::Int(n)) => n.to_string().len() == len,
    (Rule::Len(len), Value::Uuid(id)) => id.hyphenated().to_string().len() == len,

    (Rule::Min(min), Value::Int(n)) => *n >= min,
    (Rule::Min(min), Value::Str(s)) => char_len(s) >= min,
    (Rule::Max(max), Value::Int(n)) => *n <= max,
    (Rule::Max(max), Value::Str(s)) => char_len(s) <= max,

    // A rule declared on a value it cannot describe never holds.
    _ => false,
  }
}

fn char_len(s: &str) -> i64 { s.chars().count() as i64 }

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  struct Attrs {
    label:  String,
    rating: i64,
  }

  struct Payload {
    id:     Uuid,
    owner:  String,
    title:  String,
    status: i64,
    attrs:  Attrs,
  }

  impl Validate for Payload {
    fn fields(&self) -> Vec<Field<'_>> {
      vec![
        Field::new("id", Value::Uuid(self.id), &[Rule::Required, Rule::Uuid]),
        Field::new("owner", Value::Str(&self.owner), &[Rule::Required, Rule::Uuid]),
        Field::new("title", Value::Str(&self.title), &[Rule::Required, Rule::Lte(8)]),
        Field::new("status", Value::Int(self.status), &[Rule::Required, Rule::Len(1)]),
        Field::new(
          "attrs",
          Value::Nested(vec![
            Field::new("label", Value::Str(&self.attrs.label), &[]),
            Field::new("rating", Value::Int(self.attrs.rating), &[Rule::Min(1), Rule::Max(10)]),
          ]),
          &[Rule::Required, Rule::Dive],
        ),
      ]
    }
  }

  fn valid() -> Payload {
    Payload {
      id:     Uuid::new_v4(),
      owner:  Uuid::new_v4().to_string(),
      title:  "Dune".into(),
      status: 1,
      attrs:  Attrs { label: String::new(), rating: 7 },
    }
  }

  #[test]
  fn valid_payload_passes() {
    assert!(validate(&valid()).is_ok());
  }

  #[test]
  fn all_violations_are_collected() {
    let payload = Payload {
      id:     Uuid::nil(),
      owner:  "not-a-uuid".into(),
      title:  String::new(),
      status: 0,
      attrs:  Attrs { label: String::new(), rating: 11 },
    };
    let errors = validate(&payload).unwrap_err();
    assert_eq!(errors.len(), 5, "{errors}");
    assert_eq!(errors.errors()[0], FieldError { field: "id".into(), rule: Rule::Required });
    assert_eq!(errors.errors()[1], FieldError { field: "owner".into(), rule: Rule::Uuid });
    assert_eq!(errors.errors()[2], FieldError { field: "title".into(), rule: Rule::Required });
    assert_eq!(errors.errors()[3], FieldError { field: "status".into(), rule: Rule::Required });
    assert_eq!(
      errors.errors()[4],
      FieldError { field: "attrs.rating".into(), rule: Rule::Max(10) }
    );
  }

  #[test]
  fn one_entry_per_field() {
    // Empty title violates `required` only; `lte` is not reported as well.
    let mut payload = valid();
    payload.title = String::new();
    let errors = validate(&payload).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains("title"));
  }

  #[test]
  fn lte_counts_chars() {
    let mut payload = valid();
    payload.title = "ééééééé".into(); // 7 chars, 14 bytes
    assert!(validate(&payload).is_ok());
    payload.title = "123456789".into();
    let errors = validate(&payload).unwrap_err();
    assert_eq!(errors.errors()[0].rule, Rule::Lte(8));
  }

  #[test]
  fn len_pins_status_to_single_digit() {
    let mut payload = valid();
    payload.status = 9;
    assert!(validate(&payload).is_ok());
    payload.status = 10;
    let errors = validate(&payload).unwrap_err();
    assert_eq!(errors.errors()[0], FieldError { field: "status".into(), rule: Rule::Len(1) });
  }

  #[test]
  fn dive_checks_nested_minimum() {
    let mut payload = valid();
    payload.attrs.rating = 0;
    let errors = validate(&payload).unwrap_err();
    assert_eq!(
      errors.errors()[0],
      FieldError { field: "attrs.rating".into(), rule: Rule::Min(1) }
    );
  }

  #[test]
  fn partial_checks_only_named_fields() {
    let payload = Payload {
      id:     Uuid::new_v4(),
      owner:  String::new(),
      title:  String::new(),
      status: 0,
      attrs:  Attrs { label: String::new(), rating: 0 },
    };
    assert!(validate_partial(&payload, &["id"]).is_ok());
    assert!(validate(&payload).is_err());
  }

  #[test]
  fn partial_reports_named_field_failure() {
    let mut payload = valid();
    payload.id = Uuid::nil();
    let errors = validate_partial(&payload, &["id"]).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains("id"));
  }

  #[test]
  fn partial_selects_nested_path() {
    let mut payload = valid();
    payload.title = String::new();
    payload.attrs.rating = 42;
    let errors = validate_partial(&payload, &["attrs.rating"]).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains("attrs.rating"));
  }

  #[test]
  fn display_renders_tag_form() {
    let mut payload = valid();
    payload.title = "far too long".into();
    payload.status = 12;
    let errors = validate(&payload).unwrap_err();
    assert_eq!(
      errors.to_string(),
      "field 'title' failed on the 'lte=8' rule; field 'status' failed on the 'len=1' rule"
    );
  }
}
