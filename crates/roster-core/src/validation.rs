//! Structural payload validation.
//!
//! Payload shapes keep their required fields optional at the deserialisation
//! layer and check them here, so a single response can report every invalid
//! field at once.

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated field errors: property name to the messages raised against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// A map holding one message against one key.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.push(field, message);
    errors
  }

  pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

  /// `Ok(value)` if nothing was recorded, otherwise the errors.
  pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
    if self.is_empty() { Ok(value()) } else { Err(self) }
  }

  /// Record a "required" error if `value` is `None`; pass the value through.
  pub fn required<'a, T>(&mut self, field: &str, value: &'a Option<T>) -> Option<&'a T> {
    if value.is_none() {
      self.push(field, format!("The {field} field is required."));
    }
    value.as_ref()
  }

  /// Required string with length bounds (in characters). A blank string
  /// counts as missing.
  pub fn string(
    &mut self,
    field: &str,
    value: &Option<String>,
    min: usize,
    max: usize,
  ) {
    match value.as_deref().map(str::trim) {
      None | Some("") => self.push(field, format!("The {field} field is required.")),
      Some(s) => self.length(field, s, min, max),
    }
  }

  /// Length bounds only, for optional strings that are present.
  pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len > max || len < min {
      let message = if min > 0 {
        format!(
          "The field {field} must be a string with a minimum length of {min} and a maximum \
           length of {max}."
        )
      } else {
        format!("The field {field} must be a string with a maximum length of {max}.")
      };
      self.push(field, message);
    }
  }
}

/// A payload that can be checked against its declared shape and converted to
/// its validated form.
pub trait Validate {
  type Valid;

  fn validate(self) -> Result<Self::Valid, FieldErrors>;
}

/// Operations without a body validate trivially.
impl Validate for () {
  type Valid = ();

  fn validate(self) -> Result<(), FieldErrors> { Ok(()) }
}
