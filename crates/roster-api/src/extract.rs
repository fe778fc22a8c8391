//! Request extractors: JSON payloads, path ids, and optional boolean query
//! flags.

use axum::{
  Json,
  extract::{FromRequest, Request},
};
use roster_core::validation::FieldErrors;
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::ApiError;

/// A JSON body whose decoding failures are reported as structural
/// validation errors (key `"$"`), like any other invalid payload.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    match Json::<T>::from_request(req, state).await {
      Ok(Json(value)) => Ok(Payload(value)),
      Err(rejection) => {
        Err(ApiError::Validation(FieldErrors::single("$", rejection.body_text())))
      }
    }
  }
}

/// An entity id taken from the path, kept as the caller sent it.
///
/// Extraction never rejects. A segment that is not a UUID reaches the
/// existence stage and is reported there as not found, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PathId(String);

impl PathId {
  pub fn parse(&self) -> Option<Uuid> { Uuid::parse_str(&self.0).ok() }

  /// The parsed id, or nil for a malformed segment. Operations only run once
  /// every declared reference exists, so they never observe the nil.
  pub fn id(&self) -> Uuid { self.parse().unwrap_or_default() }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for PathId {
  fn from(raw: &str) -> Self { Self(raw.to_owned()) }
}

/// Parse an optional `true`/`false` query flag (case-insensitive). Absent
/// means no filter.
pub fn parse_flag(name: &'static str, raw: Option<&str>) -> Result<Option<bool>, ApiError> {
  match raw.map(str::trim) {
    None => Ok(None),
    Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
    Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
    Some(_) => Err(ApiError::BadParameter(name)),
  }
}
