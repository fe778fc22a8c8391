//! Error taxonomy and its [`axum::response::IntoResponse`] mapping.
//!
//! Every failure the pipeline can produce is an [`ApiError`] variant, and
//! this module is the only place variants become a status code and body. The
//! status/body pairs are a wire contract and must not drift.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::{entity::EntityKind, store::StoreError, validation::FieldErrors};
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

/// Error-code tokens returned as the body of a 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum ErrorCode {
  AzureUserNotRegistered,
  InsufficientUserRole,
  NoOrganisationAccess,
  NotOrganisationAdmin,
  NotSchoolSecretary,
}

/// An error returned by the pipeline or a handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Structural payload validation failed. Rendered as 500 with the
  /// field → messages map.
  #[error("payload validation failed")]
  Validation(FieldErrors),

  /// `id` is the id as supplied, which may not be a well-formed UUID.
  #[error("{entity} ID '{id}' not found.")]
  EntityIdNotFound { entity: EntityKind, id: String },

  #[error("{child} '{child_id}' not found in {noun} '{parent_id}'", noun = .parent.noun())]
  EntityRelationNotFound {
    child:     EntityKind,
    child_id:  Uuid,
    parent:    EntityKind,
    parent_id: Uuid,
  },

  #[error("Auth token does not contain a valid user ID.")]
  NoSubjectInToken,

  #[error("{0}")]
  Forbidden(ErrorCode),

  /// A malformed optional query flag.
  #[error("The query parameter '{0}' must be either 'true' or 'false'.")]
  BadParameter(&'static str),

  /// The removal would leave a person without any organisation.
  #[error("{0}")]
  OrphanEntityConflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
  /// Map a backend error onto the taxonomy, keeping domain rejections raised
  /// inside a unit of work distinguishable from I/O failures.
  pub fn store<E: StoreError>(e: E) -> Self {
    let mapped = match e.as_core() {
      Some(roster_core::Error::OrphanPerson { .. }) => {
        Some(ApiError::OrphanEntityConflict(e.to_string()))
      }
      Some(roster_core::Error::MembershipNotFound { person_id, organisation_id }) => {
        Some(ApiError::EntityRelationNotFound {
          child:     EntityKind::Person,
          child_id:  *person_id,
          parent:    EntityKind::Organisation,
          parent_id: *organisation_id,
        })
      }
      _ => None,
    };
    mapped.unwrap_or_else(|| ApiError::Store(Box::new(e)))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::EntityIdNotFound { .. } | ApiError::EntityRelationNotFound { .. } => {
        StatusCode::NOT_FOUND
      }
      ApiError::NoSubjectInToken => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::BadParameter(_) => StatusCode::BAD_REQUEST,
      ApiError::OrphanEntityConflict(_) => StatusCode::CONFLICT,
    }
  }
}

/// Body of a backend failure. The underlying error is logged, never sent.
const STORE_FAILURE_BODY: &str = "An unexpected error occurred.";

impl From<ErrorCode> for ApiError {
  fn from(code: ErrorCode) -> Self { ApiError::Forbidden(code) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match self {
      ApiError::Validation(errors) => (status, Json(errors)).into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (status, STORE_FAILURE_BODY).into_response()
      }
      other => (status, other.to_string()).into_response(),
    }
  }
}
