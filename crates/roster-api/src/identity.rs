//! Identity resolution: bearer credential → subject claim → registered user.
//!
//! Token signature and expiry are verified upstream of this service; here the
//! JWT payload segment is only decoded to read the configured subject claim.

use std::{collections::BTreeSet, convert::Infallible};

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use roster_core::{
  roles::{self, Role},
  store::RecordStore,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, ErrorCode, Result},
};

/// Credential settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  /// Name of the JWT claim that carries the external subject.
  pub subject_claim: String,
}

impl Default for AuthConfig {
  fn default() -> Self { Self { subject_claim: "sub".to_string() } }
}

// ─── Credential ──────────────────────────────────────────────────────────────

/// The subject claim carried by a request's credential, if any.
///
/// Extraction never rejects: a missing or unreadable credential simply has no
/// subject, and the pipeline reports that at the identity stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
  subject: Option<String>,
}

impl Credential {
  pub fn with_subject(subject: impl Into<String>) -> Self {
    Self { subject: Some(subject.into()) }
  }

  /// Read the credential from an `Authorization: Bearer <jwt>` header.
  pub fn from_headers(headers: &HeaderMap, config: &AuthConfig) -> Self {
    let subject = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .and_then(|token| subject_from_token(token.trim(), &config.subject_claim));
    Self { subject }
  }

  /// The subject claim, or [`ApiError::NoSubjectInToken`].
  pub fn subject(&self) -> Result<&str> {
    self.subject.as_deref().ok_or(ApiError::NoSubjectInToken)
  }
}

/// Decode the payload segment of a compact JWT and read `claim` as a
/// non-empty string.
fn subject_from_token(token: &str, claim: &str) -> Option<String> {
  let payload = token.split('.').nth(1)?;
  let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
  let claims: serde_json::Map<String, Value> = serde_json::from_slice(&bytes).ok()?;
  match claims.get(claim) {
    Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
    _ => {
      tracing::debug!(claim, "token carries no usable subject claim");
      None
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for Credential
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Credential::from_headers(&parts.headers, &state.auth))
  }
}

// ─── Resolved identity ───────────────────────────────────────────────────────

/// The registered user behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
  pub user_id:   Uuid,
  pub person_id: Uuid,
  pub roles:     BTreeSet<Role>,
}

impl Caller {
  pub fn is_superuser(&self) -> bool { roles::is_superuser(&self.roles) }
}

/// Resolve `subject` to a registered, unblocked user.
///
/// Unknown subjects and blocked accounts both yield
/// [`ErrorCode::AzureUserNotRegistered`].
pub async fn resolve<S: RecordStore>(store: &S, subject: &str) -> Result<Caller> {
  let user = store
    .find_user_by_external_subject(subject)
    .await
    .map_err(ApiError::store)?
    .filter(|u| !u.is_blocked())
    .ok_or(ErrorCode::AzureUserNotRegistered)?;

  Ok(Caller { user_id: user.id, person_id: user.person_id, roles: user.roles })
}
