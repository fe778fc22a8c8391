//! HTTP surface for Roster: the request authorization and validation pipeline
//! and the thin handlers that run behind it.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]. Token signature
//! checks and TLS are the deployment's responsibility.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod identity;
pub mod pipeline;
pub mod scope;

pub use error::{ApiError, ErrorCode};

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use roster_core::store::RecordStore;
use serde::Deserialize;

use handlers::{grades, members, organisations, schools, users};
use identity::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// JWT claim holding the external subject.
  #[serde(default = "default_subject_claim")]
  pub subject_claim: String,
}

fn default_subject_claim() -> String { AuthConfig::default().subject_claim }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RecordStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Identity & users
    .route("/me", get(users::me::<S>))
    .route("/users", post(users::provision::<S>))
    .route("/users/{id}/block", post(users::block::<S>))
    // Organisations
    .route("/organisations", post(organisations::create::<S>))
    .route("/organisations/{id}", get(organisations::get_one::<S>))
    .route("/organisations/{id}/members", get(organisations::list_members::<S>))
    .route("/organisations/{id}/people", post(organisations::create_person::<S>))
    .route(
      "/organisations/{id}/members/{person_id}",
      put(members::put::<S>).delete(members::remove::<S>),
    )
    // Schools
    .route("/schools", post(schools::create::<S>))
    .route("/schools/{id}/members/{person_id}", put(schools::put_member::<S>))
    // Grades
    .route("/arts/{art_id}/grades", post(grades::create::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
