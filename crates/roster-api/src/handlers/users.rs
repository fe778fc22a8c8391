//! Handlers for the caller's own identity and for user administration.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/me` | Any registered user |
//! | `POST` | `/users` | Body: [`ProvisionUserBody`]; superusers only |
//! | `POST` | `/users/{id}/block` | 204; superusers only. The account row is kept |

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  entity::EntityKind,
  person::User,
  roles::{Operation, Role},
  store::{Batch, Mutation, RecordStore},
  validation::{FieldErrors, Validate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{PathId, Payload},
  identity::{Caller, Credential},
  pipeline::{Coordinator, Plan, Staged},
};

/// `GET /me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
) -> Result<Json<Caller>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      (),
      |_| Plan::new(Operation::ViewSelf),
      |_, caller, _| async move { Ok(Staged::read(caller)) },
    )
    .await?;
  Ok(Json(outcome.value))
}

// ─── Provision ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionUserBody {
  pub person_id:        Option<Uuid>,
  pub external_subject: Option<String>,
  #[serde(default)]
  pub roles:            BTreeSet<Role>,
}

pub struct NewUser {
  pub person_id:        Uuid,
  pub external_subject: String,
  pub roles:            BTreeSet<Role>,
}

impl Validate for ProvisionUserBody {
  type Valid = NewUser;

  fn validate(self) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::new();
    let person_id = errors.required("PersonId", &self.person_id).copied();
    errors.string("ExternalSubject", &self.external_subject, 0, 200);
    errors.finish(|| NewUser {
      person_id:        person_id.unwrap_or_default(),
      external_subject: self.external_subject.unwrap_or_default().trim().to_owned(),
      roles:            self.roles,
    })
  }
}

/// `POST /users` — returns 201 + the new [`User`].
pub async fn provision<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Payload(body): Payload<ProvisionUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |user| Plan::new(Operation::ProvisionUser).reference(EntityKind::Person, user.person_id),
      |_, _, new| async move {
        let user = User {
          id:               Uuid::new_v4(),
          person_id:        new.person_id,
          external_subject: Some(new.external_subject),
          roles:            new.roles,
        };
        Ok(Staged::write(user.clone(), Batch::new().with(Mutation::InsertUser(user))))
      },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(outcome.value)))
}

// ─── Block ────────────────────────────────────────────────────────────────────

/// `POST /users/{id}/block` — clears the user's external subject.
pub async fn block<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path(user): Path<PathId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let user_id = user.id();
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      (),
      |_| Plan::new(Operation::BlockUser).reference_path(EntityKind::User, &user),
      |_, _, _| async move {
        Ok(Staged::write((), Batch::new().with(Mutation::ClearUserSubject { user_id })))
      },
    )
    .await?;
  tracing::info!(%user_id, committed = outcome.committed, "user blocked");
  Ok(StatusCode::NO_CONTENT)
}
