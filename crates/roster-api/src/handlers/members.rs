//! Handlers for `/organisations/{id}/members/{person_id}`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/organisations/{id}/members/{person_id}` | Body: `{"isAdmin":bool}`; adds or updates |
//! | `DELETE` | `/organisations/{id}/members/{person_id}` | 204; refuses to remove a person's last organisation |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  entity::EntityKind,
  organisation::OrganisationMembership,
  roles::Operation,
  scope::ScopeRequirement,
  store::{Batch, Mutation, RecordStore},
  validation::{FieldErrors, Validate},
};
use serde::Deserialize;

use crate::{
  AppState,
  error::ApiError,
  extract::{PathId, Payload},
  identity::Credential,
  pipeline::{Coordinator, Plan, Staged},
};

fn plan(operation: Operation, organisation: &PathId, person: &PathId) -> Plan {
  Plan::new(operation)
    .reference_path(EntityKind::Organisation, organisation)
    .reference_path(EntityKind::Person, person)
    .scope(ScopeRequirement::OrganisationAdmin(organisation.id()))
}

// ─── Put ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutMemberBody {
  pub is_admin: Option<bool>,
}

impl Validate for PutMemberBody {
  type Valid = bool;

  fn validate(self) -> Result<bool, FieldErrors> {
    let mut errors = FieldErrors::new();
    let is_admin = errors.required("IsAdmin", &self.is_admin).copied();
    errors.finish(|| is_admin.unwrap_or_default())
  }
}

/// `PUT /organisations/{id}/members/{person_id}`
pub async fn put<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path((organisation, person)): Path<(PathId, PathId)>,
  Payload(body): Payload<PutMemberBody>,
) -> Result<Json<OrganisationMembership>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let (organisation_id, person_id) = (organisation.id(), person.id());
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |_| plan(Operation::AddOrganisationMember, &organisation, &person),
      |_, _, is_admin| async move {
        let membership = OrganisationMembership { organisation_id, person_id, is_admin };
        Ok(Staged::write(
          membership,
          Batch::new().with(Mutation::PutOrganisationMembership(membership)),
        ))
      },
    )
    .await?;
  Ok(Json(outcome.value))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /organisations/{id}/members/{person_id}` — 204 on success.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path((organisation, person)): Path<(PathId, PathId)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let (organisation_id, person_id) = (organisation.id(), person.id());
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      (),
      |_| plan(Operation::RemoveOrganisationMember, &organisation, &person),
      |store, _, _| async move {
        store
          .get_organisation_membership(organisation_id, person_id)
          .await
          .map_err(ApiError::store)?
          .ok_or(ApiError::EntityRelationNotFound {
            child:     EntityKind::Person,
            child_id:  person_id,
            parent:    EntityKind::Organisation,
            parent_id: organisation_id,
          })?;
        let batch = Batch::new()
          .with(Mutation::RemoveOrganisationMembership { organisation_id, person_id });
        Ok(Staged::write((), batch))
      },
    )
    .await?;
  tracing::info!(%organisation_id, %person_id, committed = outcome.committed, "membership removed");
  Ok(StatusCode::NO_CONTENT)
}
