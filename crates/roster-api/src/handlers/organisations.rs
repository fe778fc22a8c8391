//! Handlers for `/organisations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/organisations` | Body: [`CreateOrganisationBody`]; root organisations need a superuser |
//! | `GET`  | `/organisations/{id}` | Public organisations are readable by any registered user |
//! | `GET`  | `/organisations/{id}/members` | Optional `?isAdmin=true\|false` |
//! | `POST` | `/organisations/{id}/people` | Body: [`CreatePersonBody`]; the person joins `{id}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use roster_core::{
  entity::EntityKind,
  organisation::{Organisation, OrganisationMembership},
  person::Person,
  roles::Operation,
  scope::ScopeRequirement,
  store::{Batch, Mutation, RecordStore},
  validation::{FieldErrors, Validate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{PathId, Payload, parse_flag},
  identity::Credential,
  pipeline::{Coordinator, Plan, Staged},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganisationBody {
  pub name:      Option<String>,
  pub parent_id: Option<Uuid>,
  #[serde(default)]
  pub is_public: bool,
}

pub struct NewOrganisation {
  pub name:      String,
  pub parent_id: Option<Uuid>,
  pub is_public: bool,
}

impl Validate for CreateOrganisationBody {
  type Valid = NewOrganisation;

  fn validate(self) -> Result<NewOrganisation, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.string("Name", &self.name, 0, 100);
    errors.finish(|| NewOrganisation {
      name:      self.name.unwrap_or_default().trim().to_owned(),
      parent_id: self.parent_id,
      is_public: self.is_public,
    })
  }
}

/// `POST /organisations` — returns 201 + the new [`Organisation`].
///
/// The caller becomes an admin member of the organisation they create.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Payload(body): Payload<CreateOrganisationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |org| {
        let operation = match org.parent_id {
          Some(_) => Operation::CreateChildOrganisation,
          None => Operation::CreateRootOrganisation,
        };
        Plan::new(operation)
          .reference_opt(EntityKind::Organisation, org.parent_id)
          .scope_opt(org.parent_id.map(ScopeRequirement::OrganisationAdmin))
      },
      |_, caller, org| async move {
        let organisation = Organisation {
          id:        Uuid::new_v4(),
          parent_id: org.parent_id,
          name:      org.name,
          is_public: org.is_public,
        };
        let batch = Batch::new()
          .with(Mutation::InsertOrganisation(organisation.clone()))
          .with(Mutation::PutOrganisationMembership(OrganisationMembership {
            organisation_id: organisation.id,
            person_id:       caller.person_id,
            is_admin:        true,
          }));
        Ok(Staged::write(organisation, batch))
      },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(outcome.value)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /organisations/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path(organisation): Path<PathId>,
) -> Result<Json<Organisation>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let id = organisation.id();
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      (),
      |_| {
        Plan::new(Operation::ViewOrganisation)
          .reference_path(EntityKind::Organisation, &organisation)
          .scope(ScopeRequirement::OrganisationMember(id))
      },
      |store, _, _| async move {
        let organisation = store
          .get_organisation(id)
          .await
          .map_err(ApiError::store)?
          .ok_or_else(|| ApiError::EntityIdNotFound {
            entity: EntityKind::Organisation,
            id:     id.to_string(),
          })?;
        Ok(Staged::read(organisation))
      },
    )
    .await?;
  Ok(Json(outcome.value))
}

// ─── Members ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersParams {
  /// Kept as a string so a malformed value can be reported as a bad
  /// parameter rather than a generic query rejection.
  pub is_admin: Option<String>,
}

/// `GET /organisations/{id}/members[?isAdmin=true|false]`
///
/// The flag is parsed by the operation itself, so identity and existence
/// failures take precedence over a malformed value.
pub async fn list_members<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path(organisation): Path<PathId>,
  Query(params): Query<ListMembersParams>,
) -> Result<Json<Vec<OrganisationMembership>>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let id = organisation.id();
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      (),
      |_| {
        Plan::new(Operation::ListOrganisationMembers)
          .reference_path(EntityKind::Organisation, &organisation)
          .scope(ScopeRequirement::OrganisationMember(id))
      },
      |store, _, _| async move {
        let is_admin = parse_flag("isAdmin", params.is_admin.as_deref())?;
        let members = store
          .list_organisation_members(id, is_admin)
          .await
          .map_err(ApiError::store)?;
        Ok(Staged::read(members))
      },
    )
    .await?;
  Ok(Json(outcome.value))
}

// ─── People ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonBody {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

pub struct NewPerson {
  pub first_name: String,
  pub last_name:  String,
}

impl Validate for CreatePersonBody {
  type Valid = NewPerson;

  fn validate(self) -> Result<NewPerson, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.string("FirstName", &self.first_name, 0, 50);
    errors.string("LastName", &self.last_name, 0, 50);
    errors.finish(|| NewPerson {
      first_name: self.first_name.unwrap_or_default().trim().to_owned(),
      last_name:  self.last_name.unwrap_or_default().trim().to_owned(),
    })
  }
}

/// `POST /organisations/{id}/people` — returns 201 + the new [`Person`].
///
/// A person is always created inside an organisation, so they start with
/// exactly one membership.
pub async fn create_person<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path(organisation): Path<PathId>,
  Payload(body): Payload<CreatePersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let id = organisation.id();
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |_| {
        Plan::new(Operation::CreatePerson)
          .reference_path(EntityKind::Organisation, &organisation)
          .scope(ScopeRequirement::OrganisationAdmin(id))
      },
      |_, _, new| async move {
        let person = Person {
          id:         Uuid::new_v4(),
          first_name: new.first_name,
          last_name:  new.last_name,
          created_at: Utc::now(),
        };
        let batch = Batch::new()
          .with(Mutation::InsertPerson(person.clone()))
          .with(Mutation::PutOrganisationMembership(OrganisationMembership {
            organisation_id: id,
            person_id:       person.id,
            is_admin:        false,
          }));
        Ok(Staged::write(person, batch))
      },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(outcome.value)))
}
