//! Handlers for `/schools` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/schools` | Body: [`CreateSchoolBody`]; organisation admins only |
//! | `PUT`  | `/schools/{id}/members/{person_id}` | Body: [`PutSchoolMemberBody`]; active school secretaries only |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use roster_core::{
  entity::EntityKind,
  roles::Operation,
  school::{School, SchoolMembership},
  scope::ScopeRequirement,
  store::{Batch, Mutation, RecordStore},
  validation::{FieldErrors, Validate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{PathId, Payload},
  identity::Credential,
  pipeline::{Coordinator, Plan, Staged},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolBody {
  pub name:            Option<String>,
  pub organisation_id: Option<Uuid>,
}

pub struct NewSchool {
  pub name:            String,
  pub organisation_id: Uuid,
}

impl Validate for CreateSchoolBody {
  type Valid = NewSchool;

  fn validate(self) -> Result<NewSchool, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.string("Name", &self.name, 0, 100);
    let organisation_id = errors.required("OrganisationId", &self.organisation_id).copied();
    errors.finish(|| NewSchool {
      name:            self.name.unwrap_or_default().trim().to_owned(),
      organisation_id: organisation_id.unwrap_or_default(),
    })
  }
}

/// `POST /schools` — returns 201 + the new [`School`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Payload(body): Payload<CreateSchoolBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |school| {
        Plan::new(Operation::CreateSchool)
          .reference(EntityKind::Organisation, school.organisation_id)
          .scope(ScopeRequirement::OrganisationAdmin(school.organisation_id))
      },
      |_, _, new| async move {
        let school = School {
          id:              Uuid::new_v4(),
          organisation_id: new.organisation_id,
          name:            new.name,
        };
        Ok(Staged::write(school.clone(), Batch::new().with(Mutation::InsertSchool(school))))
      },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(outcome.value)))
}

// ─── Members ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutSchoolMemberBody {
  pub is_instructor: Option<bool>,
  pub is_secretary:  Option<bool>,
  pub inactive_date: Option<NaiveDate>,
}

pub struct SchoolRoles {
  pub is_instructor: bool,
  pub is_secretary:  bool,
  pub inactive_date: Option<NaiveDate>,
}

impl Validate for PutSchoolMemberBody {
  type Valid = SchoolRoles;

  fn validate(self) -> Result<SchoolRoles, FieldErrors> {
    let mut errors = FieldErrors::new();
    let is_instructor = errors.required("IsInstructor", &self.is_instructor).copied();
    let is_secretary = errors.required("IsSecretary", &self.is_secretary).copied();
    errors.finish(|| SchoolRoles {
      is_instructor: is_instructor.unwrap_or_default(),
      is_secretary:  is_secretary.unwrap_or_default(),
      inactive_date: self.inactive_date,
    })
  }
}

/// `PUT /schools/{id}/members/{person_id}`
///
/// The person must already belong to the school's organisation.
pub async fn put_member<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path((school, person)): Path<(PathId, PathId)>,
  Payload(body): Payload<PutSchoolMemberBody>,
) -> Result<Json<SchoolMembership>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let (school_id, person_id) = (school.id(), person.id());
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |_| {
        Plan::new(Operation::PutSchoolMembership)
          .reference_path(EntityKind::School, &school)
          .reference_path(EntityKind::Person, &person)
          .scope(ScopeRequirement::SchoolSecretary(school_id))
      },
      |store, _, roles| async move {
        let school = store
          .get_school(school_id)
          .await
          .map_err(ApiError::store)?
          .ok_or_else(|| ApiError::EntityIdNotFound {
            entity: EntityKind::School,
            id:     school_id.to_string(),
          })?;

        store
          .get_organisation_membership(school.organisation_id, person_id)
          .await
          .map_err(ApiError::store)?
          .ok_or(ApiError::EntityRelationNotFound {
            child:     EntityKind::Person,
            child_id:  person_id,
            parent:    EntityKind::Organisation,
            parent_id: school.organisation_id,
          })?;

        let membership = SchoolMembership {
          school_id,
          person_id,
          is_instructor: roles.is_instructor,
          is_secretary: roles.is_secretary,
          inactive_date: roles.inactive_date,
        };
        Ok(Staged::write(
          membership,
          Batch::new().with(Mutation::PutSchoolMembership(membership)),
        ))
      },
    )
    .await?;
  Ok(Json(outcome.value))
}
