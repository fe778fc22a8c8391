//! Handler for `POST /arts/{art_id}/grades`.
//!
//! The art id in the path is checked before the organisation id in the body.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  entity::EntityKind,
  grade::Grade,
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
  extract::{PathId, Payload},
  identity::Credential,
  pipeline::{Coordinator, Plan, Staged},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeBody {
  pub organisation_id: Option<Uuid>,
  pub name:            Option<String>,
  pub rank:            Option<u32>,
}

pub struct NewGrade {
  pub organisation_id: Uuid,
  pub name:            String,
  pub rank:            u32,
}

impl Validate for CreateGradeBody {
  type Valid = NewGrade;

  fn validate(self) -> Result<NewGrade, FieldErrors> {
    let mut errors = FieldErrors::new();
    let organisation_id = errors.required("OrganisationId", &self.organisation_id).copied();
    errors.string("Name", &self.name, 0, 50);
    let rank = errors.required("Rank", &self.rank).copied();
    errors.finish(|| NewGrade {
      organisation_id: organisation_id.unwrap_or_default(),
      name:            self.name.unwrap_or_default().trim().to_owned(),
      rank:            rank.unwrap_or_default(),
    })
  }
}

/// `POST /arts/{art_id}/grades` — returns 201 + the new [`Grade`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  credential: Credential,
  Path(art): Path<PathId>,
  Payload(body): Payload<CreateGradeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let art_id = art.id();
  let outcome = Coordinator::new(state.store.as_ref())
    .run(
      &credential,
      body,
      |grade| {
        Plan::new(Operation::CreateGrade)
          .reference_path(EntityKind::Art, &art)
          .reference(EntityKind::Organisation, grade.organisation_id)
          .scope(ScopeRequirement::OrganisationAdmin(grade.organisation_id))
      },
      |_, _, new| async move {
        let grade = Grade {
          id: Uuid::new_v4(),
          art_id,
          organisation_id: new.organisation_id,
          name: new.name,
          rank: new.rank,
        };
        Ok(Staged::write(grade.clone(), Batch::new().with(Mutation::InsertGrade(grade))))
      },
    )
    .await?;
  Ok((StatusCode::CREATED, Json(outcome.value)))
}
