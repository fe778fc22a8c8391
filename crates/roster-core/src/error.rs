//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// Removing this membership would leave the person in no organisation.
  #[error(
    "Person '{person_id}' cannot be removed from organisation \
     '{organisation_id}': it is their last organisation."
  )]
  OrphanPerson { person_id: Uuid, organisation_id: Uuid },

  #[error("Person '{person_id}' not found in organisation '{organisation_id}'")]
  MembershipNotFound { person_id: Uuid, organisation_id: Uuid },

  #[error("unknown role: {0:?}")]
  UnknownRole(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
