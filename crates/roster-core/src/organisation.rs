//! Organisations and organisation memberships.
//!
//! Organisations form a forest: each has at most one parent, and a parent is
//! only ever assigned from an organisation that already exists, so cycles
//! cannot be constructed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
  pub id:        Uuid,
  pub parent_id: Option<Uuid>,
  pub name:      String,
  /// Public organisations are readable by any registered user, member or not.
  pub is_public: bool,
}

/// A row linking a person to an organisation. Unique per
/// `(organisation_id, person_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationMembership {
  pub organisation_id: Uuid,
  pub person_id:       Uuid,
  pub is_admin:        bool,
}
