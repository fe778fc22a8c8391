//! Schools and school memberships.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A school always belongs to exactly one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
  pub id:              Uuid,
  pub organisation_id: Uuid,
  pub name:            String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolMembership {
  pub school_id:     Uuid,
  pub person_id:     Uuid,
  pub is_instructor: bool,
  pub is_secretary:  bool,
  /// Set once the membership has lapsed. Lapsed secretaries lose their
  /// secretary rights.
  pub inactive_date: Option<NaiveDate>,
}

impl SchoolMembership {
  pub fn is_active_secretary(&self) -> bool {
    self.is_secretary && self.inactive_date.is_none()
  }
}
