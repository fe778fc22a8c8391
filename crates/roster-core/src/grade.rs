//! Arts and the grades an organisation awards within them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Art {
  pub id:   Uuid,
  pub name: String,
}

/// A grade belongs to one art and is defined by one organisation. `rank`
/// orders grades within that pair, lowest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
  pub id:              Uuid,
  pub art_id:          Uuid,
  pub organisation_id: Uuid,
  pub name:            String,
  pub rank:            u32,
}
