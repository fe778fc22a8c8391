//! Entity kinds addressable by id, and the references an operation declares.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Every record kind whose existence the pipeline can check by id.
///
/// The `Display` form is the name used in not-found messages
/// (`"Organisation ID '…' not found."`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
pub enum EntityKind {
  Person,
  User,
  Organisation,
  School,
  Art,
  Grade,
}

impl EntityKind {
  /// Lower-case noun used when the kind appears as a parent in a relation
  /// message (`"Person '…' not found in organisation '…'"`).
  pub fn noun(self) -> String {
    let name: &'static str = self.into();
    name.to_lowercase()
  }
}

/// An `(kind, id)` pair an operation references through its path or body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
  pub kind: EntityKind,
  pub id:   Uuid,
}

impl EntityRef {
  pub fn new(kind: EntityKind, id: Uuid) -> Self { Self { kind, id } }
}
