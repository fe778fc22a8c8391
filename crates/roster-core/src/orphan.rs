//! Orphan invariant guard.
//!
//! A person who belongs to an organisation must never be left with none. Store
//! backends call [`before_remove_membership`] inside the same transaction as
//! the delete, after counting the person's memberships, so the count and the
//! removal cannot interleave with a concurrent removal.

use uuid::Uuid;

use crate::{Error, Result};

/// Decide whether `person_id` may leave `organisation_id`, given how many
/// organisation memberships they currently hold (including this one).
///
/// Rejects with [`Error::OrphanPerson`] unless at least one other membership
/// would remain.
pub fn before_remove_membership(
  person_id:       Uuid,
  organisation_id: Uuid,
  current_count:   u64,
) -> Result<()> {
  if current_count <= 1 {
    return Err(Error::OrphanPerson { person_id, organisation_id });
  }
  Ok(())
}
