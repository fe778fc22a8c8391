//! The `RecordStore` trait and the mutation batch it commits.
//!
//! The trait is the narrow contract the authorization pipeline reads through.
//! It is implemented by storage backends (e.g. `roster-store-sqlite`); higher
//! layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  entity::EntityKind,
  grade::{Art, Grade},
  organisation::{Organisation, OrganisationMembership},
  person::{Person, User},
  school::{School, SchoolMembership},
};

// ─── Mutations ───────────────────────────────────────────────────────────────

/// A single staged change. Mutations are only applied through
/// [`RecordStore::commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
  InsertPerson(Person),
  InsertUser(User),
  /// Block a user by clearing their external subject.
  ClearUserSubject { user_id: Uuid },
  InsertOrganisation(Organisation),
  /// Insert a membership, or update `is_admin` on an existing one.
  PutOrganisationMembership(OrganisationMembership),
  /// Remove a membership, subject to the orphan invariant guard.
  RemoveOrganisationMembership { organisation_id: Uuid, person_id: Uuid },
  InsertSchool(School),
  PutSchoolMembership(SchoolMembership),
  InsertArt(Art),
  InsertGrade(Grade),
}

/// An ordered list of mutations committed as one unit of work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch(Vec<Mutation>);

impl Batch {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, mutation: Mutation) { self.0.push(mutation); }

  pub fn with(mut self, mutation: Mutation) -> Self {
    self.push(mutation);
    self
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }
}

impl From<Vec<Mutation>> for Batch {
  fn from(mutations: Vec<Mutation>) -> Self { Self(mutations) }
}

impl IntoIterator for Batch {
  type IntoIter = std::vec::IntoIter<Mutation>;
  type Item = Mutation;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Backend errors expose any domain rejection raised inside a unit of work,
/// so callers can tell an orphan rejection from an I/O failure without
/// knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_core(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster record store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── Authorization reads ───────────────────────────────────────────────

  /// Find the user whose external subject equals `subject`. Blocked users
  /// have no subject and are never returned.
  fn find_user_by_external_subject<'a>(
    &'a self,
    subject: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_organisation_membership(
    &self,
    organisation_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Option<OrganisationMembership>, Self::Error>> + Send + '_;

  fn get_school_membership(
    &self,
    school_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Option<SchoolMembership>, Self::Error>> + Send + '_;

  fn count_organisation_memberships(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// `false` for organisations that do not exist.
  fn is_organisation_public(
    &self,
    organisation_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn entity_exists(
    &self,
    kind: EntityKind,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Record reads ──────────────────────────────────────────────────────

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_organisation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Organisation>, Self::Error>> + Send + '_;

  /// Members of an organisation, optionally restricted by admin flag.
  fn list_organisation_members(
    &self,
    organisation_id: Uuid,
    is_admin: Option<bool>,
  ) -> impl Future<Output = Result<Vec<OrganisationMembership>, Self::Error>> + Send + '_;

  fn get_school(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<School>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply every mutation in `batch` atomically: either all are saved or
  /// none are. Returns `true` if at least one row changed.
  ///
  /// [`Mutation::RemoveOrganisationMembership`] runs the orphan guard
  /// ([`crate::orphan::before_remove_membership`]) inside the same unit of
  /// work; a rejection rolls back the whole batch.
  fn commit(
    &self,
    batch: Batch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
