//! Scope requirements: the relationship an operation demands between the
//! caller and the organisation or school it targets.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRequirement {
  /// Caller must be a member of the organisation, unless it is public.
  OrganisationMember(Uuid),
  /// Caller must be an admin member of the organisation.
  OrganisationAdmin(Uuid),
  /// Caller must be an active secretary of the school.
  SchoolSecretary(Uuid),
}
