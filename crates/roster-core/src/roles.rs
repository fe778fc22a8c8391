//! Role & capability registry.
//!
//! A user holds a set of [`Role`]s. Each business [`Operation`] declares the
//! roles that unlock it; holding any one of them is enough. [`Role::Superuser`]
//! satisfies every check.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A named capability group.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Role {
  /// Bypasses every capability and scope check.
  Superuser,
  OrganisationAdmin,
  OrganisationMember,
  SchoolSecretary,
  SchoolInstructor,
}

/// Every operation the service authorises, keyed to the roles it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
  ViewSelf,
  ViewOrganisation,
  ListOrganisationMembers,
  CreateRootOrganisation,
  CreateChildOrganisation,
  CreatePerson,
  AddOrganisationMember,
  RemoveOrganisationMember,
  CreateSchool,
  PutSchoolMembership,
  CreateGrade,
  ProvisionUser,
  BlockUser,
}

impl Operation {
  /// The roles that unlock this operation. An empty slice means any
  /// registered user may perform it.
  pub fn required_roles(self) -> &'static [Role] {
    use Operation::*;
    match self {
      ViewSelf => &[],
      ViewOrganisation | ListOrganisationMembers => {
        &[Role::OrganisationMember, Role::OrganisationAdmin]
      }
      CreateRootOrganisation | ProvisionUser | BlockUser => &[Role::Superuser],
      CreateChildOrganisation
      | CreatePerson
      | AddOrganisationMember
      | RemoveOrganisationMember
      | CreateSchool
      | CreateGrade => &[Role::OrganisationAdmin],
      PutSchoolMembership => &[Role::SchoolSecretary, Role::OrganisationAdmin],
    }
  }
}

/// `true` if `roles` contains the universal bypass role.
pub fn is_superuser(roles: &BTreeSet<Role>) -> bool { roles.contains(&Role::Superuser) }

/// Whether a holder of `roles` may perform something requiring `required`.
///
/// Succeeds when `required` is empty, when the holder is a superuser, or when
/// the two sets intersect.
pub fn has_capability(roles: &BTreeSet<Role>, required: &[Role]) -> bool {
  required.is_empty()
    || is_superuser(roles)
    || required.iter().any(|r| roles.contains(r))
}
