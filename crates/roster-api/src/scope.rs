//! Resource-scope access evaluator.
//!
//! Decides whether a caller holds the relationship a [`ScopeRequirement`]
//! demands with its target organisation or school. Superusers never reach
//! this point; the coordinator bypasses it for them.

use roster_core::{scope::ScopeRequirement, store::RecordStore};

use crate::{
  error::{ApiError, ErrorCode, Result},
  identity::Caller,
};

/// `Ok(())` if access is granted, otherwise the specific forbidden code.
///
/// The organisation path tells "not a member" ([`ErrorCode::NoOrganisationAccess`])
/// apart from "member but not admin" ([`ErrorCode::NotOrganisationAdmin`]). The
/// school path reports both as [`ErrorCode::NotSchoolSecretary`]. The public
/// flag only opens organisation-level reads.
pub async fn evaluate<S: RecordStore>(
  store:       &S,
  caller:      &Caller,
  requirement: ScopeRequirement,
) -> Result<()> {
  match requirement {
    ScopeRequirement::OrganisationMember(organisation_id) => {
      let membership = store
        .get_organisation_membership(organisation_id, caller.person_id)
        .await
        .map_err(ApiError::store)?;
      if membership.is_some() {
        return Ok(());
      }
      if store.is_organisation_public(organisation_id).await.map_err(ApiError::store)? {
        return Ok(());
      }
      Err(ErrorCode::NoOrganisationAccess.into())
    }

    ScopeRequirement::OrganisationAdmin(organisation_id) => {
      let membership = store
        .get_organisation_membership(organisation_id, caller.person_id)
        .await
        .map_err(ApiError::store)?;
      match membership {
        None => Err(ErrorCode::NoOrganisationAccess.into()),
        Some(m) if !m.is_admin => Err(ErrorCode::NotOrganisationAdmin.into()),
        Some(_) => Ok(()),
      }
    }

    ScopeRequirement::SchoolSecretary(school_id) => {
      let membership = store
        .get_school_membership(school_id, caller.person_id)
        .await
        .map_err(ApiError::store)?;
      match membership {
        Some(m) if m.is_active_secretary() => Ok(()),
        _ => Err(ErrorCode::NotSchoolSecretary.into()),
      }
    }
  }
}
