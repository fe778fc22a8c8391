//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates are ISO 8601 (`YYYY-MM-DD`), and
//! UUIDs are hyphenated lowercase strings. Roles are stored by wire name.

use std::{collections::BTreeSet, str::FromStr as _};

use chrono::{DateTime, NaiveDate, Utc};
use roster_core::{
  entity::EntityKind,
  organisation::{Organisation, OrganisationMembership},
  person::User,
  roles::Role,
  school::{School, SchoolMembership},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ────────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Roles ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| roster_core::Error::UnknownRole(s.to_owned()).into())
}

// ─── EntityKind ───────────────────────────────────────────────────────────────

/// The `(table, primary key column)` holding records of `kind`.
pub fn entity_table(kind: EntityKind) -> (&'static str, &'static str) {
  match kind {
    EntityKind::Person => ("people", "person_id"),
    EntityKind::User => ("users", "user_id"),
    EntityKind::Organisation => ("organisations", "organisation_id"),
    EntityKind::School => ("schools", "school_id"),
    EntityKind::Art => ("arts", "art_id"),
    EntityKind::Grade => ("grades", "grade_id"),
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// A `users` row plus its role names, before decoding.
pub struct RawUser {
  pub user_id:          String,
  pub person_id:        String,
  pub external_subject: Option<String>,
  pub roles:            Vec<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    let roles = self
      .roles
      .iter()
      .map(|r| decode_role(r))
      .collect::<Result<BTreeSet<_>>>()?;
    Ok(User {
      id: decode_uuid(&self.user_id)?,
      person_id: decode_uuid(&self.person_id)?,
      external_subject: self.external_subject,
      roles,
    })
  }
}

pub struct RawOrganisation {
  pub organisation_id: String,
  pub parent_id:       Option<String>,
  pub name:            String,
  pub is_public:       bool,
}

impl RawOrganisation {
  pub fn into_organisation(self) -> Result<Organisation> {
    Ok(Organisation {
      id:        decode_uuid(&self.organisation_id)?,
      parent_id: self.parent_id.as_deref().map(decode_uuid).transpose()?,
      name:      self.name,
      is_public: self.is_public,
    })
  }
}

pub struct RawOrganisationMembership {
  pub organisation_id: String,
  pub person_id:       String,
  pub is_admin:        bool,
}

impl RawOrganisationMembership {
  pub fn into_membership(self) -> Result<OrganisationMembership> {
    Ok(OrganisationMembership {
      organisation_id: decode_uuid(&self.organisation_id)?,
      person_id:       decode_uuid(&self.person_id)?,
      is_admin:        self.is_admin,
    })
  }
}

pub struct RawSchool {
  pub school_id:       String,
  pub organisation_id: String,
  pub name:            String,
}

impl RawSchool {
  pub fn into_school(self) -> Result<School> {
    Ok(School {
      id:              decode_uuid(&self.school_id)?,
      organisation_id: decode_uuid(&self.organisation_id)?,
      name:            self.name,
    })
  }
}

pub struct RawSchoolMembership {
  pub school_id:     String,
  pub person_id:     String,
  pub is_instructor: bool,
  pub is_secretary:  bool,
  pub inactive_date: Option<String>,
}

impl RawSchoolMembership {
  pub fn into_membership(self) -> Result<SchoolMembership> {
    Ok(SchoolMembership {
      school_id:     decode_uuid(&self.school_id)?,
      person_id:     decode_uuid(&self.person_id)?,
      is_instructor: self.is_instructor,
      is_secretary:  self.is_secretary,
      inactive_date: self.inactive_date.as_deref().map(decode_date).transpose()?,
    })
  }
}
