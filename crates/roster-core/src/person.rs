//! People and the user accounts that let them sign in.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// A person record. People exist independently of user accounts; most
/// people in an organisation never sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub created_at: DateTime<Utc>,
}

/// An internal account linked to one person.
///
/// `external_subject` is the subject claim issued by the identity provider.
/// A `None` subject means the account has been blocked: the row is kept but
/// no credential can resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:               Uuid,
  pub person_id:        Uuid,
  pub external_subject: Option<String>,
  pub roles:            BTreeSet<Role>,
}

impl User {
  pub fn is_blocked(&self) -> bool { self.external_subject.is_none() }
}
