//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, Transaction, TransactionBehavior};
use uuid::Uuid;

use roster_core::{
  entity::EntityKind,
  organisation::{Organisation, OrganisationMembership},
  orphan,
  person::User,
  school::{School, SchoolMembership},
  store::{Batch, Mutation, RecordStore},
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_role, encode_uuid, entity_table, RawOrganisation,
    RawOrganisationMembership, RawSchool, RawSchoolMembership, RawUser,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls are
/// serialised onto the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run on the connection thread) ──────────────────────────────

fn query_user(
  conn: &rusqlite::Connection,
  column: &'static str,
  value: &str,
) -> rusqlite::Result<Option<RawUser>> {
  let sql = format!(
    "SELECT user_id, person_id, external_subject FROM users WHERE {column} = ?1"
  );
  let row = conn
    .query_row(&sql, rusqlite::params![value], |row| {
      Ok(RawUser {
        user_id:          row.get(0)?,
        person_id:        row.get(1)?,
        external_subject: row.get(2)?,
        roles:            vec![],
      })
    })
    .optional()?;

  let Some(mut user) = row else { return Ok(None) };
  let mut stmt = conn.prepare("SELECT role FROM user_roles WHERE user_id = ?1 ORDER BY role")?;
  user.roles = stmt
    .query_map(rusqlite::params![user.user_id], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(Some(user))
}

/// Organisation memberships held by a person. Shared by the public read and
/// the orphan guard inside [`apply`], so both count the same rows.
fn count_memberships(conn: &rusqlite::Connection, person: &str) -> rusqlite::Result<u64> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM organisation_memberships WHERE person_id = ?1",
    rusqlite::params![person],
    |r| r.get(0),
  )?;
  Ok(count.max(0) as u64)
}

/// Apply one mutation inside `tx`.
///
/// The outer error is a database failure; the inner one is a domain rejection
/// that must roll the batch back. Returns the number of rows changed.
fn apply(
  tx: &Transaction<'_>,
  mutation: Mutation,
) -> rusqlite::Result<std::result::Result<usize, roster_core::Error>> {
  let changed = match mutation {
    Mutation::InsertPerson(p) => tx.execute(
      "INSERT INTO people (person_id, first_name, last_name, created_at)
       VALUES (?1, ?2, ?3, ?4)",
      rusqlite::params![encode_uuid(p.id), p.first_name, p.last_name, encode_dt(p.created_at)],
    )?,

    Mutation::InsertUser(u) => {
      let user_id = encode_uuid(u.id);
      let mut n = tx.execute(
        "INSERT INTO users (user_id, person_id, external_subject) VALUES (?1, ?2, ?3)",
        rusqlite::params![user_id, encode_uuid(u.person_id), u.external_subject],
      )?;
      for role in &u.roles {
        n += tx.execute(
          "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)",
          rusqlite::params![user_id, encode_role(*role)],
        )?;
      }
      n
    }

    Mutation::ClearUserSubject { user_id } => tx.execute(
      "UPDATE users SET external_subject = NULL WHERE user_id = ?1",
      rusqlite::params![encode_uuid(user_id)],
    )?,

    Mutation::InsertOrganisation(o) => tx.execute(
      "INSERT INTO organisations (organisation_id, parent_id, name, is_public)
       VALUES (?1, ?2, ?3, ?4)",
      rusqlite::params![
        encode_uuid(o.id),
        o.parent_id.map(encode_uuid),
        o.name,
        o.is_public,
      ],
    )?,

    Mutation::PutOrganisationMembership(m) => tx.execute(
      "INSERT INTO organisation_memberships (organisation_id, person_id, is_admin)
       VALUES (?1, ?2, ?3)
       ON CONFLICT (organisation_id, person_id) DO UPDATE SET is_admin = excluded.is_admin",
      rusqlite::params![encode_uuid(m.organisation_id), encode_uuid(m.person_id), m.is_admin],
    )?,

    Mutation::RemoveOrganisationMembership { organisation_id, person_id } => {
      let org_str    = encode_uuid(organisation_id);
      let person_str = encode_uuid(person_id);

      let held = tx
        .query_row(
          "SELECT 1 FROM organisation_memberships
           WHERE organisation_id = ?1 AND person_id = ?2",
          rusqlite::params![org_str, person_str],
          |_| Ok(()),
        )
        .optional()?
        .is_some();
      if !held {
        return Ok(Err(roster_core::Error::MembershipNotFound { person_id, organisation_id }));
      }

      let count = count_memberships(tx, &person_str)?;
      if let Err(rejection) = orphan::before_remove_membership(person_id, organisation_id, count) {
        return Ok(Err(rejection));
      }

      tx.execute(
        "DELETE FROM organisation_memberships WHERE organisation_id = ?1 AND person_id = ?2",
        rusqlite::params![org_str, person_str],
      )?
    }

    Mutation::InsertSchool(s) => tx.execute(
      "INSERT INTO schools (school_id, organisation_id, name) VALUES (?1, ?2, ?3)",
      rusqlite::params![encode_uuid(s.id), encode_uuid(s.organisation_id), s.name],
    )?,

    Mutation::PutSchoolMembership(m) => tx.execute(
      "INSERT INTO school_memberships
         (school_id, person_id, is_instructor, is_secretary, inactive_date)
       VALUES (?1, ?2, ?3, ?4, ?5)
       ON CONFLICT (school_id, person_id) DO UPDATE SET
         is_instructor = excluded.is_instructor,
         is_secretary  = excluded.is_secretary,
         inactive_date = excluded.inactive_date",
      rusqlite::params![
        encode_uuid(m.school_id),
        encode_uuid(m.person_id),
        m.is_instructor,
        m.is_secretary,
        m.inactive_date.map(encode_date),
      ],
    )?,

    Mutation::InsertArt(a) => tx.execute(
      "INSERT INTO arts (art_id, name) VALUES (?1, ?2)",
      rusqlite::params![encode_uuid(a.id), a.name],
    )?,

    Mutation::InsertGrade(g) => tx.execute(
      "INSERT INTO grades (grade_id, art_id, organisation_id, name, rank)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      rusqlite::params![
        encode_uuid(g.id),
        encode_uuid(g.art_id),
        encode_uuid(g.organisation_id),
        g.name,
        g.rank,
      ],
    )?,
  };
  Ok(Ok(changed))
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Authorization reads ───────────────────────────────────────────────────

  async fn find_user_by_external_subject(&self, subject: &str) -> Result<Option<User>> {
    let subject = subject.to_owned();

    let raw = self
      .conn
      .call(move |conn| Ok(query_user(conn, "external_subject", &subject)?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_organisation_membership(
    &self,
    organisation_id: Uuid,
    person_id:       Uuid,
  ) -> Result<Option<OrganisationMembership>> {
    let org_str    = encode_uuid(organisation_id);
    let person_str = encode_uuid(person_id);

    let raw: Option<RawOrganisationMembership> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT organisation_id, person_id, is_admin FROM organisation_memberships
             WHERE organisation_id = ?1 AND person_id = ?2",
            rusqlite::params![org_str, person_str],
            |row| {
              Ok(RawOrganisationMembership {
                organisation_id: row.get(0)?,
                person_id:       row.get(1)?,
                is_admin:        row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawOrganisationMembership::into_membership).transpose()
  }

  async fn get_school_membership(
    &self,
    school_id: Uuid,
    person_id: Uuid,
  ) -> Result<Option<SchoolMembership>> {
    let school_str = encode_uuid(school_id);
    let person_str = encode_uuid(person_id);

    let raw: Option<RawSchoolMembership> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT school_id, person_id, is_instructor, is_secretary, inactive_date
             FROM school_memberships WHERE school_id = ?1 AND person_id = ?2",
            rusqlite::params![school_str, person_str],
            |row| {
              Ok(RawSchoolMembership {
                school_id:     row.get(0)?,
                person_id:     row.get(1)?,
                is_instructor: row.get(2)?,
                is_secretary:  row.get(3)?,
                inactive_date: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSchoolMembership::into_membership).transpose()
  }

  async fn count_organisation_memberships(&self, person_id: Uuid) -> Result<u64> {
    let person_str = encode_uuid(person_id);

    let count = self
      .conn
      .call(move |conn| Ok(count_memberships(conn, &person_str)?))
      .await?;

    Ok(count)
  }

  async fn is_organisation_public(&self, organisation_id: Uuid) -> Result<bool> {
    let org_str = encode_uuid(organisation_id);

    let public: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT is_public FROM organisations WHERE organisation_id = ?1",
            rusqlite::params![org_str],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(public.unwrap_or(false))
  }

  async fn entity_exists(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
    let (table, column) = entity_table(kind);
    let id_str = encode_uuid(id);

    let exists = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT 1 FROM {table} WHERE {column} = ?1");
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], |_| Ok(()))
          .optional()?
          .is_some())
      })
      .await?;

    Ok(exists)
  }

  // ── Record reads ──────────────────────────────────────────────────────────

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| Ok(query_user(conn, "user_id", &id_str)?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_organisation(&self, id: Uuid) -> Result<Option<Organisation>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawOrganisation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT organisation_id, parent_id, name, is_public
             FROM organisations WHERE organisation_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawOrganisation {
                organisation_id: row.get(0)?,
                parent_id:       row.get(1)?,
                name:            row.get(2)?,
                is_public:       row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawOrganisation::into_organisation).transpose()
  }

  async fn list_organisation_members(
    &self,
    organisation_id: Uuid,
    is_admin:        Option<bool>,
  ) -> Result<Vec<OrganisationMembership>> {
    let org_str = encode_uuid(organisation_id);

    let raws: Vec<RawOrganisationMembership> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT organisation_id, person_id, is_admin FROM organisation_memberships
           WHERE organisation_id = ?1 AND (?2 IS NULL OR is_admin = ?2)
           ORDER BY person_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![org_str, is_admin], |row| {
            Ok(RawOrganisationMembership {
              organisation_id: row.get(0)?,
              person_id:       row.get(1)?,
              is_admin:        row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOrganisationMembership::into_membership).collect()
  }

  async fn get_school(&self, id: Uuid) -> Result<Option<School>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSchool> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT school_id, organisation_id, name FROM schools WHERE school_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawSchool {
                school_id:       row.get(0)?,
                organisation_id: row.get(1)?,
                name:            row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSchool::into_school).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn commit(&self, batch: Batch) -> Result<bool> {
    if batch.is_empty() {
      return Ok(false);
    }
    let size = batch.len();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut changed = 0;
        for mutation in batch {
          match apply(&tx, mutation)? {
            Ok(n) => changed += n,
            // Dropping `tx` without committing rolls every staged change back.
            Err(rejection) => return Ok(Err(rejection)),
          }
        }
        tx.commit()?;
        Ok(Ok(changed))
      })
      .await?;

    match outcome {
      Ok(changed) => {
        tracing::debug!(size, changed, "batch committed");
        Ok(changed > 0)
      }
      Err(rejection) => {
        tracing::debug!(size, %rejection, "batch rolled back");
        Err(rejection.into())
      }
    }
  }
}
