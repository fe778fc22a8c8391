//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- A NULL external_subject marks a blocked account. Rows are never deleted.
CREATE TABLE IF NOT EXISTS users (
    user_id          TEXT PRIMARY KEY,
    person_id        TEXT NOT NULL REFERENCES people(person_id),
    external_subject TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id TEXT NOT NULL REFERENCES users(user_id),
    role    TEXT NOT NULL,
    PRIMARY KEY (user_id, role)
);

CREATE TABLE IF NOT EXISTS organisations (
    organisation_id TEXT PRIMARY KEY,
    parent_id       TEXT REFERENCES organisations(organisation_id),
    name            TEXT NOT NULL,
    is_public       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS organisation_memberships (
    organisation_id TEXT NOT NULL REFERENCES organisations(organisation_id),
    person_id       TEXT NOT NULL REFERENCES people(person_id),
    is_admin        INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (organisation_id, person_id)
);

CREATE TABLE IF NOT EXISTS schools (
    school_id       TEXT PRIMARY KEY,
    organisation_id TEXT NOT NULL REFERENCES organisations(organisation_id),
    name            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS school_memberships (
    school_id     TEXT NOT NULL REFERENCES schools(school_id),
    person_id     TEXT NOT NULL REFERENCES people(person_id),
    is_instructor INTEGER NOT NULL DEFAULT 0,
    is_secretary  INTEGER NOT NULL DEFAULT 0,
    inactive_date TEXT,   -- ISO 8601 date or NULL while active
    PRIMARY KEY (school_id, person_id)
);

CREATE TABLE IF NOT EXISTS arts (
    art_id TEXT PRIMARY KEY,
    name   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS grades (
    grade_id        TEXT PRIMARY KEY,
    art_id          TEXT NOT NULL REFERENCES arts(art_id),
    organisation_id TEXT NOT NULL REFERENCES organisations(organisation_id),
    name            TEXT NOT NULL,
    rank            INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS org_members_person_idx ON organisation_memberships(person_id);
CREATE INDEX IF NOT EXISTS schools_org_idx        ON schools(organisation_id);

PRAGMA user_version = 1;
";
