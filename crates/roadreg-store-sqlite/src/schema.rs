//! SQL schema for the registry's SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- The address is kept as five columns so no delimiter ever needs escaping.
CREATE TABLE IF NOT EXISTS persons (
    person_id     TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    street_number TEXT NOT NULL,
    street        TEXT NOT NULL,
    city          TEXT NOT NULL,
    state         TEXT NOT NULL,
    country       TEXT NOT NULL,
    birth_date    TEXT NOT NULL,              -- ISO 8601 calendar date
    suspended     INTEGER NOT NULL DEFAULT 0  -- 0 | 1
);

-- Demerit events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. person_id is a
-- plain reference, not a foreign key: events outlive identifier changes.
CREATE TABLE IF NOT EXISTS demerits (
    event_id     TEXT PRIMARY KEY,
    person_id    TEXT NOT NULL,
    offense_date TEXT NOT NULL,               -- ISO 8601 calendar date
    points       INTEGER NOT NULL CHECK (points BETWEEN 1 AND 6),
    recorded_at  TEXT NOT NULL                -- RFC 3339 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS demerits_person_idx ON demerits(person_id);

PRAGMA user_version = 1;
";
