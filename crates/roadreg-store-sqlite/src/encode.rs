//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO 8601 (`YYYY-MM-DD`) so they sort and
//! compare correctly in SQL. Timestamps are RFC 3339 strings. UUIDs are
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use roadreg_core::{
  demerit::{DemeritEvent, Points},
  person::{Address, Person},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column order shared by every `SELECT` on `persons`.
pub const PERSON_COLUMNS: &str = "person_id, first_name, last_name, \
  street_number, street, city, state, country, birth_date, suspended";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:     String,
  pub first_name:    String,
  pub last_name:     String,
  pub street_number: String,
  pub street:        String,
  pub city:          String,
  pub state:         String,
  pub country:       String,
  pub birth_date:    String,
  pub suspended:     bool,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      street_number: row.get(3)?,
      street:        row.get(4)?,
      city:          row.get(5)?,
      state:         row.get(6)?,
      country:       row.get(7)?,
      birth_date:    row.get(8)?,
      suspended:     row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         self.person_id,
      first_name: self.first_name,
      last_name:  self.last_name,
      address:    Address {
        street_number: self.street_number,
        street:        self.street,
        city:          self.city,
        state:         self.state,
        country:       self.country,
      },
      birth_date: decode_date(&self.birth_date)?,
      suspended:  self.suspended,
    })
  }
}

/// Raw values read directly from a `demerits` row.
pub struct RawDemerit {
  pub event_id:     String,
  pub person_id:    String,
  pub offense_date: String,
  pub points:       i64,
  pub recorded_at:  String,
}

impl RawDemerit {
  pub fn into_event(self) -> Result<DemeritEvent> {
    let points = Points::new(self.points).ok_or_else(|| {
      Error::Corrupt(format!(
        "event {} has {} points",
        self.event_id, self.points
      ))
    })?;

    Ok(DemeritEvent {
      event_id: decode_uuid(&self.event_id)?,
      person_id: self.person_id,
      offense_date: decode_date(&self.offense_date)?,
      points,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
