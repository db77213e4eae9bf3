//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roadreg_core::{
  demerit::{DemeritEvent, NewDemerit},
  person::Person,
  store::RecordStore,
};

use crate::{
  Result,
  encode::{
    PERSON_COLUMNS, RawDemerit, RawPerson, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A registry store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
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

  /// Open an in-memory store, useful for testing.
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

/// Positional parameters for every column of [`PERSON_COLUMNS`], in order.
struct PersonParams([String; 9], bool);

impl PersonParams {
  fn new(p: Person) -> Self {
    Self(
      [
        p.id,
        p.first_name,
        p.last_name,
        p.address.street_number,
        p.address.street,
        p.address.city,
        p.address.state,
        p.address.country,
        encode_date(p.birth_date),
      ],
      p.suspended,
    )
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn create_record(&self, record: Person) -> Result<bool> {
    let PersonParams(cols, suspended) = PersonParams::new(record);

    let inserted = self
      .conn
      .call(move |conn| {
        let [id, first, last, number, street, city, state, country, birth] =
          cols;
        let n = conn.execute(
          &format!(
            "INSERT OR IGNORE INTO persons ({PERSON_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
          ),
          rusqlite::params![
            id, first, last, number, street, city, state, country, birth,
            suspended,
          ],
        )?;
        Ok(n == 1)
      })
      .await?;

    Ok(inserted)
  }

  async fn find_record(&self, id: &str) -> Result<Option<Person>> {
    let id = id.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
              rusqlite::params![id],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn replace_record(&self, id: &str, record: Person) -> Result<bool> {
    let old_id = id.to_owned();
    let PersonParams(cols, suspended) = PersonParams::new(record);

    let replaced = self
      .conn
      .call(move |conn| {
        let [id, first, last, number, street, city, state, country, birth] =
          cols;
        let n = conn.execute(
          "UPDATE OR IGNORE persons SET
             person_id = ?1, first_name = ?2, last_name = ?3,
             street_number = ?4, street = ?5, city = ?6, state = ?7,
             country = ?8, birth_date = ?9, suspended = ?10
           WHERE person_id = ?11",
          rusqlite::params![
            id, first, last, number, street, city, state, country, birth,
            suspended, old_id,
          ],
        )?;
        Ok(n == 1)
      })
      .await?;

    Ok(replaced)
  }

  async fn list_records(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons ORDER BY person_id"
        ))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Demerits (append-only) ────────────────────────────────────────────────

  async fn append_demerit_event(&self, input: NewDemerit) -> Result<DemeritEvent> {
    let event = DemeritEvent {
      event_id:     Uuid::new_v4(),
      person_id:    input.person_id,
      offense_date: input.offense_date,
      points:       input.points,
      recorded_at:  Utc::now(),
    };

    let event_id_str  = encode_uuid(event.event_id);
    let person_id     = event.person_id.clone();
    let offense_str   = encode_date(event.offense_date);
    let points        = i64::from(event.points);
    let recorded_str  = encode_dt(event.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO demerits (event_id, person_id, offense_date, points, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![event_id_str, person_id, offense_str, points, recorded_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn demerit_events_for(&self, id: &str) -> Result<Vec<DemeritEvent>> {
    let id = id.to_owned();

    let raws: Vec<RawDemerit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, person_id, offense_date, points, recorded_at
           FROM demerits
           WHERE person_id = ?1
           ORDER BY offense_date, recorded_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], |row| {
            Ok(RawDemerit {
              event_id:     row.get(0)?,
              person_id:    row.get(1)?,
              offense_date: row.get(2)?,
              points:       row.get(3)?,
              recorded_at:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDemerit::into_event).collect()
  }
}
