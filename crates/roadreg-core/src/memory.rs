//! [`MemoryStore`]: a [`RecordStore`] held entirely in process memory.
//!
//! Each instance is an independent registry, which makes it the store of
//! choice for tests.

use std::{
  collections::BTreeMap,
  sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  demerit::{DemeritEvent, NewDemerit},
  person::Person,
  store::RecordStore,
};

#[derive(Debug, Error)]
#[error("memory store lock poisoned")]
pub struct PoisonedError;

#[derive(Debug, Default)]
struct Tables {
  persons:  BTreeMap<String, Person>,
  demerits: Vec<DemeritEvent>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn tables(&self) -> Result<MutexGuard<'_, Tables>, PoisonedError> {
    self.tables.lock().map_err(|_| PoisonedError)
  }
}

impl RecordStore for MemoryStore {
  type Error = PoisonedError;

  async fn create_record(&self, record: Person) -> Result<bool, PoisonedError> {
    let mut t = self.tables()?;
    if t.persons.contains_key(&record.id) {
      return Ok(false);
    }
    t.persons.insert(record.id.clone(), record);
    Ok(true)
  }

  async fn find_record(&self, id: &str) -> Result<Option<Person>, PoisonedError> {
    Ok(self.tables()?.persons.get(id).cloned())
  }

  async fn replace_record(
    &self,
    id: &str,
    record: Person,
  ) -> Result<bool, PoisonedError> {
    let mut t = self.tables()?;
    if !t.persons.contains_key(id) {
      return Ok(false);
    }
    if record.id != id && t.persons.contains_key(&record.id) {
      return Ok(false);
    }
    t.persons.remove(id);
    t.persons.insert(record.id.clone(), record);
    Ok(true)
  }

  async fn list_records(&self) -> Result<Vec<Person>, PoisonedError> {
    Ok(self.tables()?.persons.values().cloned().collect())
  }

  async fn append_demerit_event(
    &self,
    input: NewDemerit,
  ) -> Result<DemeritEvent, PoisonedError> {
    let event = DemeritEvent {
      event_id:     Uuid::new_v4(),
      person_id:    input.person_id,
      offense_date: input.offense_date,
      points:       input.points,
      recorded_at:  Utc::now(),
    };
    self.tables()?.demerits.push(event.clone());
    Ok(event)
  }

  async fn demerit_events_for(
    &self,
    id: &str,
  ) -> Result<Vec<DemeritEvent>, PoisonedError> {
    Ok(
      self
        .tables()?
        .demerits
        .iter()
        .filter(|e| e.person_id == id)
        .cloned()
        .collect(),
    )
  }
}
