//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roadreg-store-sqlite`,
//! or [`crate::memory::MemoryStore`]). The [`crate::Registry`] depends on this
//! abstraction only and never assumes a persistence technology.

use std::future::Future;

use crate::{
  demerit::{DemeritEvent, NewDemerit},
  person::Person,
};

/// Key-value persistence of person records plus an append-only demerit log,
/// both keyed by person identifier.
///
/// Stores perform no validation of their own; they persist what they are
/// given. Read-modify-write sequences are serialised by the caller.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Persist a new record under `record.id`. Returns `false`, writing
  /// nothing, if that identifier is already taken.
  fn create_record(
    &self,
    record: Person,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a record by identifier. Returns `None` if not found.
  fn find_record<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Overwrite the record stored under `id` with `record`, re-keying it if
  /// `record.id` differs. Returns `false`, writing nothing, if nothing is
  /// stored under `id` or if the new identifier is already taken.
  fn replace_record<'a>(
    &'a self,
    id: &'a str,
    record: Person,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Every stored record, ordered by identifier.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Demerits (append-only) ────────────────────────────────────────────

  /// Append an event and return it as persisted. `event_id` and
  /// `recorded_at` are assigned by the store.
  fn append_demerit_event(
    &self,
    input: NewDemerit,
  ) -> impl Future<Output = Result<DemeritEvent, Self::Error>> + Send + '_;

  /// Every event recorded for `id`, in no particular order. Events are
  /// matched by identifier alone; a record need not exist for them.
  fn demerit_events_for<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Vec<DemeritEvent>, Self::Error>> + Send + 'a;
}
