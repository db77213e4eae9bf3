//! [`Registry`]: registration, constrained update and demerit recording
//! over any [`RecordStore`].

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
  Error, Result, ValidationError,
  clock::{Clock, SystemClock},
  demerit::{self, DemeritEvent, DemeritOutcome, NewDemerit, Points},
  person::{NewPerson, Person},
  rules,
  store::RecordStore,
  validate,
};

/// The registry service. Holds an explicit store handle and clock; any number
/// of independent registries may coexist in one process.
///
/// Every read-modify-write sequence runs under an internal write lock, so
/// concurrent callers sharing one registry cannot interleave a lookup and
/// the write that depends on it. Plain reads take no lock.
pub struct Registry<S, C = SystemClock> {
  store:  S,
  clock:  C,
  writes: Mutex<()>,
}

impl<S: RecordStore> Registry<S> {
  pub fn new(store: S) -> Self { Self::with_clock(store, SystemClock) }
}

impl<S: RecordStore, C: Clock> Registry<S, C> {
  pub fn with_clock(store: S, clock: C) -> Self {
    Self { store, clock, writes: Mutex::new(()) }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn clock(&self) -> &C { &self.clock }

  // ── Registration ──────────────────────────────────────────────────────

  /// Validate and store a new person, not suspended.
  ///
  /// Fields are checked in order (identifier, address, birth date); the
  /// first failure aborts with nothing written.
  pub async fn register(&self, input: NewPerson) -> Result<Person> {
    let person = validate::person(&input).inspect_err(rejected)?;
    self.insert(person).await
  }

  /// Like [`Self::register`], but carries over a suspension flag from an
  /// external source such as a legacy data file.
  pub async fn import_person(
    &self,
    input: NewPerson,
    suspended: bool,
  ) -> Result<Person> {
    let mut person = validate::person(&input).inspect_err(rejected)?;
    person.suspended = suspended;
    self.insert(person).await
  }

  async fn insert(&self, person: Person) -> Result<Person> {
    let _guard = self.writes.lock().await;

    let created = self
      .store
      .create_record(person.clone())
      .await
      .map_err(storage_failure("create_record"))?;
    if !created {
      debug!(id = %person.id, "registration rejected: identifier taken");
      return Err(Error::AlreadyRegistered(person.id));
    }

    info!(id = %person.id, suspended = person.suspended, "person registered");
    Ok(person)
  }

  // ── Constrained update ────────────────────────────────────────────────

  /// Replace the record stored under `target_id` with `replacement`.
  ///
  /// The update rules are checked against the stored record first, then the
  /// replacement is re-validated in full. The suspension flag is always
  /// carried over from the stored record.
  pub async fn update(
    &self,
    target_id: &str,
    replacement: NewPerson,
  ) -> Result<Person> {
    let _guard = self.writes.lock().await;

    let stored = self.find(target_id).await?;

    rules::check_update(&stored, &replacement, self.clock.today()).inspect_err(
      |violation| debug!(id = %target_id, %violation, "update rejected"),
    )?;

    let mut updated = validate::person(&replacement).inspect_err(rejected)?;
    updated.suspended = stored.suspended;

    if updated.id != stored.id
      && self
        .store
        .find_record(&updated.id)
        .await
        .map_err(storage_failure("find_record"))?
        .is_some()
    {
      debug!(from = %stored.id, to = %updated.id, "update rejected: identifier taken");
      return Err(Error::AlreadyRegistered(updated.id));
    }

    let replaced = self
      .store
      .replace_record(&stored.id, updated.clone())
      .await
      .map_err(storage_failure("replace_record"))?;
    if !replaced {
      return Err(Error::NotFound(stored.id));
    }

    info!(from = %stored.id, to = %updated.id, "person updated");
    Ok(updated)
  }

  // ── Demerits ──────────────────────────────────────────────────────────

  /// Record an offense and re-evaluate the person's suspension.
  ///
  /// Once the date and points pass validation and the person is found, the
  /// event is always appended. Exceeding the threshold suspends a person who
  /// is not yet suspended; nothing ever lifts a suspension.
  ///
  /// The append and the suspension are two separate store writes. If the
  /// suspension write fails, this returns [`Error::Storage`] even though the
  /// event is already stored. The person stays unsuspended until a later
  /// offense for them is recorded and re-assessed.
  pub async fn record_demerit(
    &self,
    person_id: &str,
    offense_date: &str,
    points: i64,
  ) -> Result<DemeritOutcome> {
    let offense_date = validate::date(offense_date)
      .ok_or_else(|| ValidationError::OffenseDate(offense_date.to_owned()))
      .inspect_err(rejected)?;
    let points = Points::new(points)
      .ok_or(ValidationError::Points(points))
      .inspect_err(rejected)?;

    let _guard = self.writes.lock().await;

    let person = self.find(person_id).await?;
    let history = self
      .store
      .demerit_events_for(person_id)
      .await
      .map_err(storage_failure("demerit_events_for"))?;

    let assessment =
      demerit::assess(person.birth_date, offense_date, points, &history);

    let event = self
      .store
      .append_demerit_event(NewDemerit {
        person_id: person.id.clone(),
        offense_date,
        points,
      })
      .await
      .map_err(storage_failure("append_demerit_event"))?;
    debug!(
      id = %person.id,
      points = points.get(),
      window_total = assessment.window_total,
      threshold = assessment.threshold,
      "demerit recorded"
    );

    let newly_suspended = assessment.exceeds_threshold() && !person.suspended;
    if newly_suspended {
      let id = person.id.clone();
      let suspended = Person { suspended: true, ..person.clone() };
      let replaced = self
        .store
        .replace_record(&id, suspended)
        .await
        .map_err(storage_failure("replace_record"))?;
      if !replaced {
        return Err(Error::NotFound(id));
      }
      info!(
        id = %id,
        window_total = assessment.window_total,
        threshold = assessment.threshold,
        "person suspended"
      );
    }

    Ok(DemeritOutcome {
      event,
      assessment,
      suspended: person.suspended || newly_suspended,
      newly_suspended,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn person(&self, id: &str) -> Result<Person> { self.find(id).await }

  /// Every registered person, ordered by identifier.
  pub async fn people(&self) -> Result<Vec<Person>> {
    self
      .store
      .list_records()
      .await
      .map_err(storage_failure("list_records"))
  }

  /// Every event recorded under `id`, oldest offense first. Events outlive
  /// identifier changes, so no person record is required.
  pub async fn demerits(&self, id: &str) -> Result<Vec<DemeritEvent>> {
    let mut events = self
      .store
      .demerit_events_for(id)
      .await
      .map_err(storage_failure("demerit_events_for"))?;
    events.sort_by(|a, b| {
      a.offense_date
        .cmp(&b.offense_date)
        .then(a.recorded_at.cmp(&b.recorded_at))
    });
    Ok(events)
  }

  async fn find(&self, id: &str) -> Result<Person> {
    self
      .store
      .find_record(id)
      .await
      .map_err(storage_failure("find_record"))?
      .ok_or_else(|| {
        debug!(id = %id, "person not found");
        Error::NotFound(id.to_owned())
      })
  }
}

fn rejected(e: &ValidationError) {
  debug!(error = %e, "validation rejected");
}

/// Wrap a backend error, logging it apart from business-rule rejections.
fn storage_failure<E>(op: &'static str) -> impl FnOnce(E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |e| {
    error!(op, error = %e, "record store failure");
    Error::Storage(Box::new(e))
  }
}
