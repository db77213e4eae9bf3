//! Demerit events and the suspension decision.
//!
//! A new offense is weighed together with every recorded offense for the
//! same person dated within the two years up to and including it. If the
//! total exceeds the age-dependent threshold, the person is suspended.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Points ──────────────────────────────────────────────────────────────────

/// A demerit point value, always in `1..=6`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Points(u8);

impl Points {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 6;

  /// Returns `None` outside `1..=6`.
  pub fn new(value: i64) -> Option<Self> {
    u8::try_from(value)
      .ok()
      .filter(|v| (Self::MIN..=Self::MAX).contains(v))
      .map(Self)
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for Points {
  type Error = String;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    Self::new(value).ok_or_else(|| format!("points out of range: {value}"))
  }
}

impl From<Points> for i64 {
  fn from(p: Points) -> Self { i64::from(p.0) }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A recorded offense. Events are append-only and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemeritEvent {
  pub event_id:     Uuid,
  pub person_id:    String,
  pub offense_date: NaiveDate,
  pub points:       Points,
  /// Store-assigned timestamp; never changes after creation.
  pub recorded_at:  DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::append_demerit_event`].
/// `event_id` and `recorded_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDemerit {
  pub person_id:    String,
  pub offense_date: NaiveDate,
  pub points:       Points,
}

// ─── Assessment ──────────────────────────────────────────────────────────────

/// Length of the rolling window, in years.
pub const WINDOW_YEARS: u32 = 2;

/// Drivers younger than this at the time of an offense get the lower
/// threshold.
pub const YOUNG_DRIVER_AGE: i32 = 21;

pub const YOUNG_DRIVER_THRESHOLD: u32 = 6;
pub const ADULT_THRESHOLD: u32 = 12;

/// First day of the inclusive window ending at `offense_date`. Feb 29th
/// steps back to Feb 28th when the target year has none.
pub fn window_start(offense_date: NaiveDate) -> NaiveDate {
  offense_date
    .checked_sub_months(Months::new(12 * WINDOW_YEARS))
    .unwrap_or(NaiveDate::MIN)
}

pub fn threshold_for_age(age: i32) -> u32 {
  if age < YOUNG_DRIVER_AGE {
    YOUNG_DRIVER_THRESHOLD
  } else {
    ADULT_THRESHOLD
  }
}

/// The numbers behind a suspension decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
  /// Offense year minus birth year.
  pub age_at_offense: i32,
  /// Points of the new offense plus every prior offense in the window.
  pub window_total:   u32,
  pub threshold:      u32,
}

impl Assessment {
  pub fn exceeds_threshold(&self) -> bool { self.window_total > self.threshold }
}

/// Weigh a new offense against `history`, which must not yet contain it.
///
/// History events dated after `offense_date` fall outside the window and
/// are ignored.
pub fn assess(
  birth_date: NaiveDate,
  offense_date: NaiveDate,
  points: Points,
  history: &[DemeritEvent],
) -> Assessment {
  let age_at_offense = offense_date.year() - birth_date.year();
  let from = window_start(offense_date);

  let prior: u32 = history
    .iter()
    .filter(|e| (from..=offense_date).contains(&e.offense_date))
    .map(|e| u32::from(e.points.get()))
    .sum();

  Assessment {
    age_at_offense,
    window_total: prior + u32::from(points.get()),
    threshold: threshold_for_age(age_at_offense),
  }
}

/// What [`crate::Registry::record_demerit`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemeritOutcome {
  pub event:           DemeritEvent,
  pub assessment:      Assessment,
  /// The person's suspension status after this call.
  pub suspended:       bool,
  /// Whether this call is the one that suspended them.
  pub newly_suspended: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn event(date: NaiveDate, points: i64) -> DemeritEvent {
    DemeritEvent {
      event_id:     Uuid::new_v4(),
      person_id:    "34$%abXYZA".into(),
      offense_date: date,
      points:       Points::new(points).unwrap(),
      recorded_at:  Utc::now(),
    }
  }

  #[test]
  fn points_range() {
    assert!(Points::new(0).is_none());
    assert!(Points::new(7).is_none());
    assert!(Points::new(-1).is_none());
    assert!(Points::new(i64::MAX).is_none());
    assert_eq!(Points::new(1).map(Points::get), Some(1));
    assert_eq!(Points::new(6).map(Points::get), Some(6));
  }

  #[test]
  fn thresholds() {
    assert_eq!(threshold_for_age(16), 6);
    assert_eq!(threshold_for_age(20), 6);
    assert_eq!(threshold_for_age(21), 12);
  }

  #[test]
  fn window_start_handles_leap_day() {
    assert_eq!(window_start(ymd(2024, 12, 1)), ymd(2022, 12, 1));
    assert_eq!(window_start(ymd(2024, 2, 29)), ymd(2022, 2, 28));
  }

  #[test]
  fn young_driver_over_threshold() {
    let history = [event(ymd(2023, 1, 1), 4), event(ymd(2024, 6, 1), 3)];
    let a = assess(
      ymd(2005, 1, 1),
      ymd(2024, 12, 1),
      Points::new(2).unwrap(),
      &history,
    );
    assert_eq!(a.age_at_offense, 19);
    assert_eq!(a.threshold, 6);
    assert_eq!(a.window_total, 9);
    assert!(a.exceeds_threshold());
  }

  #[test]
  fn total_equal_to_threshold_does_not_exceed() {
    let history = [event(ymd(2024, 1, 1), 4)];
    let a = assess(
      ymd(2005, 1, 1),
      ymd(2024, 6, 1),
      Points::new(2).unwrap(),
      &history,
    );
    assert_eq!(a.window_total, 6);
    assert!(!a.exceeds_threshold());
  }

  #[test]
  fn window_bounds_are_inclusive() {
    let history = [
      event(ymd(2022, 12, 1), 5), // first day of window
      event(ymd(2022, 11, 30), 6), // one day too old
      event(ymd(2024, 12, 2), 6), // after the offense
    ];
    let a = assess(
      ymd(1990, 1, 1),
      ymd(2024, 12, 1),
      Points::new(1).unwrap(),
      &history,
    );
    assert_eq!(a.window_total, 6);
    assert_eq!(a.threshold, 12);
  }

  #[test]
  fn adult_threshold_uses_offense_year() {
    // 2004 birth, 2025 offense: 21 by year subtraction even on Jan 1st.
    let history = [event(ymd(2024, 6, 1), 6), event(ymd(2024, 7, 1), 3)];
    let a = assess(
      ymd(2004, 12, 31),
      ymd(2025, 1, 1),
      Points::new(1).unwrap(),
      &history,
    );
    assert_eq!(a.age_at_offense, 21);
    assert_eq!(a.window_total, 10);
    assert!(!a.exceeds_threshold());
  }
}
