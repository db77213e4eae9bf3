//! Injectable source of "today".
//!
//! Age checks use bare year subtraction against the current date, so any
//! test that touches them pins the date with a [`FixedClock`].

use chrono::{Local, NaiveDate};

/// Abstraction over the current calendar date.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// The local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.0 }
}
