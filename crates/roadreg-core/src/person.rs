//! Person records and their structured address.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator between the five address subfields in textual form.
pub const ADDRESS_DELIMITER: char = '|';

/// The only state an address may be registered in.
pub const REQUIRED_STATE: &str = "Victoria";

// ─── Address ─────────────────────────────────────────────────────────────────

/// A postal address. Logically one attribute, stored as five ordered parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub street_number: String,
  pub street:        String,
  pub city:          String,
  pub state:         String,
  pub country:       String,
}

/// Split `raw` on [`ADDRESS_DELIMITER`], dropping trailing empty fields.
///
/// Leading and inner empty fields are kept, so `"a||b|"` yields
/// `["a", "", "b"]`.
pub fn split_fields(raw: &str) -> Vec<&str> {
  let mut fields: Vec<&str> = raw.split(ADDRESS_DELIMITER).collect();
  while fields.last().is_some_and(|f| f.is_empty()) {
    fields.pop();
  }
  fields
}

impl Address {
  /// Split a `|`-delimited address into its parts. Returns `None` unless the
  /// text holds exactly five subfields once trailing empty ones are dropped.
  /// The state is not checked here.
  pub fn split(raw: &str) -> Option<Self> {
    let [street_number, street, city, state, country] = split_fields(raw)[..]
    else {
      return None;
    };
    Some(Self {
      street_number: street_number.to_owned(),
      street:        street.to_owned(),
      city:          city.to_owned(),
      state:         state.to_owned(),
      country:       country.to_owned(),
    })
  }
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let d = ADDRESS_DELIMITER;
    write!(
      f,
      "{}{d}{}{d}{}{d}{}{d}{}",
      self.street_number, self.street, self.city, self.state, self.country
    )
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A stored, validated person record.
///
/// `suspended` is cached state derived from the person's demerit history. It
/// only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub address:    Address,
  pub birth_date: NaiveDate,
  #[serde(default)]
  pub suspended:  bool,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Caller-supplied input to [`crate::Registry::register`] and
/// [`crate::Registry::update`], in textual form.
///
/// The address is `|`-delimited and the birth date is `DD-MM-YYYY`. The
/// suspended flag is never accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub address:    String,
  pub birth_date: String,
}

impl NewPerson {
  pub fn new(
    id: impl Into<String>,
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    address: impl Into<String>,
    birth_date: impl Into<String>,
  ) -> Self {
    Self {
      id:         id.into(),
      first_name: first_name.into(),
      last_name:  last_name.into(),
      address:    address.into(),
      birth_date: birth_date.into(),
    }
  }
}

impl From<&Person> for NewPerson {
  fn from(p: &Person) -> Self {
    Self {
      id:         p.id.clone(),
      first_name: p.first_name.clone(),
      last_name:  p.last_name.clone(),
      address:    p.address.to_string(),
      birth_date: crate::validate::format_date(p.birth_date),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_requires_exactly_five_parts() {
    assert!(Address::split("1|King St|Melbourne|Victoria").is_none());
    assert!(Address::split("1|King St|Melbourne|Victoria|Australia|3000").is_none());

    let a = Address::split("1|King St|Melbourne|Victoria|Australia").unwrap();
    assert_eq!(a.street, "King St");
    assert_eq!(a.state, "Victoria");
  }

  #[test]
  fn trailing_empty_parts_are_dropped() {
    assert!(Address::split("1|King St|Melbourne|Victoria|").is_none());
    assert!(Address::split("1|King St|Melbourne|Victoria||").is_none());

    let a = Address::split("1|King St|Melbourne|Victoria|Australia|").unwrap();
    assert_eq!(a.country, "Australia");
    assert!(Address::split("1|King St|Melbourne|Victoria|Australia||").is_some());
  }

  #[test]
  fn inner_and_leading_empty_parts_are_kept() {
    assert_eq!(split_fields("a||b|"), ["a", "", "b"]);
    assert_eq!(split_fields("|a"), ["", "a"]);
    assert!(split_fields("|||").is_empty());

    let a = Address::split("|King St||Victoria|Australia").unwrap();
    assert_eq!(a.street_number, "");
    assert_eq!(a.city, "");
  }

  #[test]
  fn display_rejoins_parts() {
    let raw = "20|King St|Melbourne|Victoria|Australia";
    assert_eq!(Address::split(raw).unwrap().to_string(), raw);
  }
}
