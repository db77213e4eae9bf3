//! The constrained-update policy.
//!
//! An update replaces a stored record wholesale, but only if it passes three
//! rules evaluated against the *stored* record, in order:
//!
//! 1. A person under 18 cannot change address.
//! 2. A birth date change must leave every other field unchanged.
//! 3. An identifier whose first digit is even cannot change.
//!
//! Format re-validation of the replacement happens after these rules, in
//! [`crate::validate::person`].

use chrono::{Datelike, NaiveDate};

use crate::{RuleViolation, person::{NewPerson, Person}, validate};

/// Below this age a person's address is locked.
pub const ADULT_AGE: i32 = 18;

/// Age by bare year subtraction. Day and month are ignored, so someone born
/// in December counts a full year older from January 1st.
pub fn age_in_years(birth_date: NaiveDate, on: NaiveDate) -> i32 {
  on.year() - birth_date.year()
}

/// Whether `id` may never be changed: its first character is an even digit.
pub fn identifier_locked(id: &str) -> bool {
  id.chars()
    .next()
    .and_then(|c| c.to_digit(10))
    .is_some_and(|d| d % 2 == 0)
}

/// Check `replacement` against `stored`. Textual fields are compared with
/// the stored record's canonical rendering.
pub fn check_update(
  stored: &Person,
  replacement: &NewPerson,
  today: NaiveDate,
) -> Result<(), RuleViolation> {
  let address_changed = replacement.address != stored.address.to_string();
  let id_changed = replacement.id != stored.id;

  let age = age_in_years(stored.birth_date, today);
  if age < ADULT_AGE && address_changed {
    return Err(RuleViolation::MinorAddressChange { age });
  }

  if replacement.birth_date != validate::format_date(stored.birth_date) {
    let others_changed = id_changed
      || replacement.first_name != stored.first_name
      || replacement.last_name != stored.last_name
      || address_changed;
    if others_changed {
      return Err(RuleViolation::BirthDateNotIsolated);
    }
  }

  if id_changed && identifier_locked(&stored.id) {
    return Err(RuleViolation::IdentifierLocked);
  }

  Ok(())
}
