//! Pure format validators for identifiers, addresses and dates.
//!
//! Validators never panic and never return errors of their own; a value that
//! cannot be parsed is simply invalid.

use chrono::NaiveDate;

use crate::{
  ValidationError,
  person::{Address, NewPerson, Person, REQUIRED_STATE},
};

/// Identifier length, in characters.
pub const ID_LEN: usize = 10;

/// Minimum number of characters that are neither ASCII letters nor digits.
pub const ID_MIN_SPECIALS: usize = 2;

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Check an identifier: exactly ten characters, the first two digits in
/// `2..=9`, the last two uppercase ASCII letters, and at least two characters
/// anywhere that are not ASCII letters or digits.
pub fn identifier(id: &str) -> bool {
  let chars: Vec<char> = id.chars().collect();
  if chars.len() != ID_LEN || chars.iter().copied().any(is_line_break) {
    return false;
  }

  let leading = chars[..2].iter().all(|c| ('2'..='9').contains(c));
  let trailing = chars[ID_LEN - 2..].iter().all(char::is_ascii_uppercase);
  let specials = chars.iter().filter(|c| !c.is_ascii_alphanumeric()).count();

  leading && trailing && specials >= ID_MIN_SPECIALS
}

fn is_line_break(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Parse a `|`-delimited address with exactly five parts whose state is
/// [`REQUIRED_STATE`].
pub fn address(raw: &str) -> Option<Address> {
  Address::split(raw).filter(|a| a.state == REQUIRED_STATE)
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a strict `DD-MM-YYYY` calendar date.
///
/// Day and month must be two digits and the year four. Out-of-range days are
/// rejected, never rolled into the next month.
pub fn date(raw: &str) -> Option<NaiveDate> {
  let bytes = raw.as_bytes();
  if bytes.len() != 10 || bytes[2] != b'-' || bytes[5] != b'-' {
    return None;
  }

  let number = |from: usize, to: usize| -> Option<u32> {
    let field = raw.get(from..to)?;
    if !field.bytes().all(|b| b.is_ascii_digit()) {
      return None;
    }
    field.parse().ok()
  };

  let day = number(0, 2)?;
  let month = number(3, 5)?;
  let year = number(6, 10)?;
  NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Render a date in the `DD-MM-YYYY` form accepted by [`date`].
pub fn format_date(d: NaiveDate) -> String { d.format("%d-%m-%Y").to_string() }

// ─── Person ──────────────────────────────────────────────────────────────────

/// Validate every formatted field of `input`, in order: identifier, address,
/// birth date. The first failure wins.
///
/// The returned record is not suspended; callers that carry a suspension
/// flag over set it themselves.
pub fn person(input: &NewPerson) -> Result<Person, ValidationError> {
  if !identifier(&input.id) {
    return Err(ValidationError::Identifier(input.id.clone()));
  }
  let address = address(&input.address)
    .ok_or_else(|| ValidationError::Address(input.address.clone()))?;
  let birth_date = date(&input.birth_date)
    .ok_or_else(|| ValidationError::BirthDate(input.birth_date.clone()))?;

  Ok(Person {
    id: input.id.clone(),
    first_name: input.first_name.clone(),
    last_name: input.last_name.clone(),
    address,
    birth_date,
    suspended: false,
  })
}
