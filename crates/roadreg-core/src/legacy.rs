//! Import from the legacy pipe-delimited data files.
//!
//! `persons.txt` holds one person per line:
//!
//! ```text
//! id|first|last|<number>|<street>|<city>|<state>|<country>|DD-MM-YYYY|true
//! ```
//!
//! The address is stored verbatim with its own `|` separators, so a line is
//! read from both ends: the first three tokens are identifier and names, the
//! last two are birth date and suspension flag, and everything between is the
//! address. `demerits.txt` holds `id|DD-MM-YYYY|points` per line.
//!
//! Every line goes through the normal validation path. Rejected lines are
//! reported, not fatal.

use serde::Serialize;
use thiserror::Error;

use crate::{
  Registry,
  clock::Clock,
  person::{ADDRESS_DELIMITER, NewPerson, split_fields},
  store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("expected at least {expected} fields, found {found}")]
  TooFewFields { expected: usize, found: usize },

  #[error("expected {expected} fields, found {found}")]
  FieldCount { expected: usize, found: usize },

  #[error("points are not an integer: {0:?}")]
  Points(String),
}

/// One line of `persons.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPerson {
  pub person:    NewPerson,
  pub suspended: bool,
}

/// One line of `demerits.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyDemerit {
  pub person_id:    String,
  pub offense_date: String,
  pub points:       i64,
}

pub fn parse_person_line(line: &str) -> Result<LegacyPerson, ParseError> {
  let tokens = split_fields(line);
  let n = tokens.len();
  // id, first, last, at least one address token, birth date, suspended
  if n < 6 {
    return Err(ParseError::TooFewFields { expected: 6, found: n });
  }

  let address = tokens[3..n - 2].join(ADDRESS_DELIMITER.to_string().as_str());
  Ok(LegacyPerson {
    person:    NewPerson::new(
      tokens[0],
      tokens[1],
      tokens[2],
      address,
      tokens[n - 2],
    ),
    suspended: tokens[n - 1].eq_ignore_ascii_case("true"),
  })
}

pub fn parse_demerit_line(line: &str) -> Result<LegacyDemerit, ParseError> {
  let tokens = split_fields(line);
  let [person_id, offense_date, points] = tokens[..] else {
    return Err(ParseError::FieldCount { expected: 3, found: tokens.len() });
  };

  let points = points
    .parse()
    .map_err(|_| ParseError::Points(points.to_owned()))?;
  Ok(LegacyDemerit {
    person_id: person_id.to_owned(),
    offense_date: offense_date.to_owned(),
    points,
  })
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyFile {
  Persons,
  Demerits,
}

/// A line that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
  pub file:   LegacyFile,
  /// 1-based line number.
  pub line:   usize,
  pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub persons:  usize,
  pub demerits: usize,
  pub rejected: Vec<Rejected>,
}

/// Import the contents of `persons.txt` and, optionally, `demerits.txt`.
///
/// Persons are imported first. Demerits are replayed in file order through
/// [`Registry::record_demerit`], so suspensions are re-derived as they would
/// have been when first recorded. Blank lines are skipped.
///
/// Storage failures abort the import; every other error rejects one line.
pub async fn import<S, C>(
  registry: &Registry<S, C>,
  persons: &str,
  demerits: Option<&str>,
) -> crate::Result<ImportReport>
where
  S: RecordStore,
  C: Clock,
{
  let mut report = ImportReport::default();

  for (idx, line) in numbered(persons) {
    let reject = |reason: String| Rejected {
      file: LegacyFile::Persons,
      line: idx,
      reason,
    };
    let parsed = match parse_person_line(line) {
      Ok(p) => p,
      Err(e) => {
        report.rejected.push(reject(e.to_string()));
        continue;
      }
    };
    match registry.import_person(parsed.person, parsed.suspended).await {
      Ok(_) => report.persons += 1,
      Err(e) if e.is_storage() => return Err(e),
      Err(e) => report.rejected.push(reject(e.to_string())),
    }
  }

  for (idx, line) in numbered(demerits.unwrap_or_default()) {
    let reject = |reason: String| Rejected {
      file: LegacyFile::Demerits,
      line: idx,
      reason,
    };
    let parsed = match parse_demerit_line(line) {
      Ok(d) => d,
      Err(e) => {
        report.rejected.push(reject(e.to_string()));
        continue;
      }
    };
    match registry
      .record_demerit(&parsed.person_id, &parsed.offense_date, parsed.points)
      .await
    {
      Ok(_) => report.demerits += 1,
      Err(e) if e.is_storage() => return Err(e),
      Err(e) => report.rejected.push(reject(e.to_string())),
    }
  }

  Ok(report)
}

fn numbered(text: &str) -> impl Iterator<Item = (usize, &str)> {
  text
    .lines()
    .enumerate()
    .map(|(i, l)| (i + 1, l))
    .filter(|(_, l)| !l.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn person_line_rebuilds_address() {
    let p = parse_person_line(
      "34$%abXYZA|Tom|Jones|20|King St|Melbourne|Victoria|Australia|01-01-2005|false",
    )
    .unwrap();
    assert_eq!(p.person.id, "34$%abXYZA");
    assert_eq!(p.person.last_name, "Jones");
    assert_eq!(p.person.address, "20|King St|Melbourne|Victoria|Australia");
    assert_eq!(p.person.birth_date, "01-01-2005");
    assert!(!p.suspended);
  }

  #[test]
  fn person_line_suspended_flag() {
    let p = parse_person_line("a|b|c|addr|01-01-2005|TRUE").unwrap();
    assert!(p.suspended);
    assert_eq!(p.person.address, "addr");

    let p = parse_person_line("a|b|c|addr|01-01-2005|yes").unwrap();
    assert!(!p.suspended);
  }

  #[test]
  fn suspended_flag_is_not_trimmed() {
    let p = parse_person_line("a|b|c|addr|01-01-2005| true").unwrap();
    assert!(!p.suspended);
    let p = parse_person_line("a|b|c|addr|01-01-2005|true ").unwrap();
    assert!(!p.suspended);
  }

  #[test]
  fn trailing_empty_tokens_are_dropped() {
    // The empty tail is discarded before birth date and flag are located.
    let p = parse_person_line(
      "34$%abXYZA|Tom|Jones|20|King St|Melbourne|Victoria|Australia|01-01-2005|true||",
    )
    .unwrap();
    assert_eq!(p.person.address, "20|King St|Melbourne|Victoria|Australia");
    assert_eq!(p.person.birth_date, "01-01-2005");
    assert!(p.suspended);

    let d = parse_demerit_line("34$%abXYZA|01-06-2024|3|").unwrap();
    assert_eq!(d.points, 3);
  }

  #[test]
  fn person_line_too_short() {
    assert_eq!(
      parse_person_line("a|b|c|01-01-2005|false"),
      Err(ParseError::TooFewFields { expected: 6, found: 5 })
    );
  }

  #[test]
  fn demerit_line() {
    let d = parse_demerit_line("34$%abXYZA|01-06-2024|3").unwrap();
    assert_eq!(d.person_id, "34$%abXYZA");
    assert_eq!(d.offense_date, "01-06-2024");
    assert_eq!(d.points, 3);

    assert_eq!(
      parse_demerit_line("34$%abXYZA|01-06-2024"),
      Err(ParseError::FieldCount { expected: 3, found: 2 })
    );
    assert_eq!(
      parse_demerit_line("34$%abXYZA|01-06-2024|three"),
      Err(ParseError::Points("three".into()))
    );
    assert_eq!(
      parse_demerit_line("34$%abXYZA|01-06-2024| 3"),
      Err(ParseError::Points(" 3".into()))
    );
  }
}
