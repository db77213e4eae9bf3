//! Dispatch of parsed subcommands onto the registry.

use std::{fs, path::Path};

use anyhow::Context as _;
use roadreg_core::{Registry, clock::Clock, legacy, store::RecordStore};
use serde_json::Value;

use crate::Command;

/// Run one command and return its result as JSON.
///
/// Registry rejections are returned as [`roadreg_core::Error`] inside the
/// `anyhow` error so the caller can report their kind.
pub async fn run<S, C>(
  registry: &Registry<S, C>,
  command: Command,
) -> anyhow::Result<Value>
where
  S: RecordStore,
  C: Clock,
{
  let value = match command {
    Command::Register(person) => {
      serde_json::to_value(registry.register(person.into()).await?)?
    }
    Command::Update { target, person } => {
      serde_json::to_value(registry.update(&target, person.into()).await?)?
    }
    Command::Demerit { id, offense_date, points } => serde_json::to_value(
      registry.record_demerit(&id, &offense_date, points).await?,
    )?,
    Command::Show { id } => serde_json::to_value(registry.person(&id).await?)?,
    Command::List => serde_json::to_value(registry.people().await?)?,
    Command::Demerits { id } => {
      serde_json::to_value(registry.demerits(&id).await?)?
    }
    Command::Import { persons, demerits } => {
      let persons = read(&persons)?;
      let demerits = demerits.as_deref().map(read).transpose()?;
      let report =
        legacy::import(registry, &persons, demerits.as_deref()).await?;
      tracing::info!(
        persons = report.persons,
        demerits = report.demerits,
        rejected = report.rejected.len(),
        "legacy import finished"
      );
      serde_json::to_value(report)?
    }
  };
  Ok(value)
}

fn read(path: &Path) -> anyhow::Result<String> {
  fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
