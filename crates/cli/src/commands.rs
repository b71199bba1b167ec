#![forbid(unsafe_code)]

use crate::config::{CliConfig, Command, EventKind};
use cl_core::{CommitInformation, EventCategory};
use cl_links::{EventLinker, LinkResolver};
use cl_storage::{EventStore, RecordOutcome, StoreError};
use serde_json::{Value, json};

pub(crate) fn execute<C: CommitInformation>(
    cfg: &CliConfig,
    commits: C,
) -> Result<Value, StoreError> {
    let store = EventStore::new(&cfg.data_dir);
    let project = &cfg.project;

    match &cfg.command {
        Command::Get { category, key } => {
            let event_id = store.get(project, *category, key)?;
            Ok(json!({
                "project": project.as_str(),
                "category": category.as_tag(),
                "key": key,
                "event_id": event_id,
            }))
        }
        Command::Record {
            category,
            key,
            event_id,
        } => {
            let linker = EventLinker::new(store, project.clone(), commits);
            let outcome = match category {
                EventCategory::SourceChangeCreated => linker.record_created(key, event_id)?,
                EventCategory::SourceChangeSubmitted => {
                    linker.record_submitted(key, event_id)?
                }
            };
            let (outcome, previous) = match outcome {
                RecordOutcome::Inserted => ("inserted", None),
                RecordOutcome::Updated { previous } => ("updated", Some(previous)),
            };
            let mut report = json!({
                "project": project.as_str(),
                "category": category.as_tag(),
                "key": key,
                "event_id": event_id,
                "outcome": outcome,
            });
            if let Some(previous) = previous {
                report["previous"] = Value::String(previous);
            }
            Ok(report)
        }
        Command::Dump { category } => {
            let entries = store.table(*category).entries(project)?;
            let entries = entries
                .into_iter()
                .map(|entry| json!({ "key": entry.key, "event_id": entry.event_id }))
                .collect::<Vec<_>>();
            Ok(json!({
                "project": project.as_str(),
                "category": category.as_tag(),
                "entries": entries,
            }))
        }
        Command::Resolve { tag, keys } => {
            let resolver = LinkResolver::new(store, project.clone());
            let event_id = resolver.resolve_tag(tag, keys.as_slice())?;
            Ok(json!({
                "project": project.as_str(),
                "category": tag,
                "event_id": event_id,
            }))
        }
        Command::Links {
            kind,
            change_id,
            commit_id,
        } => {
            let linker = EventLinker::new(store, project.clone(), commits);
            let links = match kind {
                EventKind::Created => linker.links_for_created(change_id, commit_id),
                EventKind::Submitted => linker.links_for_submitted(change_id, commit_id),
            };
            Ok(json!({
                "project": project.as_str(),
                "links": links,
            }))
        }
    }
}
