#![forbid(unsafe_code)]

use super::{EventStore, StoreError};
use cl_core::EventCategory;
use cl_core::ids::ProjectName;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    Updated { previous: String },
}

/// Records freshly generated event ids so later events can link back to them.
///
/// Every failure propagates: losing a record silently would break link
/// resolution for the key from then on.
#[derive(Clone, Debug)]
pub struct StateHandler {
    store: EventStore,
    project: ProjectName,
}

impl StateHandler {
    pub fn new(store: EventStore, project: ProjectName) -> Self {
        Self { store, project }
    }

    pub fn record(
        &self,
        category: EventCategory,
        key: &str,
        event_id: &str,
    ) -> Result<RecordOutcome, StoreError> {
        self.store.ensure_partition_dir(&self.project)?;

        let previous = self
            .store
            .table(category)
            .replace(&self.project, key, event_id)?;

        Ok(match previous {
            Some(previous) => {
                tracing::info!(
                    project = %self.project,
                    category = %category,
                    key,
                    previous = %previous,
                    event_id,
                    "updated last event id"
                );
                RecordOutcome::Updated { previous }
            }
            None => {
                tracing::info!(
                    project = %self.project,
                    category = %category,
                    key,
                    event_id,
                    "recorded first event id"
                );
                RecordOutcome::Inserted
            }
        })
    }

    /// Current id for `key`; `Ok(None)` only for a genuinely absent row.
    pub fn current(
        &self,
        category: EventCategory,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        match self.store.get(&self.project, category, key) {
            Ok(event_id) => Ok(Some(event_id)),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
