#![forbid(unsafe_code)]

use cl_core::EventCategory;
use cl_core::ids::ProjectName;
use cl_storage::{EventStore, StoreError};

/// Finds the first previously recorded event id among ordered candidate keys.
#[derive(Clone, Debug)]
pub struct LinkResolver {
    store: EventStore,
    project: ProjectName,
}

impl LinkResolver {
    pub fn new(store: EventStore, project: ProjectName) -> Self {
        Self { store, project }
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    /// Returns the id stored for the first candidate that has one.
    ///
    /// Store failures only cost the candidate they happened on; event
    /// generation goes ahead with fewer links.
    pub fn resolve<S: AsRef<str>>(
        &self,
        category: EventCategory,
        candidates: &[S],
    ) -> Option<String> {
        let table = self.store.table(category);
        for candidate in candidates {
            let key = candidate.as_ref();
            match table.get(&self.project, key) {
                Ok(event_id) => {
                    tracing::debug!(
                        project = %self.project,
                        category = %category,
                        key,
                        event_id = %event_id,
                        "resolved link target"
                    );
                    return Some(event_id);
                }
                Err(StoreError::NotFound) => {
                    tracing::debug!(
                        project = %self.project,
                        category = %category,
                        key,
                        "no recorded event for candidate"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        project = %self.project,
                        category = %category,
                        key,
                        error = %err,
                        "lookup failed, skipping candidate"
                    );
                }
            }
        }
        None
    }

    /// [`LinkResolver::resolve`] for an untyped category tag. An unknown tag
    /// is a programming error and is returned, not swallowed.
    pub fn resolve_tag<S: AsRef<str>>(
        &self,
        tag: &str,
        candidates: &[S],
    ) -> Result<Option<String>, StoreError> {
        let category = self.store.table_for_tag(tag)?.category();
        Ok(self.resolve(category, candidates))
    }
}
