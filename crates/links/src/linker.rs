#![forbid(unsafe_code)]

use crate::generator::{created_event_links, submitted_event_links};
use crate::resolver::LinkResolver;
use cl_core::ids::ProjectName;
use cl_core::{CommitInformation, EventCategory, Link};
use cl_storage::{EventStore, RecordOutcome, StateHandler, StoreError};

/// Per-project entry point for event producers: compute links before an
/// event is sent, record its id once it has one.
pub struct EventLinker<C> {
    resolver: LinkResolver,
    state: StateHandler,
    commits: C,
}

impl<C: CommitInformation> EventLinker<C> {
    pub fn new(store: EventStore, project: ProjectName, commits: C) -> Self {
        Self {
            resolver: LinkResolver::new(store.clone(), project.clone()),
            state: StateHandler::new(store, project),
            commits,
        }
    }

    pub fn links_for_created(&self, change_id: &str, commit_id: &str) -> Vec<Link> {
        created_event_links(self.resolver.clone(), &self.commits, change_id, commit_id)
    }

    pub fn links_for_submitted(&self, change_id: &str, commit_id: &str) -> Vec<Link> {
        submitted_event_links(self.resolver.clone(), &self.commits, change_id, commit_id)
    }

    pub fn record_created(
        &self,
        change_id: &str,
        event_id: &str,
    ) -> Result<RecordOutcome, StoreError> {
        self.state
            .record(EventCategory::SourceChangeCreated, change_id, event_id)
    }

    /// `key` is whatever later ancestry searches will look up: a branch, or
    /// the submitted commit id.
    pub fn record_submitted(
        &self,
        key: &str,
        event_id: &str,
    ) -> Result<RecordOutcome, StoreError> {
        self.state
            .record(EventCategory::SourceChangeSubmitted, key, event_id)
    }
}
