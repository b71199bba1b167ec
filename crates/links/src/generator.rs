#![forbid(unsafe_code)]

use crate::resolver::LinkResolver;
use cl_core::{CommitInformation, EventCategory, Link, LinkType};

/// Accumulates the links of one newly generated event.
///
/// Each `add_*` call appends at most one link and is a no-op when nothing is
/// recorded for its candidates. Links keep the order of the calls.
pub struct LinkGenerator<C> {
    resolver: LinkResolver,
    commits: C,
    links: Vec<Link>,
}

impl<C: CommitInformation> LinkGenerator<C> {
    pub fn new(resolver: LinkResolver, commits: C) -> Self {
        Self {
            resolver,
            commits,
            links: Vec::new(),
        }
    }

    /// Earlier creation event (patch set) of the same change.
    pub fn add_created_previous_version(&mut self, change_id: &str) -> &mut Self {
        self.push_resolved(
            LinkType::PreviousVersion,
            EventCategory::SourceChangeCreated,
            &[change_id],
        )
    }

    /// Submission event of the first parent of `commit_id` that has one.
    pub fn add_submitted_previous_version(&mut self, commit_id: &str) -> &mut Self {
        let parents = self.parents_of(commit_id);
        self.push_resolved(
            LinkType::PreviousVersion,
            EventCategory::SourceChangeSubmitted,
            parents.as_slice(),
        )
    }

    /// Submission event of the commit a new change was based on.
    pub fn add_created_base(&mut self, commit_id: &str) -> &mut Self {
        let parents = self.parents_of(commit_id);
        self.push_resolved(
            LinkType::Base,
            EventCategory::SourceChangeSubmitted,
            parents.as_slice(),
        )
    }

    /// Creation event of the change being submitted.
    pub fn add_submitted_change(&mut self, change_id: &str) -> &mut Self {
        self.push_resolved(
            LinkType::Change,
            EventCategory::SourceChangeCreated,
            &[change_id],
        )
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn generate_links(self) -> Vec<Link> {
        self.links
    }

    fn parents_of(&self, commit_id: &str) -> Vec<String> {
        let parents = self.commits.parent_ids(commit_id, self.resolver.project());
        if parents.is_empty() {
            tracing::debug!(
                project = %self.resolver.project(),
                commit_id,
                "no parent commits known"
            );
        }
        parents
    }

    fn push_resolved<S: AsRef<str>>(
        &mut self,
        link_type: LinkType,
        category: EventCategory,
        candidates: &[S],
    ) -> &mut Self {
        match self.resolver.resolve(category, candidates) {
            Some(target) => self.links.push(Link::new(link_type, target)),
            None => tracing::debug!(
                project = %self.resolver.project(),
                link_type = link_type.as_str(),
                category = %category,
                "link omitted, nothing recorded"
            ),
        }
        self
    }
}

/// Links of a change-created event: `BASE`, then `PREVIOUS_VERSION`.
pub fn created_event_links<C: CommitInformation>(
    resolver: LinkResolver,
    commits: C,
    change_id: &str,
    commit_id: &str,
) -> Vec<Link> {
    let mut generator = LinkGenerator::new(resolver, commits);
    generator
        .add_created_base(commit_id)
        .add_created_previous_version(change_id);
    generator.generate_links()
}

/// Links of a change-submitted event: `CHANGE`, then `PREVIOUS_VERSION`.
pub fn submitted_event_links<C: CommitInformation>(
    resolver: LinkResolver,
    commits: C,
    change_id: &str,
    commit_id: &str,
) -> Vec<Link> {
    let mut generator = LinkGenerator::new(resolver, commits);
    generator
        .add_submitted_change(change_id)
        .add_submitted_previous_version(commit_id);
    generator.generate_links()
}
