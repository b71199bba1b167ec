#![forbid(unsafe_code)]

/// The two change-lifecycle event kinds that are tracked per project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventCategory {
    /// Keyed by change id.
    SourceChangeCreated,
    /// Keyed by branch (or, for ancestry searches, commit id).
    SourceChangeSubmitted,
}

impl EventCategory {
    pub const ALL: [EventCategory; 2] = [
        EventCategory::SourceChangeCreated,
        EventCategory::SourceChangeSubmitted,
    ];

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::SourceChangeCreated => "SourceChangeCreated",
            Self::SourceChangeSubmitted => "SourceChangeSubmitted",
        }
    }

    pub fn parse_tag(tag: &str) -> Result<Self, UnknownCategoryTag> {
        match tag.trim() {
            "SourceChangeCreated" | "EiffelSourceChangeCreatedEvent" | "created" => {
                Ok(Self::SourceChangeCreated)
            }
            "SourceChangeSubmitted" | "EiffelSourceChangeSubmittedEvent" | "submitted" => {
                Ok(Self::SourceChangeSubmitted)
            }
            _ => Err(UnknownCategoryTag(tag.to_string())),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCategoryTag(pub String);

impl std::fmt::Display for UnknownCategoryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown event category tag: {}", self.0)
    }
}

impl std::error::Error for UnknownCategoryTag {}
