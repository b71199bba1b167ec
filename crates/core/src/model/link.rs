#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkType {
    Base,
    Change,
    PreviousVersion,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::Change => "CHANGE",
            Self::PreviousVersion => "PREVIOUS_VERSION",
        }
    }
}

/// Typed reference from a new event to a previously recorded event id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub target: String,
}

impl Link {
    pub fn new(link_type: LinkType, target: impl Into<String>) -> Self {
        Self {
            link_type,
            target: target.into(),
        }
    }
}
