#![forbid(unsafe_code)]

pub mod model;

pub use model::*;

pub mod ids {
    const MAX_PROJECT_LEN: usize = 255;
    const MAX_KEY_LEN: usize = 1024;

    /// Project name as known to the code review host, e.g. `group/sub-project`.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ProjectName(String);

    impl ProjectName {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, ProjectNameError> {
            let value = value.into();
            validate_project_name(&value)?;
            Ok(Self(value))
        }

        /// Everything before the last `/`, if any.
        pub fn parent(&self) -> Option<&str> {
            self.0.rsplit_once('/').map(|(parent, _)| parent)
        }

        pub fn leaf(&self) -> &str {
            match self.0.rsplit_once('/') {
                Some((_, leaf)) => leaf,
                None => &self.0,
            }
        }
    }

    impl std::fmt::Display for ProjectName {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ProjectNameError {
        Empty,
        TooLong,
        EmptySegment,
        RelativeSegment,
        InvalidChar { ch: char, index: usize },
    }

    impl ProjectNameError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "project name must not be empty",
                Self::TooLong => "project name is too long",
                Self::EmptySegment => "project name must not contain empty path segments",
                Self::RelativeSegment => "project name must not contain '.' or '..' segments",
                Self::InvalidChar { .. } => "project name contains an invalid character",
            }
        }
    }

    fn validate_project_name(value: &str) -> Result<(), ProjectNameError> {
        if value.is_empty() {
            return Err(ProjectNameError::Empty);
        }
        if value.len() > MAX_PROJECT_LEN {
            return Err(ProjectNameError::TooLong);
        }
        for (index, ch) in value.chars().enumerate() {
            if ch.is_control() || ch == '\\' {
                return Err(ProjectNameError::InvalidChar { ch, index });
            }
        }
        for segment in value.split('/') {
            if segment.is_empty() {
                return Err(ProjectNameError::EmptySegment);
            }
            if segment == "." || segment == ".." {
                return Err(ProjectNameError::RelativeSegment);
            }
        }
        Ok(())
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum KeyError {
        Empty,
        TooLong,
        ContainsControl,
    }

    impl KeyError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "key must not be empty",
                Self::TooLong => "key is too long",
                Self::ContainsControl => "key contains control characters",
            }
        }
    }

    /// Validates a store key (branch, change id, commit id) or a stored event id.
    pub fn validate_key(value: &str) -> Result<(), KeyError> {
        if value.trim().is_empty() {
            return Err(KeyError::Empty);
        }
        if value.len() > MAX_KEY_LEN {
            return Err(KeyError::TooLong);
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(KeyError::ContainsControl);
        }
        Ok(())
    }
}
