//! Identifier types for the grading domain.
//!
//! Every record in the assessment store is addressed by a string `spec`.
//! The wrappers below keep attempt, task, test, language and user
//! identifiers from being mixed up at call sites.

use super::GradingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! spec_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`GradingDomainError::EmptyIdentifier`] when the value
            /// is empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, GradingDomainError> {
                let raw = value.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(GradingDomainError::EmptyIdentifier($kind));
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = GradingDomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

spec_identifier!(
    /// Unique identifier of a submitted attempt.
    AttemptSpec,
    "attempt"
);

spec_identifier!(
    /// Unique identifier of a task.
    TaskSpec,
    "task"
);

spec_identifier!(
    /// Unique identifier of a single task test case.
    TestSpec,
    "test"
);

spec_identifier!(
    /// Unique identifier of a programming language configuration.
    LanguageSpec,
    "language"
);

spec_identifier!(
    /// Login of the user who authored an attempt.
    UserLogin,
    "user"
);
