//! Opaque identifiers for trips, users, candidates and destinations.
//!
//! All identifiers are string newtypes. The engine never interprets them;
//! it only compares and hashes them.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Creates an identifier, rejecting blank input.
            pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(DomainError::InvalidIdentifier(format!(
                        "{} cannot be blank",
                        stringify!($name)
                    )));
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a trip.
    TripId
);

define_id!(
    /// Identifier of a user (owner, collaborator or voter).
    UserId
);

define_id!(
    /// Identifier of a candidate place or activity being voted on.
    CandidateId
);

define_id!(
    /// Identifier of the destination a trip is planned around.
    DestinationId
);
