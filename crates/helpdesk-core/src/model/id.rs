//! Newtype identifiers for the three entity kinds the engine touches.
//!
//! Ids are caller-supplied opaque strings (the HTTP layer or seed loader
//! decides the scheme). The only validation at this boundary is non-empty
//! after trimming; everything else is the caller's business.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an empty or whitespace-only id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyId {
    /// Which id kind was being parsed.
    pub kind: &'static str,
}

impl fmt::Display for EmptyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id must be non-empty", self.kind)
    }
}

impl std::error::Error for EmptyId {}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id without validation. Callers that already hold a
            /// trusted id (e.g. one loaded from the store) use this.
            #[must_use]
            pub fn new_unchecked(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = EmptyId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Err(EmptyId { kind: $kind })
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identity of a ticket.
    TicketId,
    "ticket"
);
string_id!(
    /// Identity of a user (requester, agent, or admin).
    UserId,
    "user"
);
string_id!(
    /// Identity of a category in the registry.
    CategoryId,
    "category"
);
