//! Domain model: identities, users and roles, categories, tickets, audit
//! records, and notification payloads.

use std::fmt;

pub mod category;
pub mod id;
pub mod notification;
pub mod ticket;
pub mod transition;
pub mod user;

pub use category::Category;
pub use id::{CategoryId, TicketId, UserId};
pub use notification::{Notification, NotificationKind};
pub use ticket::{InvalidTransition, Priority, Status, Ticket};
pub use transition::{Change, TransitionRecord};
pub use user::{Role, User};

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
