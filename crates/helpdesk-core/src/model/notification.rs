//! Notification payloads emitted after committed transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::{TicketId, UserId};

/// What kind of change a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The ticket moved to a new status.
    StatusChanged,
    /// The ticket was assigned, reassigned, or unassigned.
    Assigned,
    /// Priority reached the urgent tier.
    Escalated,
}

impl NotificationKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChanged => "status_changed",
            Self::Assigned => "assigned",
            Self::Escalated => "escalated",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification addressed to one recipient.
///
/// A single transition fans out to several of these (creator, assignee,
/// watchers, escalation contact) but never two for the same recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: UserId,
    pub ticket: TicketId,
    pub kind: NotificationKind,
    /// Human-readable one-liner describing the change.
    pub summary: String,
    pub at: DateTime<Utc>,
}
