//! Append-only audit records for ticket mutations.
//!
//! Every committed change to a ticket's status, priority, or assignee is
//! captured as one [`TransitionRecord`] in the ticket's history. Records are
//! never mutated or deleted; together they form the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::UserId;
use super::ticket::{Priority, Status};

/// The payload of a transition record: what changed, with before/after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Ticket creation. The first and only `Created` entry in any history.
    Created { status: Status, priority: Priority },
    /// Status moved along one edge of the transition table.
    Status { from: Status, to: Status },
    /// Priority changed on a non-closed ticket.
    Priority { from: Priority, to: Priority },
    /// Assignee changed (assignment, reassignment, or unassignment).
    Assignee {
        from: Option<UserId>,
        to: Option<UserId>,
    },
}

impl Change {
    /// Whether this change affects the ticket's status.
    #[must_use]
    pub const fn is_status_change(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { status, priority } => {
                write!(f, "created as {status}/{priority}")
            }
            Self::Status { from, to } => write!(f, "status {from} -> {to}"),
            Self::Priority { from, to } => write!(f, "priority {from} -> {to}"),
            Self::Assignee { from, to } => {
                let render = |side: &Option<UserId>| {
                    side.as_ref().map_or_else(|| "nobody".to_string(), ToString::to_string)
                };
                write!(f, "assignee {} -> {}", render(from), render(to))
            }
        }
    }
}

/// One entry in a ticket's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub change: Change,
    /// The user who performed the transition.
    pub actor: UserId,
    pub at: DateTime<Utc>,
    /// Free-form note supplied with the request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TransitionRecord {
    #[must_use]
    pub const fn new(
        change: Change,
        actor: UserId,
        at: DateTime<Utc>,
        comment: Option<String>,
    ) -> Self {
        Self {
            change,
            actor,
            at,
            comment,
        }
    }
}
