//! The authorization gate: a pure decision function over a closed action
//! set and the actor's role.
//!
//! The policy table:
//!
//! | Action          | Requester       | Agent | Admin |
//! |-----------------|-----------------|-------|-------|
//! | Create          | yes             | yes   | yes   |
//! | ChangePriority  | no              | yes   | yes   |
//! | Assign          | no              | yes   | yes   |
//! | Start           | no              | yes   | yes   |
//! | Resolve         | no              | yes   | yes   |
//! | Close           | no              | no    | yes   |
//! | Reopen          | own ticket only | yes   | yes   |
//!
//! Denials carry a reason code; the orchestrator turns them into
//! user-visible errors, never silent no-ops.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Role;

/// The closed set of gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a new ticket.
    Create,
    /// Change the priority of an existing ticket.
    ChangePriority,
    /// Assign, reassign, or unassign a ticket.
    Assign,
    /// Move a ticket from `Open`/`Reopened` into `InProgress`.
    Start,
    /// Move a ticket into `Resolved`.
    Resolve,
    /// Move a ticket into `Closed`.
    Close,
    /// Move a ticket into `Reopened`.
    Reopen,
}

impl Action {
    /// All actions, in policy-table order.
    pub const ALL: [Self; 7] = [
        Self::Create,
        Self::ChangePriority,
        Self::Assign,
        Self::Start,
        Self::Resolve,
        Self::Close,
        Self::Reopen,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ChangePriority => "change_priority",
            Self::Assign => "assign",
            Self::Start => "start",
            Self::Resolve => "resolve",
            Self::Close => "close",
            Self::Reopen => "reopen",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the gate said no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The role never holds this permission.
    RoleForbidden,
    /// Requesters may only reopen tickets they created.
    NotTicketCreator,
}

/// A denial decision from the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub role: Role,
    pub action: Action,
    pub reason: DenyReason,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DenyReason::RoleForbidden => {
                write!(f, "role {} may not {}", self.role, self.action)
            }
            DenyReason::NotTicketCreator => write!(
                f,
                "role {} may only {} tickets they created",
                self.role, self.action
            ),
        }
    }
}

impl std::error::Error for Denial {}

/// Decide whether `role` may perform `action`.
///
/// `is_creator` states whether the actor created the ticket in question;
/// it only matters for the requester reopen rule. Pure function, no side
/// effects.
///
/// # Errors
///
/// Returns a [`Denial`] carrying the reason when the policy table says no.
pub const fn authorize(role: Role, action: Action, is_creator: bool) -> Result<(), Denial> {
    let allowed = match (action, role) {
        (Action::Create, _) => true,
        (
            Action::ChangePriority | Action::Assign | Action::Start | Action::Resolve,
            Role::Agent | Role::Admin,
        ) => true,
        (Action::Close, Role::Admin) => true,
        (Action::Reopen, Role::Agent | Role::Admin) => true,
        (Action::Reopen, Role::Requester) => {
            if is_creator {
                true
            } else {
                return Err(Denial {
                    role,
                    action,
                    reason: DenyReason::NotTicketCreator,
                });
            }
        }
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(Denial {
            role,
            action,
            reason: DenyReason::RoleForbidden,
        })
    }
}
