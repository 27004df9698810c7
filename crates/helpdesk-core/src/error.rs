//! Engine error taxonomy and the machine-readable error-code catalog.
//!
//! Every transition-blocking failure maps to one [`ErrorCode`]; callers
//! (HTTP layer, CLI, agents) branch on `code()` and `retryable()` instead
//! of parsing messages. Delivery failures are deliberately absent from
//! [`EngineError`]: they never block a transition and ride on the success
//! result instead.

use std::fmt;
use thiserror::Error;

use crate::model::{InvalidTransition, TicketId};
use crate::policy::Denial;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TicketNotFound,
    InvalidStateTransition,
    Unauthorized,
    UserNotFound,
    CategoryNotFound,
    StaleVersion,
    DeliveryFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::TicketNotFound => "E2001",
            Self::InvalidStateTransition => "E2002",
            Self::Unauthorized => "E2003",
            Self::UserNotFound => "E2004",
            Self::CategoryNotFound => "E2005",
            Self::StaleVersion => "E3001",
            Self::DeliveryFailed => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TicketNotFound => "Ticket not found",
            Self::InvalidStateTransition => "Invalid state transition",
            Self::Unauthorized => "Actor lacks permission for this action",
            Self::UserNotFound => "User not found",
            Self::CategoryNotFound => "Category not found",
            Self::StaleVersion => "Ticket was concurrently modified",
            Self::DeliveryFailed => "Notification delivery failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the engine TOML config and retry."),
            Self::TicketNotFound | Self::UserNotFound | Self::CategoryNotFound => None,
            Self::InvalidStateTransition => Some(
                "Follow valid edges: open -> in_progress -> resolved -> closed, \
                 reopen via resolved/closed -> reopened.",
            ),
            Self::Unauthorized => Some("Ask an agent or admin to perform this action."),
            Self::StaleVersion => Some("Reload the ticket and resubmit the change."),
            Self::DeliveryFailed => Some("The transition committed; resend the notification."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }

    /// Whether retrying the same request can succeed. Only stale-version
    /// conflicts are retryable, and only with a freshly loaded ticket.
    #[must_use]
    pub const fn retryable(self) -> bool {
        matches!(self, Self::StaleVersion)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which entity kind a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ticket,
    User,
    Category,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ticket => "ticket",
            Self::User => "user",
            Self::Category => "category",
        })
    }
}

/// A transition-blocking failure. All variants guarantee zero mutation:
/// the stored ticket is exactly what it was before the request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The gate denied the action.
    #[error(transparent)]
    Unauthorized(#[from] Denial),

    /// The state machine rejected the change.
    #[error(transparent)]
    InvalidEdge(#[from] InvalidTransition),

    /// Another writer committed first; retry with a fresh snapshot.
    #[error("stale version on ticket {ticket}: expected {expected}, found {found}")]
    StaleVersion {
        ticket: TicketId,
        expected: u64,
        found: u64,
    },

    /// Ticket, user, or category lookup failed.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    /// A collaborator fault that is none of the above.
    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

impl EngineError {
    /// The catalog code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::InvalidEdge(_) => ErrorCode::InvalidStateTransition,
            Self::StaleVersion { .. } => ErrorCode::StaleVersion,
            Self::NotFound { entity, .. } => match entity {
                EntityKind::Ticket => ErrorCode::TicketNotFound,
                EntityKind::User => ErrorCode::UserNotFound,
                EntityKind::Category => ErrorCode::CategoryNotFound,
            },
            Self::Storage(_) => ErrorCode::InternalUnexpected,
        }
    }

    /// Shorthand for `self.code().retryable()`.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        self.code().retryable()
    }
}
