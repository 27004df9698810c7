//! The ticket aggregate: status workflow, priority scale, and the audit
//! history that is the only mutation path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::id::{CategoryId, TicketId, UserId};
use super::transition::{Change, TransitionRecord};

/// The five lifecycle states.
///
/// `Reopened` is a distinct persisted status: for outbound transitions it
/// behaves like `Open`, but it keeps the re-entry marker visible in the
/// ticket snapshot and its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
    Reopened,
}

impl Status {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Resolved,
        Self::Closed,
        Self::Reopened,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
        }
    }

    /// Whether this status has no outbound edges apart from the explicit
    /// reopen exception.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Validate whether a transition from `self` to `target` is allowed.
    ///
    /// Valid edges:
    /// - `open -> in_progress`
    /// - `in_progress -> resolved`
    /// - `resolved -> closed`
    /// - `resolved -> reopened`
    /// - `closed -> reopened`
    /// - `reopened -> in_progress`
    ///
    /// Any edge not listed is rejected, including self-loops.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition::Edge`] when the edge is not in the table.
    pub const fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        let allowed = matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
                | (Self::Resolved, Self::Closed)
                | (Self::Resolved, Self::Reopened)
                | (Self::Closed, Self::Reopened)
                | (Self::Reopened, Self::InProgress)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition::Edge {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = super::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            "reopened" => Ok(Self::Reopened),
            _ => Err(super::ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// The four priority tiers, ordered from `Low` to `Urgent`.
///
/// `Urgent` is the escalation tier: reaching it triggers the additional
/// notification path in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Whether this is the escalation tier.
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::Urgent)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = super::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(super::ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

/// Error returned when a requested change is not permitted from the
/// ticket's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTransition {
    /// The status edge is not in the transition table.
    Edge { from: Status, to: Status },
    /// Priority is frozen while the ticket is closed.
    PriorityLocked { status: Status },
    /// Assignee changes are frozen while the ticket is closed.
    AssigneeLocked { status: Status },
    /// The request would not change anything (same priority or assignee).
    NoChange { field: &'static str },
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge { from, to } => {
                write!(f, "no transition from {from} to {to}")
            }
            Self::PriorityLocked { status } => {
                write!(f, "priority is frozen while ticket is {status}; reopen first")
            }
            Self::AssigneeLocked { status } => {
                write!(f, "assignee is frozen while ticket is {status}; reopen first")
            }
            Self::NoChange { field } => write!(f, "requested {field} change is a no-op"),
        }
    }
}

impl std::error::Error for InvalidTransition {}

/// A ticket snapshot.
///
/// Status, priority, assignee, version, and history are private: the only
/// mutation path is [`Ticket::open`] plus [`crate::machine::apply`], which
/// records every change in the history before it lands in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    title: String,
    description: String,
    category: CategoryId,
    creator: UserId,
    status: Status,
    priority: Priority,
    assignee: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Optimistic-concurrency stamp; bumped by every committed transition.
    version: u64,
    history: Vec<TransitionRecord>,
}

impl Ticket {
    /// Create a ticket in `Open` status with a `Created` audit record, so a
    /// fresh ticket always has history length 1.
    #[must_use]
    pub fn open(
        id: TicketId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: CategoryId,
        creator: UserId,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        let created = TransitionRecord::new(
            Change::Created {
                status: Status::Open,
                priority,
            },
            creator.clone(),
            now,
            None,
        );
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            creator,
            status: Status::Open,
            priority,
            assignee: None,
            created_at: now,
            updated_at: now,
            version: 1,
            history: vec![created],
        }
    }

    #[must_use]
    pub const fn id(&self) -> &TicketId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.category
    }

    #[must_use]
    pub const fn creator(&self) -> &UserId {
        &self.creator
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub const fn assignee(&self) -> Option<&UserId> {
        self.assignee.as_ref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Current optimistic-concurrency version. Starts at 1.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// The audit trail, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Apply a validated record: update the snapshot fields, bump the
    /// version, and append to history. Callers must have validated the
    /// change against the current state first; `machine::apply` is the only
    /// intended caller.
    pub(crate) fn apply(&mut self, record: TransitionRecord) {
        match &record.change {
            Change::Created { .. } => {
                // Only ever written by `Ticket::open`.
                debug_assert!(false, "Created records are written at construction");
            }
            Change::Status { to, .. } => self.status = *to,
            Change::Priority { to, .. } => self.priority = *to,
            Change::Assignee { to, .. } => self.assignee = to.clone(),
        }
        self.updated_at = record.at;
        self.version += 1;
        self.history.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidTransition, Priority, Status, Ticket};
    use crate::model::id::{CategoryId, TicketId, UserId};
    use chrono::Utc;
    use std::str::FromStr;

    fn sample() -> Ticket {
        Ticket::open(
            TicketId::new_unchecked("tkt-1"),
            "printer on fire",
            "smoke everywhere",
            CategoryId::new_unchecked("hardware"),
            UserId::new_unchecked("alice"),
            Priority::Medium,
            Utc::now(),
        )
    }

    #[test]
    fn status_transition_table() {
        assert!(Status::Open.can_transition_to(Status::InProgress).is_ok());
        assert!(Status::InProgress.can_transition_to(Status::Resolved).is_ok());
        assert!(Status::Resolved.can_transition_to(Status::Closed).is_ok());
        assert!(Status::Resolved.can_transition_to(Status::Reopened).is_ok());
        assert!(Status::Closed.can_transition_to(Status::Reopened).is_ok());
        assert!(Status::Reopened.can_transition_to(Status::InProgress).is_ok());
    }

    #[test]
    fn unlisted_edges_are_rejected() {
        // Skipping Resolved entirely is the classic mistake.
        assert!(matches!(
            Status::InProgress.can_transition_to(Status::Closed),
            Err(InvalidTransition::Edge {
                from: Status::InProgress,
                to: Status::Closed,
            })
        ));
        // Self-loops are not edges.
        for status in Status::ALL {
            assert!(status.can_transition_to(status).is_err());
        }
        // Nothing transitions back to Open; reopening goes through Reopened.
        for status in Status::ALL {
            assert!(status.can_transition_to(Status::Open).is_err());
        }
    }

    #[test]
    fn closed_is_the_only_terminal_status() {
        for status in Status::ALL {
            assert_eq!(status.is_terminal(), status == Status::Closed);
        }
    }

    #[test]
    fn status_display_parse_roundtrips() {
        for status in Status::ALL {
            let rendered = status.to_string();
            assert_eq!(Status::from_str(&rendered).expect("reparse"), status);
        }
        assert!(Status::from_str("pending").is_err());
    }

    #[test]
    fn priority_is_ordered_and_defaults_to_medium() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_display_parse_roundtrips() {
        for priority in Priority::ALL {
            let rendered = priority.to_string();
            assert_eq!(Priority::from_str(&rendered).expect("reparse"), priority);
        }
        assert!(Priority::from_str("critical").is_err());
    }

    #[test]
    fn fresh_ticket_has_history_length_one() {
        let ticket = sample();
        assert_eq!(ticket.status(), Status::Open);
        assert_eq!(ticket.priority(), Priority::Medium);
        assert_eq!(ticket.version(), 1);
        assert_eq!(ticket.history().len(), 1);
        assert_eq!(ticket.history()[0].actor, *ticket.creator());
        assert!(ticket.assignee().is_none());
    }

    #[test]
    fn ticket_json_roundtrips() {
        let ticket = sample();
        let json = serde_json::to_string(&ticket).expect("serialize");
        let back: Ticket = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ticket);
    }
}
