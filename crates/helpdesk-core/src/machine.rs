//! Pure transition application: validate a requested change against a
//! ticket snapshot and produce the next snapshot plus its audit record.
//!
//! Authorization and optimistic-concurrency checks live elsewhere (gate and
//! store); this module only enforces the transition table and the freezes
//! that come with the terminal status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{
    Change, InvalidTransition, Priority, Status, Ticket, TransitionRecord, UserId,
};
use crate::policy::Action;

/// A caller's requested change, decoupled from any wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum RequestedChange {
    /// Move the ticket to a new status.
    Status { to: Status },
    /// Set a new priority.
    Priority { to: Priority },
    /// Set or clear the assignee.
    Assignee { to: Option<UserId> },
}

impl RequestedChange {
    /// The gated action this request corresponds to.
    ///
    /// `Status {to: Open}` maps to [`Action::Start`]; no edge targets `Open`,
    /// so the machine rejects it for anyone the gate lets through.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::Status { to } => match to {
                Status::Open | Status::InProgress => Action::Start,
                Status::Resolved => Action::Resolve,
                Status::Closed => Action::Close,
                Status::Reopened => Action::Reopen,
            },
            Self::Priority { .. } => Action::ChangePriority,
            Self::Assignee { .. } => Action::Assign,
        }
    }
}

/// Validate `change` against `ticket` and compute the successor snapshot.
///
/// The input ticket is untouched; on success the returned snapshot carries
/// the bumped version and the appended [`TransitionRecord`] (also returned
/// separately for the append-only audit log).
///
/// # Errors
///
/// - [`InvalidTransition::Edge`] for a status move not in the table.
/// - [`InvalidTransition::PriorityLocked`] / [`InvalidTransition::AssigneeLocked`]
///   when the ticket is closed.
/// - [`InvalidTransition::NoChange`] for no-op priority/assignee requests.
pub fn apply(
    ticket: &Ticket,
    change: &RequestedChange,
    actor: &UserId,
    now: DateTime<Utc>,
    comment: Option<String>,
) -> Result<(Ticket, TransitionRecord), InvalidTransition> {
    let committed = match change {
        RequestedChange::Status { to } => {
            if let Err(rejected) = ticket.status().can_transition_to(*to) {
                debug!(ticket = %ticket.id(), %rejected, "status change rejected");
                return Err(rejected);
            }
            Change::Status {
                from: ticket.status(),
                to: *to,
            }
        }
        RequestedChange::Priority { to } => {
            if ticket.status().is_terminal() {
                return Err(InvalidTransition::PriorityLocked {
                    status: ticket.status(),
                });
            }
            if *to == ticket.priority() {
                return Err(InvalidTransition::NoChange { field: "priority" });
            }
            Change::Priority {
                from: ticket.priority(),
                to: *to,
            }
        }
        RequestedChange::Assignee { to } => {
            if ticket.status().is_terminal() {
                return Err(InvalidTransition::AssigneeLocked {
                    status: ticket.status(),
                });
            }
            if to.as_ref() == ticket.assignee() {
                return Err(InvalidTransition::NoChange { field: "assignee" });
            }
            Change::Assignee {
                from: ticket.assignee().cloned(),
                to: to.clone(),
            }
        }
    };

    let record = TransitionRecord::new(committed, actor.clone(), now, comment);
    let mut next = ticket.clone();
    next.apply(record.clone());
    Ok((next, record))
}

#[cfg(test)]
mod tests {
    use super::{Action, RequestedChange, apply};
    use crate::model::{
        Change, InvalidTransition, Priority, Status, Ticket,
        id::{CategoryId, TicketId, UserId},
    };
    use chrono::Utc;

    fn open_ticket() -> Ticket {
        Ticket::open(
            TicketId::new_unchecked("tkt-1"),
            "vpn drops hourly",
            "since monday",
            CategoryId::new_unchecked("network"),
            UserId::new_unchecked("alice"),
            Priority::Medium,
            Utc::now(),
        )
    }

    fn agent() -> UserId {
        UserId::new_unchecked("bob")
    }

    /// Walk a ticket through a sequence of status moves.
    fn walk(ticket: Ticket, path: &[Status]) -> Ticket {
        path.iter().fold(ticket, |t, to| {
            let (next, _) = apply(
                &t,
                &RequestedChange::Status { to: *to },
                &agent(),
                Utc::now(),
                None,
            )
            .expect("edge in table");
            next
        })
    }

    #[test]
    fn status_move_appends_record_and_bumps_version() {
        let ticket = open_ticket();
        let (next, record) = apply(
            &ticket,
            &RequestedChange::Status {
                to: Status::InProgress,
            },
            &agent(),
            Utc::now(),
            Some("taking this".into()),
        )
        .expect("open -> in_progress");

        assert_eq!(next.status(), Status::InProgress);
        assert_eq!(next.version(), ticket.version() + 1);
        assert_eq!(next.history().len(), ticket.history().len() + 1);
        assert_eq!(next.history().last(), Some(&record));
        assert_eq!(
            record.change,
            Change::Status {
                from: Status::Open,
                to: Status::InProgress,
            }
        );
        assert_eq!(record.comment.as_deref(), Some("taking this"));
        // Input snapshot untouched.
        assert_eq!(ticket.status(), Status::Open);
        assert_eq!(ticket.version(), 1);
    }

    #[test]
    fn skipping_resolved_is_rejected() {
        let doing = walk(open_ticket(), &[Status::InProgress]);
        let err = apply(
            &doing,
            &RequestedChange::Status { to: Status::Closed },
            &agent(),
            Utc::now(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InvalidTransition::Edge {
                from: Status::InProgress,
                to: Status::Closed,
            }
        );
    }

    #[test]
    fn closed_freezes_priority_and_assignee() {
        let closed = walk(
            open_ticket(),
            &[Status::InProgress, Status::Resolved, Status::Closed],
        );
        assert_eq!(
            apply(
                &closed,
                &RequestedChange::Priority { to: Priority::High },
                &agent(),
                Utc::now(),
                None,
            )
            .unwrap_err(),
            InvalidTransition::PriorityLocked {
                status: Status::Closed
            }
        );
        assert_eq!(
            apply(
                &closed,
                &RequestedChange::Assignee {
                    to: Some(agent()),
                },
                &agent(),
                Utc::now(),
                None,
            )
            .unwrap_err(),
            InvalidTransition::AssigneeLocked {
                status: Status::Closed
            }
        );
    }

    #[test]
    fn reopen_unfreezes_priority() {
        let reopened = walk(
            open_ticket(),
            &[
                Status::InProgress,
                Status::Resolved,
                Status::Closed,
                Status::Reopened,
            ],
        );
        let (next, _) = apply(
            &reopened,
            &RequestedChange::Priority { to: Priority::High },
            &agent(),
            Utc::now(),
            None,
        )
        .expect("reopened tickets accept priority changes");
        assert_eq!(next.priority(), Priority::High);
    }

    #[test]
    fn noop_priority_and_assignee_are_rejected() {
        let ticket = open_ticket();
        assert_eq!(
            apply(
                &ticket,
                &RequestedChange::Priority {
                    to: Priority::Medium,
                },
                &agent(),
                Utc::now(),
                None,
            )
            .unwrap_err(),
            InvalidTransition::NoChange { field: "priority" }
        );
        assert_eq!(
            apply(
                &ticket,
                &RequestedChange::Assignee { to: None },
                &agent(),
                Utc::now(),
                None,
            )
            .unwrap_err(),
            InvalidTransition::NoChange { field: "assignee" }
        );
    }

    #[test]
    fn assignment_records_before_and_after() {
        let ticket = open_ticket();
        let (next, record) = apply(
            &ticket,
            &RequestedChange::Assignee {
                to: Some(agent()),
            },
            &UserId::new_unchecked("carol"),
            Utc::now(),
            None,
        )
        .expect("assign open ticket");
        assert_eq!(next.assignee(), Some(&agent()));
        assert_eq!(
            record.change,
            Change::Assignee {
                from: None,
                to: Some(agent()),
            }
        );
    }

    #[test]
    fn requested_changes_map_to_gate_actions() {
        let cases = [
            (
                RequestedChange::Status {
                    to: Status::InProgress,
                },
                Action::Start,
            ),
            (
                RequestedChange::Status {
                    to: Status::Resolved,
                },
                Action::Resolve,
            ),
            (RequestedChange::Status { to: Status::Closed }, Action::Close),
            (
                RequestedChange::Status {
                    to: Status::Reopened,
                },
                Action::Reopen,
            ),
            (RequestedChange::Status { to: Status::Open }, Action::Start),
            (
                RequestedChange::Priority { to: Priority::Low },
                Action::ChangePriority,
            ),
            (RequestedChange::Assignee { to: None }, Action::Assign),
        ];
        for (change, action) in cases {
            assert_eq!(change.action(), action);
        }
    }

    #[test]
    fn requested_change_json_is_tagged() {
        let change = RequestedChange::Status {
            to: Status::Resolved,
        };
        let json = serde_json::to_value(&change).expect("serialize");
        assert_eq!(json["change"], "status");
        assert_eq!(json["to"], "resolved");
    }
}
