//! Notification dispatch rules.
//!
//! Given a committed transition, decide who gets told. Pure: recipients are
//! computed from the record, the ticket snapshot, the category's watcher
//! list, and the escalation contact the identity collaborator resolved.
//! Actually delivering (and tolerating delivery failures) is the
//! orchestrator's job.

use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::model::{Change, Notification, NotificationKind, Ticket, TransitionRecord, UserId};

/// Compute the notifications for a committed transition.
///
/// Rules:
/// - Status change: the creator always, the assignee once assigned, and the
///   category watchers when `notifications.notify_watchers` is on.
/// - Assignee change: the creator, the new assignee, and the previous
///   assignee on unassignment/reassignment.
/// - Priority change: silent unless the new priority is `Urgent`, in which
///   case the assignee and the escalation contact are told (unless the
///   escalation path is disabled).
/// - Creation: silent; it is not a status change.
///
/// Each recipient gets at most one notification per transition, in
/// deterministic order.
#[must_use]
pub fn dispatch(
    record: &TransitionRecord,
    ticket: &Ticket,
    watchers: &[UserId],
    escalation_contact: Option<&UserId>,
    config: &EngineConfig,
) -> Vec<Notification> {
    let (kind, recipients): (NotificationKind, Vec<&UserId>) = match &record.change {
        Change::Created { .. } => return Vec::new(),
        Change::Status { .. } => {
            let mut recipients = vec![ticket.creator()];
            recipients.extend(ticket.assignee());
            if config.notifications.notify_watchers {
                recipients.extend(watchers);
            }
            (NotificationKind::StatusChanged, recipients)
        }
        Change::Assignee { from, to } => {
            let mut recipients = vec![ticket.creator()];
            recipients.extend(to.as_ref());
            recipients.extend(from.as_ref());
            (NotificationKind::Assigned, recipients)
        }
        Change::Priority { to, .. } => {
            if !config.escalation.enabled || !to.is_urgent() {
                return Vec::new();
            }
            let mut recipients: Vec<&UserId> = ticket.assignee().into_iter().collect();
            recipients.extend(escalation_contact);
            (NotificationKind::Escalated, recipients)
        }
    };

    let summary = format!("ticket {}: {}", ticket.id(), record.change);
    let mut seen = BTreeSet::new();
    recipients
        .into_iter()
        .filter(|recipient| seen.insert((*recipient).clone()))
        .map(|recipient| Notification {
            recipient: recipient.clone(),
            ticket: ticket.id().clone(),
            kind,
            summary: summary.clone(),
            at: record.at,
        })
        .collect()
}
