//! The lifecycle orchestrator: authorize, validate, commit, notify.
//!
//! One logical unit per request: load snapshot -> resolve actor -> gate ->
//! machine -> version-checked save -> audit append -> dispatch. A failure
//! anywhere before the save leaves the store untouched; dispatch runs only
//! after the commit and can only produce per-event delivery failures, never
//! a transition failure.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use helpdesk_core::config::EngineConfig;
use helpdesk_core::error::EngineError;
use helpdesk_core::machine::{self, RequestedChange};
use helpdesk_core::model::{
    CategoryId, Notification, Priority, Ticket, TicketId, TransitionRecord, UserId,
};
use helpdesk_core::notify;
use helpdesk_core::policy::{self, Action};

use crate::store::{CategoryRegistry, Directory, NotificationSink, TicketStore};

/// Everything needed to open a ticket. Ids are caller-supplied; the engine
/// does not mint them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDraft {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub category: CategoryId,
    pub priority: Priority,
}

impl TicketDraft {
    /// A draft with the default (`Medium`) priority.
    #[must_use]
    pub fn new(
        id: TicketId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: CategoryId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            priority: Priority::default(),
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// One notification that could not be delivered. Reported alongside the
/// successful transition, never instead of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub recipient: UserId,
    pub reason: String,
}

/// The composed result of a committed request. Serializable so callers can
/// shape it straight into a response body.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    /// The new snapshot.
    pub ticket: Ticket,
    /// The audit record this request appended.
    pub record: TransitionRecord,
    /// Notifications the dispatcher emitted (delivered or not).
    pub notifications: Vec<Notification>,
    /// Per-event delivery failures; empty on clean delivery.
    pub delivery_failures: Vec<DeliveryFailure>,
}

/// The lifecycle engine, generic over its four collaborators. Construct it
/// explicitly with whatever implementations fit the deployment; tests use
/// the [`crate::memory`] ones.
#[derive(Debug)]
pub struct LifecycleEngine<S, D, C, N> {
    store: S,
    directory: D,
    categories: C,
    sink: N,
    config: EngineConfig,
}

impl<S, D, C, N> LifecycleEngine<S, D, C, N>
where
    S: TicketStore,
    D: Directory,
    C: CategoryRegistry,
    N: NotificationSink,
{
    #[must_use]
    pub const fn new(store: S, directory: D, categories: C, sink: N, config: EngineConfig) -> Self {
        Self {
            store,
            directory,
            categories,
            sink,
            config,
        }
    }

    /// The persistence collaborator (test inspection).
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The notification sink (test inspection).
    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    /// Open a new ticket.
    ///
    /// The ticket starts in `Open` status with a `Created` audit record;
    /// creation emits no notifications.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] for an unknown actor or category.
    /// - [`EngineError::Unauthorized`] is never produced today (every role
    ///   may create), but the gate still runs.
    /// - [`EngineError::Storage`] for store faults, including duplicate ids.
    pub fn create(&self, actor: &UserId, draft: TicketDraft) -> Result<Ticket, EngineError> {
        let user = self.directory.resolve(actor)?;
        policy::authorize(user.role, Action::Create, true)?;
        self.categories.resolve(&draft.category)?;

        let ticket = Ticket::open(
            draft.id,
            draft.title,
            draft.description,
            draft.category,
            actor.clone(),
            draft.priority,
            Utc::now(),
        );
        self.store.insert(&ticket)?;
        if let Some(created) = ticket.history().first() {
            self.store.append_record(ticket.id(), created)?;
        }
        info!(ticket = %ticket.id(), actor = %actor, "ticket created");
        Ok(ticket)
    }

    /// Run one change request through the full pipeline.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] for an unknown actor or ticket.
    /// - [`EngineError::Unauthorized`] when the gate denies the action.
    /// - [`EngineError::InvalidEdge`] when the machine rejects the change.
    /// - [`EngineError::StaleVersion`] when another writer committed first;
    ///   reload and retry.
    pub fn request_transition(
        &self,
        ticket_id: &TicketId,
        actor: &UserId,
        change: &RequestedChange,
        comment: Option<String>,
    ) -> Result<TransitionOutcome, EngineError> {
        let user = self.directory.resolve(actor)?;
        let ticket = self.store.load(ticket_id)?;

        let action = change.action();
        policy::authorize(user.role, action, ticket.creator() == actor)?;

        let expected = ticket.version();
        let (next, record) = machine::apply(&ticket, change, actor, Utc::now(), comment)?;

        self.store.save(&next, expected)?;
        self.store.append_record(next.id(), &record)?;
        debug!(
            ticket = %next.id(),
            actor = %actor,
            version = next.version(),
            change = %record.change,
            "transition committed"
        );

        let (notifications, delivery_failures) = self.dispatch(&record, &next);
        Ok(TransitionOutcome {
            ticket: next,
            record,
            notifications,
            delivery_failures,
        })
    }

    /// Post-commit fan-out. Nothing in here can fail the transition; even a
    /// category lookup fault just costs the watcher notifications.
    fn dispatch(
        &self,
        record: &TransitionRecord,
        ticket: &Ticket,
    ) -> (Vec<Notification>, Vec<DeliveryFailure>) {
        let watchers = match self.categories.resolve(ticket.category()) {
            Ok(category) => category.watchers,
            Err(err) => {
                warn!(ticket = %ticket.id(), error = %err, "watcher lookup failed post-commit");
                Vec::new()
            }
        };
        let escalation_contact = self.directory.escalation_contact();

        let notifications = notify::dispatch(
            record,
            ticket,
            &watchers,
            escalation_contact.as_ref(),
            &self.config,
        );

        let mut failures = Vec::new();
        for event in &notifications {
            if let Err(err) = self.sink.send(event) {
                warn!(
                    ticket = %event.ticket,
                    recipient = %event.recipient,
                    error = %err,
                    "notification delivery failed"
                );
                failures.push(DeliveryFailure {
                    recipient: event.recipient.clone(),
                    reason: err.reason,
                });
            }
        }
        (notifications, failures)
    }
}
