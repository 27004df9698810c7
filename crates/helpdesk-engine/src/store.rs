//! Collaborator traits the orchestrator is constructed over.
//!
//! Implementations (SQL store, LDAP directory, mail/webhook sinks) live
//! outside this workspace; [`crate::memory`] provides in-memory versions
//! for tests and embedders. Everything is explicit construction — no
//! framework injection, per the engine's design.

use anyhow::anyhow;
use thiserror::Error;

use helpdesk_core::error::{EngineError, EntityKind};
use helpdesk_core::model::{
    Category, CategoryId, Notification, Ticket, TicketId, TransitionRecord, User, UserId,
};

/// Failures from the persistence and lookup collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    #[error("ticket '{id}' already exists")]
    Duplicate { id: TicketId },

    /// The optimistic-concurrency check failed: another writer committed
    /// between the caller's load and this save.
    #[error("version conflict on ticket {ticket}: expected {expected}, found {found}")]
    VersionConflict {
        ticket: TicketId,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::VersionConflict {
                ticket,
                expected,
                found,
            } => Self::StaleVersion {
                ticket,
                expected,
                found,
            },
            StoreError::Duplicate { id } => {
                Self::Storage(anyhow!("ticket '{id}' already exists"))
            }
            StoreError::Backend(source) => Self::Storage(source),
        }
    }
}

/// Ticket persistence. `save` is the commit point of the optimistic
/// concurrency protocol: it must compare `expected_version` against the
/// stored version and reject mismatches atomically with the swap.
pub trait TicketStore {
    /// Load the current snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id is unknown.
    fn load(&self, id: &TicketId) -> Result<Ticket, StoreError>;

    /// Insert a brand-new ticket.
    ///
    /// # Errors
    ///
    /// [`StoreError::Duplicate`] when the id is already taken.
    fn insert(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Replace the stored snapshot if its version still equals
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// [`StoreError::VersionConflict`] when another writer got there first.
    fn save(&self, ticket: &Ticket, expected_version: u64) -> Result<(), StoreError>;

    /// Append to the global audit log. Append-only: implementations must
    /// never rewrite or drop prior records.
    ///
    /// # Errors
    ///
    /// Backend faults only; the in-memory store is infallible here.
    fn append_record(&self, id: &TicketId, record: &TransitionRecord) -> Result<(), StoreError>;
}

/// Identity provider: resolves actors and the escalation contact.
pub trait Directory {
    /// Resolve a user and their role.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id is unknown.
    fn resolve(&self, id: &UserId) -> Result<User, StoreError>;

    /// The admin-pool contact for urgent-priority escalations, if any.
    fn escalation_contact(&self) -> Option<UserId>;
}

/// Read-only category lookup.
pub trait CategoryRegistry {
    /// Resolve a category.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id is unknown.
    fn resolve(&self, id: &CategoryId) -> Result<Category, StoreError>;
}

/// Why a single notification could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery failed: {reason}")]
pub struct DeliveryError {
    pub reason: String,
}

/// Outbound notification channel. Failures are reported per event and are
/// never allowed to fail the transition that produced them.
pub trait NotificationSink {
    /// Deliver one notification.
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] when the recipient cannot be reached; the engine
    /// logs it and carries on.
    fn send(&self, event: &Notification) -> Result<(), DeliveryError>;
}
