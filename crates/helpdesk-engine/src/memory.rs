//! In-memory collaborator implementations.
//!
//! These back the test suites and give embedders a working engine without
//! wiring real storage. Each uses interior mutability so the traits can
//! stay `&self`; the ticket map's version check-and-swap happens under a
//! single lock acquisition, which is what makes the optimistic-concurrency
//! guarantee hold.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use helpdesk_core::error::EntityKind;
use helpdesk_core::model::{
    Category, CategoryId, Notification, Role, Ticket, TicketId, TransitionRecord, User, UserId,
};

use crate::store::{
    CategoryRegistry, DeliveryError, Directory, NotificationSink, StoreError, TicketStore,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means another test thread panicked; the data is
    // still coherent for our purposes.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ticket persistence backed by a `HashMap`, plus the append-only audit log.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: Mutex<HashMap<TicketId, Ticket>>,
    log: Mutex<Vec<(TicketId, TransitionRecord)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored snapshot, if any. Test-inspection helper.
    #[must_use]
    pub fn snapshot(&self, id: &TicketId) -> Option<Ticket> {
        lock(&self.tickets).get(id).cloned()
    }

    /// Total records in the audit log across all tickets.
    #[must_use]
    pub fn record_count(&self) -> usize {
        lock(&self.log).len()
    }

    /// Audit records for one ticket, oldest first.
    #[must_use]
    pub fn records_for(&self, id: &TicketId) -> Vec<TransitionRecord> {
        lock(&self.log)
            .iter()
            .filter(|(ticket, _)| ticket == id)
            .map(|(_, record)| record.clone())
            .collect()
    }
}

impl TicketStore for MemoryStore {
    fn load(&self, id: &TicketId) -> Result<Ticket, StoreError> {
        lock(&self.tickets)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::Ticket,
                id: id.to_string(),
            })
    }

    fn insert(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = lock(&self.tickets);
        if tickets.contains_key(ticket.id()) {
            return Err(StoreError::Duplicate {
                id: ticket.id().clone(),
            });
        }
        tickets.insert(ticket.id().clone(), ticket.clone());
        Ok(())
    }

    fn save(&self, ticket: &Ticket, expected_version: u64) -> Result<(), StoreError> {
        let mut tickets = lock(&self.tickets);
        let stored = tickets
            .get_mut(ticket.id())
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::Ticket,
                id: ticket.id().to_string(),
            })?;
        if stored.version() != expected_version {
            return Err(StoreError::VersionConflict {
                ticket: ticket.id().clone(),
                expected: expected_version,
                found: stored.version(),
            });
        }
        *stored = ticket.clone();
        Ok(())
    }

    fn append_record(&self, id: &TicketId, record: &TransitionRecord) -> Result<(), StoreError> {
        lock(&self.log).push((id.clone(), record.clone()));
        Ok(())
    }
}

/// Identity provider backed by a `BTreeMap` (ordered, so the default
/// escalation contact is deterministic).
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<BTreeMap<UserId, User>>,
    escalation_override: Mutex<Option<UserId>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user: User) {
        lock(&self.users).insert(user.id.clone(), user);
    }

    /// Pin the escalation contact instead of deriving it from the admin
    /// pool.
    pub fn set_escalation_contact(&self, id: UserId) {
        *lock(&self.escalation_override) = Some(id);
    }
}

impl Directory for MemoryDirectory {
    fn resolve(&self, id: &UserId) -> Result<User, StoreError> {
        lock(&self.users)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::User,
                id: id.to_string(),
            })
    }

    fn escalation_contact(&self) -> Option<UserId> {
        if let Some(pinned) = lock(&self.escalation_override).clone() {
            return Some(pinned);
        }
        // First admin by id: the deterministic pick from the admin pool.
        lock(&self.users)
            .values()
            .find(|user| user.role == Role::Admin)
            .map(|user| user.id.clone())
    }
}

/// Category registry backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryCategories {
    categories: Mutex<BTreeMap<CategoryId, Category>>,
}

impl MemoryCategories {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, category: Category) {
        lock(&self.categories).insert(category.id.clone(), category);
    }
}

impl CategoryRegistry for MemoryCategories {
    fn resolve(&self, id: &CategoryId) -> Result<Category, StoreError> {
        lock(&self.categories)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::Category,
                id: id.to_string(),
            })
    }
}

/// A sink that records everything it is asked to send, with an injectable
/// set of unreachable recipients for delivery-failure tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
    unreachable: Mutex<BTreeSet<UserId>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything successfully delivered so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        lock(&self.sent).clone()
    }

    /// Make deliveries to `recipient` fail from now on.
    pub fn mark_unreachable(&self, recipient: UserId) {
        lock(&self.unreachable).insert(recipient);
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, event: &Notification) -> Result<(), DeliveryError> {
        if lock(&self.unreachable).contains(&event.recipient) {
            return Err(DeliveryError {
                reason: format!("recipient {} unreachable", event.recipient),
            });
        }
        lock(&self.sent).push(event.clone());
        Ok(())
    }
}
