#![forbid(unsafe_code)]
//! helpdesk-engine: the ticket lifecycle orchestrator.
//!
//! Composes the authorization gate, the state machine, and the notification
//! dispatcher from `helpdesk-core` over four collaborator traits
//! (persistence, identity, categories, delivery). Per-ticket optimistic
//! concurrency; no global lock.
//!
//! # Conventions
//!
//! - **Errors**: [`helpdesk_core::error::EngineError`] for transition
//!   outcomes, [`store::StoreError`] at the collaborator boundary.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`,
//!   `debug!`, `trace!`).

pub mod engine;
pub mod memory;
pub mod store;

pub use engine::{DeliveryFailure, LifecycleEngine, TicketDraft, TransitionOutcome};
pub use store::{
    CategoryRegistry, DeliveryError, Directory, NotificationSink, StoreError, TicketStore,
};
