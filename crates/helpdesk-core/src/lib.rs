#![forbid(unsafe_code)]
//! helpdesk-core: ticket model, lifecycle state machine, authorization
//! policy, and notification dispatch rules.
//!
//! Everything here is pure and synchronous; persistence, identity lookup,
//! and delivery live behind the collaborator traits in `helpdesk-engine`.
//!
//! # Conventions
//!
//! - **Errors**: typed errors per module, [`error::EngineError`] as the
//!   transition-blocking taxonomy, `anyhow::Result` at config-loading edges.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`,
//!   `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod machine;
pub mod model;
pub mod notify;
pub mod policy;

pub use config::EngineConfig;
pub use error::{EngineError, EntityKind, ErrorCode};
pub use machine::RequestedChange;
pub use model::{
    Category, CategoryId, Change, InvalidTransition, Notification, NotificationKind, Priority,
    Role, Status, Ticket, TicketId, TransitionRecord, User, UserId,
};
pub use policy::{Action, Denial, DenyReason, authorize};
