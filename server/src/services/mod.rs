//! Orchestration services: message send and payment reconciliation.

mod generation;
mod message_service;
mod reconcile;

pub use generation::{ImageGenerator, TextGenerator};
pub use message_service::MessageService;
pub use reconcile::ReconcileService;
