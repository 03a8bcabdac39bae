//! Core crate: shared domain types, application errors, and logging setup.
//!
//! ## Modules
//!
//! - [`error`] – AppError and the crate-wide Result alias
//! - [`types`] – Role, GenerationMode
//! - [`logger`] – tracing initialization (console + file)

mod error;
mod logger;
mod types;

pub use error::{AppError, Result};
pub use logger::init_tracing;
pub use types::{GenerationMode, Role};
