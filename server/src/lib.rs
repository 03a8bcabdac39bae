//! QuillGPT server library: HTTP surface, auth gate, message service, and
//! Stripe webhook reconciliation.
//!
//! ## Modules
//!
//! - [`config`] – env-driven ServerConfig
//! - [`error`] – ApiError (auth failures with their HTTP statuses)
//! - [`auth`] – JWT signing/verification and the auth middleware
//! - [`state`] – AppState wiring repositories, services, and clients
//! - [`routes`] – axum router and handlers
//! - [`services`] – MessageService and ReconcileService
//! - [`stripe`] – signature verification, event decoding, API client

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;

pub use config::ServerConfig;
pub use state::AppState;
