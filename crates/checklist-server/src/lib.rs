//! # checklist-server
//!
//! Axum HTTP front end for session-scoped to-do lists.
//!
//! - HTML routes under `/lists`, rendered with minijinja templates
//! - Session id carried in a cookie; list data held in a [`SessionStore`]
//! - `/health` JSON endpoint
//! - Idle-session sweeper and graceful shutdown via `CancellationToken`
//!
//! [`SessionStore`]: checklist_store::SessionStore

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod views;

pub use config::ServerConfig;
pub use server::{build_router, start, AppState, ServerHandle};
