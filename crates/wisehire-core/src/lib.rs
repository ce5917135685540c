//! Core library for the WiseHire HR console.
//!
//! - `api`: the single HTTP choke point, typed resources and error taxonomy
//! - `auth`: the credential slot and the session state machine
//! - `guard`, `routes`: access rules for every screen
//! - `cache`: in-memory list state with explicit invalidation
//! - `models`: wire representations of backend entities
//! - `config`: on-disk configuration and credential backend selection

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod guard;
pub mod models;
pub mod routes;
pub mod utils;

pub use api::{ApiClient, ApiError, WriteOutcome};
pub use auth::{Credentials, SessionState, SessionStore};
pub use cache::EntityList;
pub use config::{Config, CredentialBackend};
pub use guard::{Decision, Denial, Guard};
pub use routes::Route;
