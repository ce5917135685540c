//! Authentication module for the credential slot and the session.
//!
//! This module provides:
//! - `Credentials`: the single bearer token slot, written through to a
//!   `CredentialStore` (OS keyring, JSON file or memory)
//! - `SessionStore`: the `Resolving | Authenticated | Anonymous` state
//!   machine observed by route guards
//!
//! Clearing the credential anywhere (logout or a 401 from any call) moves
//! the session to `Anonymous` before the failing call returns.

pub mod credentials;
pub mod session;

pub use credentials::{
    CredentialError, CredentialStore, Credentials, FileStore, KeyringStore, MemoryStore,
};
pub use session::{SessionState, SessionStore};
