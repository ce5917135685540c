//! REST API client module for the WiseHire backend.
//!
//! This module provides the `ApiClient`, the only path by which the console
//! talks to the backend. It attaches the bearer credential, classifies every
//! failure into an [`ApiError`], and exposes typed CRUD over the resources
//! listed in [`endpoints`].
//!
//! The backend issues its access token from the login endpoint; the token
//! is then sent as `Authorization: Bearer <token>` until it is cleared.

pub mod client;
pub mod download;
pub mod endpoints;
pub mod error;
pub mod request;

pub use client::{ApiClient, WriteOutcome, DEFAULT_BASE_URL};
pub use download::{filename_from_disposition, Download};
pub use endpoints::Resource;
pub use error::{ApiError, ErrorDetails, ValidationErrors, GENERIC_ERROR_MESSAGE};
pub use request::ApiRequest;
