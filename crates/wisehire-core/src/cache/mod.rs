//! In-memory list state for entity screens.
//!
//! `EntityList` holds the last fetched page of a collection and applies
//! write results explicitly: patch in place when the backend echoed the
//! entity, refetch when it did not.

pub mod list;

pub use list::EntityList;
