//! Core trait abstractions for the prospector library.
//!
//! These traits define the seams between the orchestrator and its
//! collaborators: discovery, sessions, per-field extraction, and storage.
//! Applications swap in their own implementations; the crate ships
//! HTTP-backed defaults and in-memory/postgres stores.

pub mod discovery;
pub mod extractor;
pub mod session;
pub mod store;
