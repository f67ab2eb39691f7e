//! Session implementations.
//!
//! The crate ships one backend: plain HTTP with a browser-like client.
//! Anything needing script execution can implement [`crate::traits::session`]
//! against a real automation driver without touching the pipeline.

pub mod http;

pub use http::{HttpSession, HttpSessionFactory};
