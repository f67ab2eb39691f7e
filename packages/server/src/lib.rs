// Prospector API server core
//
// Thin HTTP surface over the prospector library: job creation, single-item
// stepping, and read-only job/record endpoints. All orchestration semantics
// live in the library; this crate only wires collaborators and maps errors
// onto status codes.

pub mod config;
pub mod server;

pub use config::*;
