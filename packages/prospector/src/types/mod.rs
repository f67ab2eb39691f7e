//! Core data types: jobs, items, contact records, locators.

pub mod job;
pub mod locator;
pub mod record;
