//! Discovery implementations.

pub mod html;

pub use html::HtmlDiscovery;
