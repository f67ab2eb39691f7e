//! Concrete extractors working over a session's current page.
//!
//! `SelectorFieldExtractor` answers listing-stage lookups through CSS
//! selector lists; `EmailScanner` handles the website stage with a
//! mailto-first scan. Both are stateless between calls: all page state
//! lives in the session.

pub mod email;
pub mod selector;

pub use email::EmailScanner;
pub use selector::SelectorFieldExtractor;
