// HTTP routes
pub mod health;
pub mod jobs;
pub mod records;
pub mod respond;

pub use health::*;
pub use jobs::*;
pub use records::*;
pub use respond::*;
