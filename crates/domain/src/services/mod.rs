//! Domain services.
//!
//! Pure rules live in `ordering` and `lifecycle`; `queue` and `settings`
//! orchestrate them over the storage ports.

pub mod lifecycle;
pub mod ordering;
pub mod queue;
pub mod settings;
pub mod token;

pub use lifecycle::PriorityChange;
pub use queue::QueueService;
pub use settings::SettingsService;
pub use token::{GeneratedToken, TokenGenerator, TokenSource};
