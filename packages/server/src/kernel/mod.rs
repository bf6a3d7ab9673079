//! Kernel module - server infrastructure shared across domains.

pub mod notifier;
pub mod presence;

pub use notifier::Notifier;
pub use presence::{Connection, PresenceRegistry, PushMessage};
