pub mod coordinator;
pub mod error;
pub mod machine;

pub use coordinator::{HireCoordinator, HireOutcome, HiredNotification};
pub use error::HireError;
