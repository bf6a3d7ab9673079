// HTTP routes
pub mod auth;
pub mod bids;
pub mod gigs;
pub mod health;
pub mod stream;

pub use auth::*;
pub use bids::*;
pub use gigs::*;
pub use health::*;
pub use stream::*;
