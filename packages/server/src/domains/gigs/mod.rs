pub mod models;

pub use models::{Gig, GigStatus, GigWithBidCount, GigWithOwner};
