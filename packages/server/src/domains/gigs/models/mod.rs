pub mod gig;

pub use gig::{Gig, GigStatus, GigWithBidCount, GigWithOwner};
