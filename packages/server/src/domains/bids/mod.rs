pub mod models;

pub use models::{Bid, BidStatus, BidWithFreelancer, BidWithGig, PlaceBidError};
