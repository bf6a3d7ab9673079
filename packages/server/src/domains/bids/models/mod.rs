pub mod bid;

pub use bid::{Bid, BidStatus, BidWithFreelancer, BidWithGig, PlaceBidError};
