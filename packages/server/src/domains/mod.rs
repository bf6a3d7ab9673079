// Domain modules

pub mod auth;
pub mod bids;
pub mod gigs;
pub mod hiring;
pub mod users;
