// GigFlow - API Core
//
// Backend API for a gig marketplace: postings ("gigs"), competing offers
// ("bids"), and the hire transition that picks exactly one winner per gig
// and pushes a real-time notification to the hired freelancer.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
